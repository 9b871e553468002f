//! UI triggers, written against injected collaborators.
//!
//! A front end owns the actual widgets (or terminal) and implements
//! `UiState` and `DisplaySurface`; the triggers here only read from and write
//! to those traits.

use crate::clipboard::{ClipboardWriter, FallbackClipboard, PrimaryClipboard, WriteOutcome};
use crate::error::GenerateError;
use crate::generate::{GenerationRequest, IndexSource, generate_pair};

/// One of the two password display slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Current values of the length input and the two toggles.
pub trait UiState {
    fn length(&self) -> Result<usize, GenerateError>;
    fn include_digits(&self) -> bool;
    fn include_symbols(&self) -> bool;
}

/// Somewhere the two passwords are shown.
pub trait DisplaySurface {
    fn set_text(&mut self, slot: Slot, text: String);
    fn text(&self, slot: Slot) -> &str;
}

/// Simple two-slot display kept in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryDisplay {
    slots: [String; 2],
}

impl DisplaySurface for MemoryDisplay {
    fn set_text(&mut self, slot: Slot, text: String) {
        self.slots[slot.index()] = text;
    }

    fn text(&self, slot: Slot) -> &str {
        &self.slots[slot.index()]
    }
}

/// Build the request from the current UI state.
pub fn current_request(state: &impl UiState) -> Result<GenerationRequest, GenerateError> {
    Ok(GenerationRequest::new(
        state.length()?,
        state.include_digits(),
        state.include_symbols(),
    ))
}

/// Generate trigger: two fresh passwords into the two slots.
///
/// On an invalid length the display is left untouched.
pub fn on_generate(
    state: &impl UiState,
    display: &mut impl DisplaySurface,
    source: &mut impl IndexSource,
) -> Result<(), GenerateError> {
    let request = current_request(state)?;
    let [first, second] = generate_pair(&request, source);
    display.set_text(Slot::First, first);
    display.set_text(Slot::Second, second);
    Ok(())
}

/// Password-clicked trigger: copy the slot's text if there is any.
///
/// Returns `None` when the slot is empty and nothing was attempted.
pub fn on_password_clicked<P, F>(
    display: &impl DisplaySurface,
    slot: Slot,
    writer: &mut ClipboardWriter<P, F>,
) -> Option<WriteOutcome>
where
    P: PrimaryClipboard,
    F: FallbackClipboard,
{
    let text = display.text(slot);
    if text.is_empty() {
        return None;
    }
    Some(writer.write(text))
}
