//! Clipboard writing with a primary pathway and an automatic fallback.
//!
//! The primary pathway is the in-process `arboard` clipboard. When it is not
//! available, or when a write through it fails, the writer falls back to a
//! platform copy utility (`pbcopy`, `clip`, `wl-copy`, `xclip`, `xsel`). The
//! fallback works through a short-lived *holder*: it is acquired and
//! populated with the text, asked to copy, and then released on every exit
//! path.
//!
//! Errors never leave `ClipboardWriter::write`; they are logged and folded
//! into a `WriteOutcome`.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use crate::error::ClipboardError;
use crate::log;

/// Which pathway completed a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pathway {
    Primary,
    Fallback,
}

/// Result of a single `ClipboardWriter::write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Succeeded(Pathway),
    Failed,
}

impl WriteOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, WriteOutcome::Succeeded(_))
    }
}

/// The preferred clipboard capability.
pub trait PrimaryClipboard {
    /// Whether the capability exists at all on this platform/session.
    fn is_available(&self) -> bool;

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// A temporary holder used by the fallback pathway.
pub trait CopyHolder {
    /// Perform the synchronous copy of the held text.
    fn copy(&mut self) -> Result<(), ClipboardError>;

    /// Tear the holder down. Must be safe to call after a failed `copy`.
    fn release(&mut self);
}

/// Factory for fallback holders.
pub trait FallbackClipboard {
    type Holder: CopyHolder;

    /// Create a holder already populated with `text`.
    fn acquire(&self, text: &str) -> Result<Self::Holder, ClipboardError>;
}

/// Releases the wrapped holder when dropped.
struct HolderGuard<H: CopyHolder> {
    holder: H,
}

impl<H: CopyHolder> Drop for HolderGuard<H> {
    fn drop(&mut self) {
        self.holder.release();
    }
}

/// Writes text to the clipboard, primary first, fallback on absence/failure.
pub struct ClipboardWriter<P, F> {
    primary: P,
    fallback: F,
}

impl<P: PrimaryClipboard, F: FallbackClipboard> ClipboardWriter<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    /// Copy `text`, trying the primary pathway once and the fallback once.
    pub fn write(&mut self, text: &str) -> WriteOutcome {
        if self.primary.is_available() {
            match self.primary.write_text(text) {
                Ok(()) => {
                    log::info("password copied to clipboard");
                    return WriteOutcome::Succeeded(Pathway::Primary);
                }
                Err(e) => {
                    log::info(&format!("clipboard write failed ({}), trying fallback", e));
                }
            }
        } else {
            log::info("clipboard unavailable, using fallback");
        }
        self.write_fallback(text)
    }

    fn write_fallback(&self, text: &str) -> WriteOutcome {
        let holder = match self.fallback.acquire(text) {
            Ok(holder) => holder,
            Err(e) => {
                log::warn(&format!("copy failed: {}", e));
                return WriteOutcome::Failed;
            }
        };
        let mut guard = HolderGuard { holder };
        match guard.holder.copy() {
            Ok(()) => {
                log::info("password copied using fallback");
                WriteOutcome::Succeeded(Pathway::Fallback)
            }
            Err(e) => {
                log::warn(&format!("copy failed: {}", e));
                WriteOutcome::Failed
            }
        }
    }
}

/// Primary pathway backed by `arboard`.
pub struct ArboardClipboard {
    ctx: Option<arboard::Clipboard>,
}

impl ArboardClipboard {
    /// Connect to the system clipboard; a failed connection leaves the
    /// capability absent instead of erroring.
    pub fn new() -> Self {
        match arboard::Clipboard::new() {
            Ok(ctx) => Self { ctx: Some(ctx) },
            Err(e) => {
                log::info(&format!("clipboard init: {}", e));
                Self { ctx: None }
            }
        }
    }

    /// A primary pathway that reports itself absent.
    pub fn disabled() -> Self {
        Self { ctx: None }
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimaryClipboard for ArboardClipboard {
    fn is_available(&self) -> bool {
        self.ctx.is_some()
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("no clipboard connection".into()))?;
        ctx.set_text(text.to_owned())?;
        Ok(())
    }
}

/// A copy utility invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Copy utilities to try, in order, on the current platform.
pub fn platform_commands() -> Vec<CopyCommand> {
    if cfg!(target_os = "macos") {
        vec![CopyCommand {
            program: "pbcopy",
            args: &[],
        }]
    } else if cfg!(target_os = "windows") {
        vec![CopyCommand {
            program: "clip",
            args: &[],
        }]
    } else {
        vec![
            CopyCommand {
                program: "wl-copy",
                args: &[],
            },
            CopyCommand {
                program: "xclip",
                args: &["-selection", "clipboard"],
            },
            CopyCommand {
                program: "xsel",
                args: &["--clipboard", "--input"],
            },
        ]
    }
}

/// Fallback pathway that pipes the text into an external copy utility.
#[derive(Debug, Clone)]
pub struct CommandFallback {
    commands: Vec<CopyCommand>,
}

impl CommandFallback {
    pub fn new(commands: Vec<CopyCommand>) -> Self {
        Self { commands }
    }

    pub fn for_platform() -> Self {
        Self::new(platform_commands())
    }
}

impl Default for CommandFallback {
    fn default() -> Self {
        Self::for_platform()
    }
}

impl FallbackClipboard for CommandFallback {
    type Holder = ChildHolder;

    fn acquire(&self, text: &str) -> Result<ChildHolder, ClipboardError> {
        let mut holder = ChildHolder {
            commands: self.commands.clone(),
            next: 0,
            text: text.to_owned(),
            program: "",
            child: None,
        };
        holder.start_next(None)?;
        Ok(holder)
    }
}

fn spawn_copy(cmd: &CopyCommand) -> std::io::Result<Child> {
    Command::new(cmd.program)
        .args(cmd.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

/// A running copy utility holding the text on its stdin.
///
/// If the utility fails, the holder moves on to the next configured command
/// until one succeeds or the list is exhausted.
#[derive(Debug)]
pub struct ChildHolder {
    commands: Vec<CopyCommand>,
    next: usize,
    text: String,
    program: &'static str,
    child: Option<Child>,
}

impl ChildHolder {
    /// Start the next usable command and feed it the text. At most one child
    /// is alive at a time.
    fn start_next(&mut self, mut last_err: Option<String>) -> Result<(), ClipboardError> {
        while let Some(cmd) = self.commands.get(self.next).cloned() {
            self.next += 1;
            match spawn_copy(&cmd) {
                Ok(child) => {
                    self.program = cmd.program;
                    self.child = Some(child);
                    match self.fill() {
                        Ok(()) => return Ok(()),
                        Err(e) => {
                            self.release();
                            last_err = Some(format!("{}: {}", cmd.program, e));
                        }
                    }
                }
                Err(e) => last_err = Some(format!("failed to spawn {}: {}", cmd.program, e)),
            }
        }
        Err(ClipboardError::Command(
            last_err.unwrap_or_else(|| "no copy command configured".into()),
        ))
    }

    fn fill(&mut self) -> Result<(), ClipboardError> {
        match self.child.as_mut().and_then(|c| c.stdin.as_mut()) {
            Some(stdin) => Ok(stdin.write_all(self.text.as_bytes())?),
            None => Err(ClipboardError::Command(format!(
                "{} has no stdin",
                self.program
            ))),
        }
    }
}

impl CopyHolder for ChildHolder {
    fn copy(&mut self) -> Result<(), ClipboardError> {
        loop {
            let program = self.program;
            let child = self
                .child
                .as_mut()
                .ok_or_else(|| ClipboardError::Command(format!("{} already released", program)))?;
            // Closing stdin tells the utility the text is complete.
            drop(child.stdin.take());
            // On a wait error the child stays put so `release` can reap it.
            let status = child.wait()?;
            self.child = None;
            if status.success() {
                return Ok(());
            }
            let msg = format!("{} exited with {}", program, status);
            log::info(&msg);
            self.start_next(Some(msg))?;
        }
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            drop(child.stdin.take());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Events = Rc<RefCell<Vec<String>>>;

    struct FakePrimary {
        available: bool,
        succeed: bool,
        events: Events,
    }

    impl PrimaryClipboard for FakePrimary {
        fn is_available(&self) -> bool {
            self.available
        }

        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.events.borrow_mut().push(format!("primary:{}", text));
            if self.succeed {
                Ok(())
            } else {
                Err(ClipboardError::Unavailable("denied".into()))
            }
        }
    }

    struct FakeFallback {
        acquire_ok: bool,
        copy_ok: bool,
        events: Events,
    }

    struct FakeHolder {
        copy_ok: bool,
        events: Events,
    }

    impl FallbackClipboard for FakeFallback {
        type Holder = FakeHolder;

        fn acquire(&self, text: &str) -> Result<FakeHolder, ClipboardError> {
            if !self.acquire_ok {
                return Err(ClipboardError::Command("no utility".into()));
            }
            self.events.borrow_mut().push(format!("acquire:{}", text));
            Ok(FakeHolder {
                copy_ok: self.copy_ok,
                events: self.events.clone(),
            })
        }
    }

    impl CopyHolder for FakeHolder {
        fn copy(&mut self) -> Result<(), ClipboardError> {
            self.events.borrow_mut().push("copy".into());
            if self.copy_ok {
                Ok(())
            } else {
                Err(ClipboardError::Command("copy refused".into()))
            }
        }

        fn release(&mut self) {
            self.events.borrow_mut().push("release".into());
        }
    }

    fn writer(
        available: bool,
        primary_ok: bool,
        copy_ok: bool,
    ) -> (ClipboardWriter<FakePrimary, FakeFallback>, Events) {
        let events: Events = Rc::default();
        let w = ClipboardWriter::new(
            FakePrimary {
                available,
                succeed: primary_ok,
                events: events.clone(),
            },
            FakeFallback {
                acquire_ok: true,
                copy_ok,
                events: events.clone(),
            },
        );
        (w, events)
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let (mut w, events) = writer(true, true, true);
        assert_eq!(w.write("pw"), WriteOutcome::Succeeded(Pathway::Primary));
        assert_eq!(*events.borrow(), vec!["primary:pw".to_string()]);
    }

    #[test]
    fn test_absent_primary_goes_to_fallback() {
        let (mut w, events) = writer(false, true, true);
        assert_eq!(w.write("pw"), WriteOutcome::Succeeded(Pathway::Fallback));
        assert_eq!(*events.borrow(), vec!["acquire:pw", "copy", "release"]);
    }

    #[test]
    fn test_rejected_primary_goes_to_fallback() {
        let (mut w, events) = writer(true, false, true);
        assert_eq!(w.write("pw"), WriteOutcome::Succeeded(Pathway::Fallback));
        assert_eq!(
            *events.borrow(),
            vec!["primary:pw", "acquire:pw", "copy", "release"]
        );
    }

    #[test]
    fn test_failed_copy_still_releases_holder() {
        let (mut w, events) = writer(false, true, false);
        assert_eq!(w.write("pw"), WriteOutcome::Failed);
        assert_eq!(*events.borrow(), vec!["acquire:pw", "copy", "release"]);
    }

    #[test]
    fn test_failed_acquire_reports_failed() {
        let events: Events = Rc::default();
        let mut w = ClipboardWriter::new(
            FakePrimary {
                available: false,
                succeed: false,
                events: events.clone(),
            },
            FakeFallback {
                acquire_ok: false,
                copy_ok: true,
                events: events.clone(),
            },
        );
        assert_eq!(w.write("pw"), WriteOutcome::Failed);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_missing_command_fails_without_panic() {
        let fallback = CommandFallback::new(vec![CopyCommand {
            program: "twinpass-no-such-copy-utility",
            args: &[],
        }]);
        let mut w = ClipboardWriter::new(ArboardClipboard::disabled(), fallback);
        assert_eq!(w.write("pw"), WriteOutcome::Failed);
    }

    #[cfg(unix)]
    fn command(program: &'static str) -> CopyCommand {
        CopyCommand { program, args: &[] }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_fallback_succeeds() {
        let fallback = CommandFallback::new(vec![command("cat")]);
        let mut w = ClipboardWriter::new(ArboardClipboard::disabled(), fallback);
        assert_eq!(w.write("pw"), WriteOutcome::Succeeded(Pathway::Fallback));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_fallback_nonzero_exit_fails() {
        let fallback = CommandFallback::new(vec![command("false")]);
        let mut w = ClipboardWriter::new(ArboardClipboard::disabled(), fallback.clone());
        assert_eq!(w.write("pw"), WriteOutcome::Failed);

        // `false` may exit before the text is written, failing acquire instead.
        if let Ok(mut holder) = fallback.acquire("pw") {
            assert!(holder.copy().is_err());
            assert!(holder.child.is_none());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_fallback_moves_past_failing_utility() {
        let fallback = CommandFallback::new(vec![command("false"), command("cat")]);
        let mut w = ClipboardWriter::new(ArboardClipboard::disabled(), fallback);
        assert_eq!(w.write("pw"), WriteOutcome::Succeeded(Pathway::Fallback));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_fallback_skips_unspawnable_utility() {
        let fallback = CommandFallback::new(vec![
            command("twinpass-no-such-copy-utility"),
            command("cat"),
        ]);
        let mut w = ClipboardWriter::new(ArboardClipboard::disabled(), fallback);
        assert_eq!(w.write("pw"), WriteOutcome::Succeeded(Pathway::Fallback));
    }

    #[cfg(unix)]
    #[test]
    fn test_filled_holder_release_reaps_child() {
        let fallback = CommandFallback::new(vec![command("cat")]);
        let mut holder = fallback.acquire("pw").unwrap();
        assert!(holder.child.is_some());
        holder.release();
        assert!(holder.child.is_none());
        // A second release is harmless.
        holder.release();
    }

    #[test]
    fn test_outcome_is_success() {
        assert!(WriteOutcome::Succeeded(Pathway::Primary).is_success());
        assert!(WriteOutcome::Succeeded(Pathway::Fallback).is_success());
        assert!(!WriteOutcome::Failed.is_success());
    }

    #[test]
    fn test_platform_commands_not_empty() {
        assert!(!platform_commands().is_empty());
    }
}
