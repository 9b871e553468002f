//! Twinpass library crate
//!
//! This crate provides the core functionality for the `twinpass` CLI. It is
//! organized into small modules: `charset` (the letter/digit/symbol pool),
//! `generate` (password generation over an injectable random source),
//! `clipboard` (primary clipboard write with automatic fallback), `session`
//! (the generate and copy triggers), and `entropy` (entropy estimate for a
//! request). The binary `src/main.rs` calls `twinpass_lib::run()`.
//!
//! Public API
//!
//! - `run()` — CLI entrypoint used by the binary.
//!
//! See each module for detailed documentation on functions and behavior.

pub mod charset;
pub mod clipboard;
pub mod entropy;
pub mod error;
pub mod generate;
pub mod log;
pub mod session;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::clipboard::{ArboardClipboard, ClipboardWriter, CommandFallback, Pathway, WriteOutcome};
use crate::error::GenerateError;
use crate::generate::{RngIndexSource, parse_length};
use crate::session::{DisplaySurface, MemoryDisplay, Slot, UiState};

/// Exit code when a requested copy could not be completed.
const EXIT_COPY_FAILED: i32 = 3;

/// Top-level CLI types and runner. Keep `main.rs` thin.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Suppress informational messages on stderr
    #[arg(short = 'q', long = "quiet", global = true, action = ArgAction::SetTrue)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate two candidate passwords
    Generate {
        /// Number of characters per password
        #[arg(short = 'l', long = "length", default_value = "20", value_parser = parse_length)]
        length: usize,

        /// Include digits 0-9 in the pool
        #[arg(short = 'd', long = "digits", action = ArgAction::SetTrue)]
        digits: bool,

        /// Include symbols in the pool
        #[arg(short = 's', long = "symbols", action = ArgAction::SetTrue)]
        symbols: bool,

        /// Copy the first or second password to the clipboard
        #[arg(short = 'c', long = "copy", value_enum)]
        copy: Option<SlotArg>,

        /// Print the entropy estimate on stderr
        #[arg(long = "entropy", action = ArgAction::SetTrue)]
        show_entropy: bool,

        /// Skip the in-process clipboard and use the copy utility directly
        #[arg(long = "fallback-only", action = ArgAction::SetTrue)]
        fallback_only: bool,
    },
    /// Copy arbitrary text to the clipboard
    Copy {
        text: String,

        /// Skip the in-process clipboard and use the copy utility directly
        #[arg(long = "fallback-only", action = ArgAction::SetTrue)]
        fallback_only: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SlotArg {
    #[value(name = "1")]
    First,
    #[value(name = "2")]
    Second,
}

impl From<SlotArg> for Slot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::First => Slot::First,
            SlotArg::Second => Slot::Second,
        }
    }
}

/// Flag values standing in for the length input and toggles.
struct FlagState {
    length: usize,
    digits: bool,
    symbols: bool,
}

impl UiState for FlagState {
    fn length(&self) -> Result<usize, GenerateError> {
        Ok(self.length)
    }

    fn include_digits(&self) -> bool {
        self.digits
    }

    fn include_symbols(&self) -> bool {
        self.symbols
    }
}

/// Display that prints each password to stdout as it is shown.
#[derive(Default)]
struct StdoutDisplay {
    inner: MemoryDisplay,
}

impl DisplaySurface for StdoutDisplay {
    fn set_text(&mut self, slot: Slot, text: String) {
        println!("{}", text);
        self.inner.set_text(slot, text);
    }

    fn text(&self, slot: Slot) -> &str {
        self.inner.text(slot)
    }
}

fn clipboard_writer(fallback_only: bool) -> ClipboardWriter<ArboardClipboard, CommandFallback> {
    let primary = if fallback_only {
        ArboardClipboard::disabled()
    } else {
        ArboardClipboard::new()
    };
    ClipboardWriter::new(primary, CommandFallback::for_platform())
}

/// Warning for a primary copy whose contents die with the process.
///
/// On X11 without a clipboard manager the in-process clipboard stops serving
/// the text as soon as twinpass exits.
fn short_lived_copy_warning(outcome: WriteOutcome, linux: bool) -> Option<&'static str> {
    if linux && outcome == WriteOutcome::Succeeded(Pathway::Primary) {
        Some("the clipboard may be cleared when twinpass exits; use --fallback-only to keep it")
    } else {
        None
    }
}

fn finish_copy(outcome: Option<WriteOutcome>) {
    let Some(outcome) = outcome else {
        return;
    };
    if !outcome.is_success() {
        eprintln!("error: failed to copy to clipboard");
        std::process::exit(EXIT_COPY_FAILED);
    }
    if let Some(msg) = short_lived_copy_warning(outcome, cfg!(target_os = "linux")) {
        log::warn(msg);
    }
}

/// Run the Twinpass CLI.
///
/// Parses CLI arguments and dispatches to module functions. Errors are
/// printed to stderr and cause the process to exit with a non-zero code.
///
/// Behavior summary:
/// - `generate` — print two passwords (one per line) and optionally copy one
///   of them to the clipboard.
/// - `copy` — copy the given text through the same clipboard writer.
///
/// Example:
///
/// ```no_run
/// twinpass_lib::run(); // called from src/main.rs
/// ```
pub fn run() {
    let cli = Cli::parse();
    log::set_quiet(cli.quiet);

    match cli.command {
        Commands::Generate {
            length,
            digits,
            symbols,
            copy,
            show_entropy,
            fallback_only,
        } => {
            let state = FlagState {
                length,
                digits,
                symbols,
            };
            let mut display = StdoutDisplay::default();
            let mut source = RngIndexSource::thread();

            if let Err(e) = session::on_generate(&state, &mut display, &mut source) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }

            if show_entropy && let Ok(request) = session::current_request(&state) {
                let bits = entropy::request_entropy_bits(&request);
                eprintln!(
                    "Estimated entropy: {:.2} bits per password ({})",
                    bits,
                    entropy::verdict(bits)
                );
            }

            if let Some(slot) = copy {
                let mut writer = clipboard_writer(fallback_only);
                let outcome = session::on_password_clicked(&display, slot.into(), &mut writer);
                finish_copy(outcome);
            }
        }
        Commands::Copy {
            text,
            fallback_only,
        } => {
            if text.is_empty() {
                log::info("nothing to copy");
                return;
            }
            let mut writer = clipboard_writer(fallback_only);
            finish_copy(Some(writer.write(&text)));
        }
    }
}
