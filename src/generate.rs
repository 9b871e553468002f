//! Password generation.
//!
//! `generate` draws `length` characters uniformly, with replacement, from the
//! pool implied by a `GenerationRequest`. The random source is injected
//! through `IndexSource` so callers (and tests) decide where randomness comes
//! from; `RngIndexSource` adapts any `rand` RNG and is what the CLI uses.

use rand::rngs::ThreadRng;
use rand::{Rng, thread_rng};

use crate::charset::CharacterPool;
use crate::error::GenerateError;

/// Everything needed for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub length: usize,
    pub include_digits: bool,
    pub include_symbols: bool,
}

impl GenerationRequest {
    pub fn new(length: usize, include_digits: bool, include_symbols: bool) -> Self {
        Self {
            length,
            include_digits,
            include_symbols,
        }
    }

    /// The pool this request samples from.
    pub fn pool(&self) -> CharacterPool {
        CharacterPool::build(self.include_digits, self.include_symbols)
    }
}

/// A provider of uniformly distributed indices.
pub trait IndexSource {
    /// Return an index in `[0, bound)`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// `IndexSource` backed by a `rand` RNG.
#[derive(Debug)]
pub struct RngIndexSource<R> {
    rng: R,
}

impl<R: Rng> RngIndexSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngIndexSource<ThreadRng> {
    /// Source drawing from the thread-local CSPRNG.
    pub fn thread() -> Self {
        Self::new(thread_rng())
    }
}

impl<R: Rng> IndexSource for RngIndexSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Build one password for `request`.
///
/// The result has exactly `request.length` characters. No character class is
/// guaranteed to appear; with digits enabled a password may still contain
/// none.
pub fn generate(request: &GenerationRequest, source: &mut impl IndexSource) -> String {
    let pool = request.pool();
    (0..request.length)
        .map(|_| pool.as_slice()[source.next_index(pool.len())])
        .collect()
}

/// Build the two candidate passwords shown after a Generate trigger.
pub fn generate_pair(request: &GenerationRequest, source: &mut impl IndexSource) -> [String; 2] {
    let first = generate(request, source);
    let second = generate(request, source);
    [first, second]
}

/// Parse a textual length.
///
/// Surrounding whitespace is ignored. Anything that is not a whole number, or
/// is negative, is rejected rather than silently producing an empty password.
pub fn parse_length(input: &str) -> Result<usize, GenerateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(GenerateError::InvalidLength {
            input: input.to_string(),
            reason: "length is empty",
        });
    }
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(GenerateError::InvalidLength {
            input: input.to_string(),
            reason: "length must not be negative",
        }),
        Ok(n) => usize::try_from(n).map_err(|_| GenerateError::InvalidLength {
            input: input.to_string(),
            reason: "length is too large",
        }),
        Err(_) => Err(GenerateError::InvalidLength {
            input: input.to_string(),
            reason: "length is not a whole number",
        }),
    }
}
