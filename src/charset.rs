//! Character subsets and per-request pool assembly.
//!
//! The pool is always laid out letters first, then digits, then symbols, so
//! the same request always yields the same pool (the output is random, the
//! pool is not).

pub const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "~`!@#$%^&*()_-+={[}],|:;<>.?/";

/// The characters eligible for sampling in one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterPool {
    chars: Vec<char>,
}

impl CharacterPool {
    /// Build the pool for the given toggles. Letters are always included.
    pub fn build(include_digits: bool, include_symbols: bool) -> Self {
        let mut chars: Vec<char> = LETTERS.chars().collect();
        if include_digits {
            chars.extend(DIGITS.chars());
        }
        if include_symbols {
            chars.extend(SYMBOLS.chars());
        }
        Self { chars }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false: the letter subset is never empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}
