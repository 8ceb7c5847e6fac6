use crate::error::GeneratorError;
use pinhole_core::uri::SEPARATOR;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// The set of symbols identifiers are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    /// Builds an alphabet from `symbols`.
    ///
    /// Symbols must be unique ASCII characters other than the path separator.
    pub fn new(symbols: &str) -> Result<Self, GeneratorError> {
        if symbols.is_empty() {
            return Err(GeneratorError::EmptyAlphabet);
        }

        let mut seen = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if !c.is_ascii() {
                return Err(GeneratorError::NonAscii(c));
            }
            if c == SEPARATOR {
                return Err(GeneratorError::ReservedSymbol(c));
            }
            let byte = c as u8;
            if seen.contains(&byte) {
                return Err(GeneratorError::DuplicateSymbol(c));
            }
            seen.push(byte);
        }

        Ok(Self { symbols: seen })
    }

    /// `[A-Za-z0-9]`.
    pub fn alphanumeric() -> Self {
        Self {
            symbols: ALPHANUMERIC.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, index: usize) -> char {
        self.symbols[index] as char
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.symbols.contains(&(c as u8))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::alphanumeric()
    }
}
