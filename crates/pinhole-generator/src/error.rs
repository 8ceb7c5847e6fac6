use thiserror::Error;

/// Errors returned when configuring a generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("alphabet must not be empty")]
    EmptyAlphabet,
    #[error("alphabet contains non-ascii symbol {0:?}")]
    NonAscii(char),
    #[error("alphabet contains the reserved separator {0:?}")]
    ReservedSymbol(char),
    #[error("alphabet contains duplicate symbol {0:?}")]
    DuplicateSymbol(char),
    #[error("identifier length must be at least 1")]
    ZeroLength,
}
