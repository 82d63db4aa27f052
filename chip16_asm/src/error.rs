use thiserror::Error;

/// Assembler error taxonomy (spec §7, plus the `DuplicateLabel`
/// supplement — the source never checked that a label was defined at
/// most once).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AsmError {
    #[error("line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("label `{name}` referenced but never defined")]
    UnresolvedLabel { name: String },

    #[error("emitted image exceeds the 12-bit address space")]
    AddressOverflow,

    #[error("`{token}` is not a valid number")]
    NumericParseError { token: String },

    #[error("label `{name}` defined more than once")]
    DuplicateLabel { name: String },
}
