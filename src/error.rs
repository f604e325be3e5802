use std::fmt;

/// A decimal format pattern failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub(crate) fn before(token: impl fmt::Display) -> CompileError {
        CompileError {
            message: format!("syntax error before: {token}"),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormatCompileError: {}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// Everything that can go wrong while resolving options and formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The pattern string could not be compiled.
    Compile(CompileError),
    /// Contradictory or incomplete options, e.g. a currency format with no
    /// currency supplied.
    Format(String),
    /// A named format is not defined for the locale and number system.
    UnknownFormat(String),
    UnknownLocale(String),
    UnknownNumberSystem(String),
    UnknownCurrency(String),
    /// An option value is out of range or malformed.
    InvalidOption(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "{e}"),
            Error::Format(msg) => write!(f, "FormatError: {msg}"),
            Error::UnknownFormat(msg) => write!(f, "UnknownFormatError: {msg}"),
            Error::UnknownLocale(tag) => write!(f, "UnknownLocaleError: {tag}"),
            Error::UnknownNumberSystem(ns) => write!(f, "UnknownNumberSystemError: {ns}"),
            Error::UnknownCurrency(code) => write!(f, "UnknownCurrencyError: {code}"),
            Error::InvalidOption(msg) => write!(f, "InvalidOptionError: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Self {
        Error::Compile(e)
    }
}
