//! Error types.

// Hand-written, no thiserror.

use crate::mode::Mode;

/// Errors from applying a mode string.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum ModeError {
    /// A mode letter appeared before any `+` or `-`.
    MissingSign {
        /// The offending mode string.
        modes: String,
    },
    /// A mode that requires an argument had none left to consume.
    MissingArg {
        /// The offending mode string.
        modes: String,
        /// `true` if the mode was being set, `false` if unset.
        set: bool,
        /// The mode that was missing its argument.
        mode: Mode,
    },
}

impl std::fmt::Display for ModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeError::MissingSign { modes } => {
                write!(f, "malformed modestring \"{modes}\": missing plus/minus")
            }
            ModeError::MissingArg { modes, set, mode } => {
                let sign = if *set { '+' } else { '-' };
                write!(f, "malformed modestring \"{modes}\": missing mode argument for {sign}{mode}")
            }
        }
    }
}

impl std::error::Error for ModeError {}

impl From<ModeError> for std::io::Error {
    fn from(value: ModeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}

/// Errors from interpreting server-provided data.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// An expected field is missing.
    MissingField(&'static str),
    /// A field has an invalid value.
    InvalidField(&'static str, String),
    /// A message has fewer parameters than its command requires.
    NeedMoreParams(String),
    /// A mode string could not be applied.
    Mode(ModeError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingField(e) => write!(f, "missing field {e}"),
            ParseError::InvalidField(e, a) => write!(f, "invalid field {e}: got \"{a}\""),
            ParseError::NeedMoreParams(cmd) => write!(f, "{cmd}: not enough parameters"),
            ParseError::Mode(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Mode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ModeError> for ParseError {
    fn from(value: ModeError) -> Self {
        ParseError::Mode(value)
    }
}

impl From<ParseError> for std::io::Error {
    fn from(value: ParseError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}
