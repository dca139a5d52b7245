use oncal_core::types::FieldKind;
use thiserror::Error;

/// Calendar expression parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Bad {0}")]
    Field(FieldKind),

    #[error("Wrong number of fields")]
    WrongNumberOfFields,

    #[error("Bad date")]
    BadDate,

    #[error("Bad time")]
    BadTime,

    #[error("Start instant must be timezone-aware")]
    NotTimezoneAware,

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Bad start instant: {0}")]
    BadStart(String),
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;
