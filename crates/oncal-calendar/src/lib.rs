//! systemd-style calendar expressions (`OnCalendar=`) and the sequence of
//! instants they describe.
//!
//! The entry point for most callers is [`Schedule`], which accepts one or
//! more newline-separated expressions and yields their elapses in order.

pub mod calendar;
pub mod error;

pub use calendar::{
    CalendarIterator, Expression, FieldSet, Schedule, TimeZoneResolver, ZoneLookup,
    ZonedIterator, parse_start,
};
pub use error::{ParseError, ParseResult};
