//! Calendar expression support.
//!
//! - Parse: field grammar, expression decomposition and start instants
//! - Iter: naive, zoned and multiplexed occurrence iterators
//! - Build: normalized-form rendering of parsed expressions

pub mod build;
pub mod iter;
pub mod parse;
pub mod timezone;

#[cfg(test)]
mod tests;

pub use iter::{CalendarIterator, Schedule, ZonedIterator};
pub use parse::{Expression, FieldSet, parse_start};
pub use timezone::{TimeZoneResolver, ZoneLookup};
