//! Occurrence iterators.
//!
//! - Base: naive wall-clock iteration over a parsed expression
//! - Zoned: time zone and daylight-saving handling on top of the base
//! - Schedule: several zoned iterators merged into one sequence

mod base;
mod schedule;
mod zoned;

pub use base::CalendarIterator;
pub use schedule::Schedule;
pub use zoned::ZonedIterator;
