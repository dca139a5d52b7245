//! Calendar expression parsing.
//!
//! - Field: the per-field value grammar
//! - Expression: decomposition of whole expressions into fields
//! - Start: start instants given as text

mod expression;
mod field;
mod start;

pub use expression::{Decomposed, Expression, decompose};
pub use field::FieldSet;
pub use start::parse_start;
