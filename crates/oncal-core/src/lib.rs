//! Shared building blocks for the `oncal` workspace: calendar field kinds,
//! their value domains, the expression alias table, configuration and the
//! core error type.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
