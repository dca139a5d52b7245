//! Library side of the `oncal` preview tool: argument parsing and the
//! rendering of expressions and their upcoming elapses.

pub mod cli;
pub mod preview;
