//! Rendering of parsed expressions.
//!
//! `Expression` implements `Display` with the normalized form systemd shows,
//! e.g. `Mon..Fri *-*-* 09:00:00`.

mod normalize;
