//! Rendering in the layout of `systemd-analyze calendar`.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use oncal_calendar::{ParseResult, Schedule, ZoneLookup};

const INSTANT_FORMAT: &str = "%a %Y-%m-%d %H:%M:%S %Z";

/// One argument's expressions, their normalized forms and the first elapses
/// of the merged schedule.
#[derive(Debug, Clone)]
pub struct Preview {
    forms: Vec<(String, String)>,
    elapses: Vec<DateTime<Tz>>,
}

impl Preview {
    /// ## Summary
    /// Parses `expressions` (one per line) and collects up to `iterations`
    /// elapses after `start`, in the zone of `start`.
    ///
    /// ## Errors
    /// Returns the `ParseError` of the first malformed expression.
    #[tracing::instrument(level = "debug", skip(start, lookup))]
    pub fn new<L: ZoneLookup + ?Sized>(
        expressions: &str,
        start: &DateTime<Tz>,
        iterations: usize,
        lookup: &mut L,
    ) -> ParseResult<Self> {
        let schedule = Schedule::new(expressions, start, lookup)?;

        let forms = expressions
            .lines()
            .zip(schedule.iterators())
            .map(|(original, iter)| (original.trim().to_string(), iter.normalized()))
            .collect();

        let elapses: Vec<_> = schedule.take(iterations).collect();
        tracing::debug!(count = elapses.len(), "Elapses computed");

        Ok(Self { forms, elapses })
    }

    #[must_use]
    pub fn elapses(&self) -> &[DateTime<Tz>] {
        &self.elapses
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (original, normalized) in &self.forms {
            writeln!(f, "  Original form: {original}")?;
            writeln!(f, "Normalized form: {normalized}")?;
        }

        if self.elapses.is_empty() {
            return writeln!(f, "    Next elapse: never");
        }

        for (i, elapse) in self.elapses.iter().enumerate() {
            if i == 0 {
                writeln!(f, "    Next elapse: {}", elapse.format(INSTANT_FORMAT))?;
            } else {
                writeln!(f, "       Iter. #{}: {}", i + 1, elapse.format(INSTANT_FORMAT))?;
            }
            writeln!(
                f,
                "       (in UTC): {}",
                elapse.with_timezone(&Tz::UTC).format(INSTANT_FORMAT)
            )?;
        }

        Ok(())
    }
}
