//! Zone-aware occurrence iterator.
//!
//! Evaluates an expression against wall-clock time in a time zone, either
//! the zone of the start instant or one named at the end of the expression
//! (`12:00 Europe/Riga`). Wall-clock times that a forward transition skips
//! are dropped; times a backward transition repeats are produced once, with
//! the offset from before the transition. Candidates that resolve to an
//! instant not after the previous one are dropped as well, which happens
//! when the start lies in the repeated hour.

use std::iter::FusedIterator;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use super::base::CalendarIterator;
use crate::calendar::parse::Expression;
use crate::calendar::timezone::{ZoneLookup, resolve_local};
use crate::error::ParseResult;

/// Iterator over the instants matching an expression, expressed in the zone
/// of the start instant.
#[derive(Debug, Clone)]
pub struct ZonedIterator<Z: TimeZone> {
    inner: CalendarIterator,
    /// Zone named inside the expression, if any.
    zone: Option<Tz>,
    output: Z,
    /// Last instant produced, initially the start.
    last: DateTime<Z>,
}

impl<Z: TimeZone> ZonedIterator<Z> {
    /// ## Summary
    /// Parses `expression`, which may end in a zone name, and starts
    /// iterating after `start`.
    ///
    /// The last token is only looked up when it does not start with a digit
    /// or `*`, which no zone name does. When the lookup fails the token stays
    /// part of the expression.
    ///
    /// ## Errors
    /// Returns a `ParseError` if the expression is malformed.
    pub fn new<L: ZoneLookup + ?Sized>(
        expression: &str,
        start: &DateTime<Z>,
        lookup: &mut L,
    ) -> ParseResult<Self> {
        let (expression, zone) = split_zone(expression, lookup);

        let local_start = match zone {
            Some(tz) => start.with_timezone(&tz).naive_local(),
            None => start.naive_local(),
        };

        Ok(Self {
            inner: CalendarIterator::new(expression, local_start)?,
            zone,
            output: start.timezone(),
            last: start.clone(),
        })
    }

    #[must_use]
    pub fn expression(&self) -> &Expression {
        self.inner.expression()
    }

    /// The zone named at the end of the expression, if there was one.
    #[must_use]
    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    /// Normalized form of the expression, followed by its zone name when the
    /// expression carried one.
    #[must_use]
    pub fn normalized(&self) -> String {
        match self.zone {
            Some(tz) => format!("{} {}", self.expression(), tz.name()),
            None => self.expression().to_string(),
        }
    }
}

impl<Z: TimeZone> Iterator for ZonedIterator<Z> {
    type Item = DateTime<Z>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let local = self.inner.next()?;

            let resolved = match self.zone {
                Some(tz) => resolve_local(&tz, &local).map(|dt| dt.with_timezone(&self.output)),
                None => resolve_local(&self.output, &local),
            };

            match resolved {
                Some(instant) if instant > self.last => {
                    self.last = instant.clone();
                    return Some(instant);
                }
                Some(_) => {
                    tracing::trace!(%local, "Skipping wall-clock time already passed");
                }
                None => {
                    tracing::trace!(%local, "Skipping wall-clock time that does not exist");
                }
            }
        }
    }
}

impl<Z: TimeZone> FusedIterator for ZonedIterator<Z> {}

/// Splits a trailing zone name off `expression`.
fn split_zone<'a, L: ZoneLookup + ?Sized>(
    expression: &'a str,
    lookup: &mut L,
) -> (&'a str, Option<Tz>) {
    let trimmed = expression.trim();

    if let Some((rest, candidate)) = trimmed.rsplit_once(char::is_whitespace)
        && !candidate.starts_with(|c: char| c.is_ascii_digit() || c == '*')
        && let Some(tz) = lookup.lookup(candidate)
    {
        tracing::debug!(zone = %tz.name(), "Using timezone from expression");
        return (rest, Some(tz));
    }

    (expression, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::timezone::TimeZoneResolver;

    /// Lookup that counts how often it is asked and knows no zones.
    #[derive(Default)]
    struct CountingLookup {
        calls: usize,
    }

    impl ZoneLookup for CountingLookup {
        fn lookup(&mut self, _name: &str) -> Option<Tz> {
            self.calls += 1;
            None
        }
    }

    #[test]
    fn test_split_zone() {
        let mut resolver = TimeZoneResolver::new();
        assert_eq!(
            split_zone("12:34 Europe/Riga", &mut resolver),
            ("12:34", Some(Tz::Europe__Riga))
        );
        assert_eq!(
            split_zone("Mon 12:34", &mut resolver),
            ("Mon 12:34", None)
        );
        assert_eq!(split_zone("12:34", &mut resolver), ("12:34", None));
    }

    #[test]
    fn test_split_zone_skips_lookup_for_obvious_non_zones() {
        for sample in ["*-* *:*", "Mon 1-10", "Mon *-10", "weekly"] {
            let mut lookup = CountingLookup::default();
            split_zone(sample, &mut lookup);
            assert_eq!(lookup.calls, 0, "{sample}");
        }

        let mut lookup = CountingLookup::default();
        assert_eq!(split_zone("Mon Tue", &mut lookup), ("Mon Tue", None));
        assert_eq!(lookup.calls, 1);
    }

    #[test]
    fn test_normalized_includes_zone() {
        let start = Tz::UTC
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid start");
        let it = ZonedIterator::new("12:34 Europe/Riga", &start, &mut TimeZoneResolver::new())
            .expect("valid expression");
        assert_eq!(it.zone(), Some(Tz::Europe__Riga));
        assert_eq!(it.normalized(), "*-*-* 12:34:00 Europe/Riga");
    }
}
