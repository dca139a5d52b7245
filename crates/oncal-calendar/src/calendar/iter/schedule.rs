//! Merging several expressions into one schedule.

use std::iter::FusedIterator;

use chrono::{DateTime, TimeZone};

use super::zoned::ZonedIterator;
use crate::calendar::timezone::{TimeZoneResolver, ZoneLookup};
use crate::error::{ParseError, ParseResult};

/// One sub-iterator and the instant it produced last.
#[derive(Debug, Clone)]
struct Entry<Z: TimeZone> {
    iter: ZonedIterator<Z>,
    pending: DateTime<Z>,
}

/// The elapses of one or more newline-separated expressions, merged into a
/// single increasing sequence.
///
/// An instant matched by several expressions is produced once. Expressions
/// that run out drop out of the schedule; it ends when all of them have.
#[derive(Debug, Clone)]
pub struct Schedule<Z: TimeZone> {
    entries: Vec<Entry<Z>>,
    last: DateTime<Z>,
}

impl<Z: TimeZone> Schedule<Z> {
    /// ## Summary
    /// Builds a schedule from newline-separated expressions, each optionally
    /// ending in a zone name resolved through `lookup`.
    ///
    /// ## Errors
    /// Returns the `ParseError` of the first malformed expression, or
    /// `ParseError::WrongNumberOfFields` if there are no expressions at all.
    #[tracing::instrument(level = "debug", skip_all, fields(expressions = %expressions.escape_debug()))]
    pub fn new<L: ZoneLookup + ?Sized>(
        expressions: &str,
        start: &DateTime<Z>,
        lookup: &mut L,
    ) -> ParseResult<Self> {
        let entries = expressions
            .lines()
            .map(|line| {
                ZonedIterator::new(line, start, lookup).map(|iter| Entry {
                    iter,
                    pending: start.clone(),
                })
            })
            .collect::<ParseResult<Vec<_>>>()?;

        if entries.is_empty() {
            return Err(ParseError::WrongNumberOfFields);
        }

        tracing::debug!(count = entries.len(), "Schedule built");

        Ok(Self {
            entries,
            last: start.clone(),
        })
    }

    /// ## Summary
    /// Same as [`Schedule::new`], resolving zone names with a fresh
    /// [`TimeZoneResolver`].
    ///
    /// ## Errors
    /// Returns the `ParseError` of the first malformed expression.
    pub fn with_default_zones(expressions: &str, start: &DateTime<Z>) -> ParseResult<Self> {
        Self::new(expressions, start, &mut TimeZoneResolver::new())
    }

    /// Sub-iterators still able to produce instants, in expression order.
    pub fn iterators(&self) -> impl Iterator<Item = &ZonedIterator<Z>> {
        self.entries.iter().map(|entry| &entry.iter)
    }
}

impl<Z: TimeZone> Iterator for Schedule<Z> {
    type Item = DateTime<Z>;

    fn next(&mut self) -> Option<Self::Item> {
        let last = &self.last;

        self.entries.retain_mut(|entry| {
            if entry.pending > *last {
                return true;
            }
            match entry.iter.next() {
                Some(next) => {
                    entry.pending = next;
                    true
                }
                None => false,
            }
        });

        let next = self.entries.iter().map(|entry| &entry.pending).min()?.clone();
        self.last = next.clone();
        Some(next)
    }
}

impl<Z: TimeZone> FusedIterator for Schedule<Z> {}
