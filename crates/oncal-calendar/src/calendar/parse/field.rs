//! Field grammar parser.
//!
//! Turns one field token (for example `1..5/2`, `Mon,Wed` or `~7`) into the
//! finite set of values it allows. Terms are tried in this order: `~`
//! (day-of-month only), `,` list, `/` step, `..` interval, literal.

use std::collections::BTreeSet;

use oncal_core::constants::{MAX_REVERSE_DAY, WEEKDAY_NAMES};
use oncal_core::types::FieldKind;

use crate::error::{ParseError, ParseResult};

/// Immutable, ordered set of the values one field of an expression allows.
///
/// Day-of-month sets hold negative values for days counted from the end of
/// the month: `-1` is the last day, `-2` the one before, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSet(BTreeSet<i32>);

impl FieldSet {
    /// Returns the set of every value in the field's domain.
    #[must_use]
    pub fn full(kind: FieldKind) -> Self {
        Self(kind.domain().collect())
    }

    /// ## Summary
    /// Parses a single field token.
    ///
    /// A bare `*` stands for the whole domain, except for weekdays, which
    /// must spell their range out.
    ///
    /// ## Errors
    /// Returns `ParseError::Field(kind)` if the token is malformed or names a
    /// value outside the field's domain.
    pub fn parse(kind: FieldKind, token: &str) -> ParseResult<Self> {
        if token == "*" {
            return if kind == FieldKind::DayOfWeek {
                Err(ParseError::Field(kind))
            } else {
                Ok(Self::full(kind))
            };
        }

        let parser = FieldParser {
            kind,
            reverse: false,
        };

        let values = if kind == FieldKind::DayOfWeek {
            let token = token.strip_suffix(',').unwrap_or(token);
            parser.parse(&token.replace('-', ".."))?
        } else {
            parser.parse(token)?
        };

        if values.is_empty() {
            return Err(ParseError::Field(kind));
        }

        Ok(Self(values))
    }

    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        self.0.contains(&value)
    }

    /// Same as [`FieldSet::contains`], for the unsigned components `chrono`
    /// hands out.
    #[must_use]
    pub fn matches(&self, value: u32) -> bool {
        i32::try_from(value).is_ok_and(|value| self.contains(value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = i32> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn first(&self) -> Option<i32> {
        self.0.first().copied()
    }

    /// Smallest member greater than or equal to `value`.
    #[must_use]
    pub fn next_at_or_after(&self, value: i32) -> Option<i32> {
        self.0.range(value..).next().copied()
    }

    /// The only member, if the set has exactly one.
    #[must_use]
    pub fn single(&self) -> Option<i32> {
        if self.0.len() == 1 { self.first() } else { None }
    }

    /// True if any member counts days from the end of the month.
    #[must_use]
    pub fn has_negative(&self) -> bool {
        self.first().is_some_and(i32::is_negative)
    }

    #[must_use]
    pub fn is_full(&self, kind: FieldKind) -> bool {
        kind.domain().all(|value| self.contains(value))
    }
}

impl FromIterator<i32> for FieldSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Recursive descent over one token. In `reverse` mode (after a `~`) values
/// are stored negated.
#[derive(Clone, Copy)]
struct FieldParser {
    kind: FieldKind,
    reverse: bool,
}

impl FieldParser {
    fn error(self) -> ParseError {
        ParseError::Field(self.kind)
    }

    fn parse(self, s: &str) -> ParseResult<BTreeSet<i32>> {
        if self.kind == FieldKind::DayOfMonth
            && !self.reverse
            && let Some(rest) = s.strip_prefix('~')
        {
            let reverse = Self {
                reverse: true,
                ..self
            };
            return reverse.parse(rest);
        }

        if s.contains(',') {
            let mut result = BTreeSet::new();
            for term in s.split(',') {
                result.extend(self.parse(term)?);
            }
            return Ok(result);
        }

        if let Some((term, step)) = s.split_once('/') {
            return self.parse_step(term, step);
        }

        if let Some((start, end)) = s.split_once("..") {
            return self.parse_interval(start, end);
        }

        let value = self.value(s)?;
        Ok(BTreeSet::from([if self.reverse { -value } else { value }]))
    }

    fn parse_step(self, term: &str, step: &str) -> ParseResult<BTreeSet<i32>> {
        if self.kind == FieldKind::DayOfWeek {
            return Err(self.error());
        }

        let step = usize::try_from(self.literal(step)?).map_err(|_e| self.error())?;
        if step == 0 {
            return Err(self.error());
        }

        let items = self.parse(term)?;

        if items.len() == 1
            && let Some(&start) = items.first()
        {
            let end = if self.reverse {
                -1
            } else {
                *self.kind.domain().end()
            };
            return Ok((start..=end).step_by(step).collect());
        }

        // BTreeSet iterates in ascending order already
        Ok(items.into_iter().step_by(step).collect())
    }

    fn parse_interval(self, start: &str, end: &str) -> ParseResult<BTreeSet<i32>> {
        let start = self.value(start)?;
        let end = self.value(end)?;

        if end < start {
            return Err(self.error());
        }

        if self.reverse {
            Ok((-end..=-start).collect())
        } else {
            Ok((start..=end).collect())
        }
    }

    /// Resolves one literal: a weekday name or a non-negative integer in the
    /// field's domain.
    fn value(self, s: &str) -> ParseResult<i32> {
        if self.kind == FieldKind::DayOfWeek {
            return weekday_index(s).ok_or_else(|| self.error());
        }

        let mut value = self.literal(s)?;

        if self.kind == FieldKind::Year && value < 100 {
            value += if value < 70 { 2000 } else { 1900 };
        }

        if !self.kind.domain().contains(&value) {
            return Err(self.error());
        }

        if self.reverse && value > MAX_REVERSE_DAY {
            return Err(self.error());
        }

        Ok(value)
    }

    /// A run of ASCII digits: no sign, no separators, no whitespace.
    fn literal(self, s: &str) -> ParseResult<i32> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error());
        }
        s.parse().map_err(|_e| self.error())
    }
}

/// Maps `Monday`/`Mon` (any case) to 0 through `Sunday`/`Sun` to 6.
fn weekday_index(name: &str) -> Option<i32> {
    WEEKDAY_NAMES
        .iter()
        .zip(0..)
        .find(|(full, _)| full.eq_ignore_ascii_case(name) || full[..3].eq_ignore_ascii_case(name))
        .map(|(_, index)| index)
}
