//! Naive occurrence iterator.
//!
//! Walks a zone-less cursor forward field by field, from year down to
//! second. Whenever a field has to move, every lower field is reset and the
//! walk starts over at the year, because a lower field can only be settled
//! once all higher ones are.

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use oncal_core::constants::{HORIZON_YEAR, days_in_month};

use crate::calendar::parse::Expression;
use crate::error::ParseResult;

/// Iterator over the wall-clock times matching an [`Expression`], strictly
/// after a start time.
///
/// Ends once the cursor reaches the horizon year (2200).
#[derive(Debug, Clone)]
pub struct CalendarIterator {
    expression: Expression,
    cursor: NaiveDateTime,
    negative_days: bool,
    finished: bool,
}

impl CalendarIterator {
    /// ## Summary
    /// Parses `expression` and starts iterating after `start`.
    ///
    /// ## Errors
    /// Returns a `ParseError` if the expression is malformed.
    pub fn new(expression: &str, start: NaiveDateTime) -> ParseResult<Self> {
        Ok(Self::from_expression(Expression::parse(expression)?, start))
    }

    /// Starts iterating over an already parsed expression. Sub-second
    /// precision of `start` is dropped.
    #[must_use]
    pub fn from_expression(expression: Expression, start: NaiveDateTime) -> Self {
        let negative_days = expression.days().has_negative();
        Self {
            expression,
            cursor: start.with_nanosecond(0).unwrap_or(start),
            negative_days,
            finished: false,
        }
    }

    #[must_use]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Finds the next match after the cursor. `None` means the horizon was
    /// reached or the calendar ran out of representable dates.
    fn find_next(&mut self) -> Option<NaiveDateTime> {
        self.cursor = self.cursor.checked_add_signed(TimeDelta::seconds(1))?;

        loop {
            if self.cursor.year() >= HORIZON_YEAR {
                return None;
            }

            self.advance_year()?;

            if self.advance_month()? {
                continue;
            }

            if self.advance_day()? {
                continue;
            }

            if self.advance_hour()? {
                continue;
            }

            if self.advance_minute()? {
                continue;
            }

            if self.advance_second()? {
                continue;
            }

            return Some(self.cursor);
        }
    }

    /// Jumps to January 1st of the next allowed year, if the current one is
    /// not allowed.
    fn advance_year(&mut self) -> Option<()> {
        let years = self.expression.years();
        let year = self.cursor.year();

        if years.contains(year) {
            return Some(());
        }

        let next = years
            .next_at_or_after(year)
            .filter(|next| *next < HORIZON_YEAR)?;
        self.cursor = midnight(NaiveDate::from_ymd_opt(next, 1, 1)?);
        Some(())
    }

    /// Jumps to the first day of the next allowed month. A jump past
    /// December lands in the following year, which the year check then
    /// validates.
    fn advance_month(&mut self) -> Option<bool> {
        let months = self.expression.months();
        let month = self.cursor.month();

        if months.matches(month) {
            return Some(false);
        }

        let first = match i32::try_from(month).ok().and_then(|m| months.next_at_or_after(m)) {
            Some(next) => NaiveDate::from_ymd_opt(self.cursor.year(), to_u32(next)?, 1)?,
            None => NaiveDate::from_ymd_opt(
                self.cursor.year().checked_add(1)?,
                to_u32(months.first()?)?,
                1,
            )?,
        };

        self.cursor = midnight(first);
        Some(true)
    }

    /// Scans forward one day at a time until both the weekday and the
    /// day-of-month match. Stops early on the first day of a new month so
    /// months that cannot match are skipped whole by the month check.
    fn advance_day(&mut self) -> Option<bool> {
        let mut needle = self.cursor.date();

        if self.matches_day(needle) {
            return Some(false);
        }

        loop {
            needle = needle.succ_opt()?;
            if needle.day() == 1 || self.matches_day(needle) {
                break;
            }
        }

        self.cursor = midnight(needle);
        Some(true)
    }

    fn matches_day(&self, date: NaiveDate) -> bool {
        self.expression
            .weekdays()
            .matches(date.weekday().num_days_from_monday())
            && self.matches_day_of_month(date)
    }

    fn matches_day_of_month(&self, date: NaiveDate) -> bool {
        let days = self.expression.days();

        if days.matches(date.day()) {
            return true;
        }

        if !self.negative_days {
            return false;
        }

        // 1 on the last day of the month, 2 on the one before, ...
        let from_end = date
            .day()
            .abs_diff(days_in_month(date.year(), date.month()) + 1);
        i32::try_from(from_end).is_ok_and(|n| days.contains(-n))
    }

    /// Moves to the next allowed hour of the day, or to midnight of the next
    /// day when none is left.
    fn advance_hour(&mut self) -> Option<bool> {
        let hours = self.expression.hours();
        let hour = self.cursor.hour();

        if hours.matches(hour) {
            return Some(false);
        }

        let date = self.cursor.date();
        self.cursor = match hours.next_at_or_after(i32::try_from(hour).ok()?) {
            Some(next) => date.and_hms_opt(to_u32(next)?, 0, 0)?,
            None => midnight(date.succ_opt()?),
        };
        Some(true)
    }

    /// Moves to the next allowed minute of the hour, or to the top of the
    /// next hour when none is left.
    fn advance_minute(&mut self) -> Option<bool> {
        let minutes = self.expression.minutes();
        let minute = self.cursor.minute();

        if minutes.matches(minute) {
            return Some(false);
        }

        let hour_start = self.cursor.with_minute(0)?.with_second(0)?;
        self.cursor = match minutes.next_at_or_after(i32::try_from(minute).ok()?) {
            Some(next) => hour_start.with_minute(to_u32(next)?)?,
            None => hour_start.checked_add_signed(TimeDelta::hours(1))?,
        };
        Some(true)
    }

    /// Moves to the next allowed second. With a single allowed second the
    /// cursor jumps straight to it, possibly in the next minute.
    fn advance_second(&mut self) -> Option<bool> {
        let seconds = self.expression.seconds();
        let second = i32::try_from(self.cursor.second()).ok()?;

        if seconds.contains(second) {
            return Some(false);
        }

        let delta = if let Some(target) = seconds.single() {
            (target - second).rem_euclid(60)
        } else {
            seconds.next_at_or_after(second).unwrap_or(60) - second
        };

        self.cursor = self
            .cursor
            .checked_add_signed(TimeDelta::seconds(i64::from(delta)))?;
        Some(true)
    }
}

impl Iterator for CalendarIterator {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let found = self.find_next();
        if found.is_none() {
            tracing::debug!(cursor = %self.cursor, "Calendar iterator exhausted");
            self.finished = true;
        }
        found
    }
}

impl FusedIterator for CalendarIterator {}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn to_u32(value: i32) -> Option<u32> {
    u32::try_from(value).ok()
}
