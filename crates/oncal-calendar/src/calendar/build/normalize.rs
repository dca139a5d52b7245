use std::fmt;

use oncal_core::constants::WEEKDAY_NAMES;
use oncal_core::types::FieldKind;

use crate::calendar::parse::{Expression, FieldSet};

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.weekdays().is_full(FieldKind::DayOfWeek) {
            write_runs(f, self.weekdays().iter(), |f, value| {
                f.write_str(weekday_abbreviation(value))
            })?;
            f.write_str(" ")?;
        }

        write_field(f, self.years(), FieldKind::Year, 4)?;
        f.write_str("-")?;
        write_field(f, self.months(), FieldKind::Month, 2)?;

        if self.days().has_negative() {
            // ~01 is the last day, so magnitudes ascend as the set descends
            f.write_str("~")?;
            write_runs(f, self.days().iter().rev().map(|day| -day), |f, value| {
                write!(f, "{value:02}")
            })?;
        } else {
            f.write_str("-")?;
            write_field(f, self.days(), FieldKind::DayOfMonth, 2)?;
        }

        f.write_str(" ")?;
        write_field(f, self.hours(), FieldKind::Hour, 2)?;
        f.write_str(":")?;
        write_field(f, self.minutes(), FieldKind::Minute, 2)?;
        f.write_str(":")?;
        write_field(f, self.seconds(), FieldKind::Second, 2)
    }
}

fn write_field(
    f: &mut fmt::Formatter<'_>,
    set: &FieldSet,
    kind: FieldKind,
    width: usize,
) -> fmt::Result {
    if set.is_full(kind) {
        return f.write_str("*");
    }
    write_runs(f, set.iter(), |f, value| write!(f, "{value:0width$}"))
}

/// Writes ascending values as a comma-separated list, collapsing runs of
/// three or more consecutive values into `first..last`.
fn write_runs(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = i32>,
    mut write_value: impl FnMut(&mut fmt::Formatter<'_>, i32) -> fmt::Result,
) -> fmt::Result {
    let mut runs: Vec<(i32, i32)> = Vec::new();
    for value in values {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == value => *end = value,
            _ => runs.push((value, value)),
        }
    }

    for (i, (start, end)) in runs.into_iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write_value(f, start)?;
        match end - start {
            0 => {}
            1 => {
                f.write_str(",")?;
                write_value(f, end)?;
            }
            _ => {
                f.write_str("..")?;
                write_value(f, end)?;
            }
        }
    }
    Ok(())
}

fn weekday_abbreviation(value: i32) -> &'static str {
    usize::try_from(value)
        .ok()
        .and_then(|index| WEEKDAY_NAMES.get(index))
        .and_then(|name| name.get(..3))
        .unwrap_or("?")
}
