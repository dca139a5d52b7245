use std::ops::RangeInclusive;

use crate::constants::{HORIZON_YEAR, MIN_YEAR};

/// One constrained component of a calendar expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    DayOfWeek,
    Year,
    Month,
    DayOfMonth,
    Hour,
    Minute,
    Second,
}

impl FieldKind {
    /// All field kinds, in the order they are parsed and reported.
    pub const ALL: [Self; 7] = [
        Self::DayOfWeek,
        Self::Year,
        Self::Month,
        Self::DayOfMonth,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DayOfWeek => "day-of-week",
            Self::Year => "year",
            Self::Month => "month",
            Self::DayOfMonth => "day-of-month",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }

    /// ## Summary
    /// Returns the inclusive range of values this field accepts.
    ///
    /// Weekdays count from Monday (0) to Sunday (6). Day-of-month also
    /// accepts negated values for days counted from the end of the month,
    /// which are not part of this range.
    #[must_use]
    pub const fn domain(self) -> RangeInclusive<i32> {
        match self {
            Self::DayOfWeek => 0..=6,
            Self::Year => MIN_YEAR..=HORIZON_YEAR - 1,
            Self::Month => 1..=12,
            Self::DayOfMonth => 1..=31,
            Self::Hour => 0..=23,
            Self::Minute | Self::Second => 0..=59,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domains() {
        assert_eq!(FieldKind::DayOfWeek.domain(), 0..=6);
        assert_eq!(FieldKind::Year.domain(), 1970..=2199);
        assert_eq!(FieldKind::DayOfMonth.domain(), 1..=31);
        assert_eq!(FieldKind::Second.domain(), 0..=59);
    }

    #[test]
    fn test_display_names() {
        let names: Vec<String> = FieldKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "day-of-week",
                "year",
                "month",
                "day-of-month",
                "hour",
                "minute",
                "second"
            ]
        );
    }
}
