/// Calendar constants shared across crates

/// Smallest year an expression may name.
pub const MIN_YEAR: i32 = 1970;

/// Iteration never produces instants in or after this year.
pub const HORIZON_YEAR: i32 = 2200;

/// Largest magnitude accepted after the `~` (days from end of month) marker.
pub const MAX_REVERSE_DAY: i32 = 28;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const ANY_DATE: &str = "*-*-*";
pub const MIDNIGHT: &str = "00:00:00";

pub const MINUTELY: &str = const_str::concat!(ANY_DATE, " *:*:00");
pub const HOURLY: &str = const_str::concat!(ANY_DATE, " *:00:00");
pub const DAILY: &str = const_str::concat!(ANY_DATE, " ", MIDNIGHT);
pub const MONTHLY: &str = const_str::concat!("*-*-01 ", MIDNIGHT);
pub const WEEKLY: &str = const_str::concat!("Mon ", ANY_DATE, " ", MIDNIGHT);
pub const YEARLY: &str = const_str::concat!("*-01-01 ", MIDNIGHT);
pub const QUARTERLY: &str = const_str::concat!("*-01,04,07,10-01 ", MIDNIGHT);
pub const SEMIANNUALLY: &str = const_str::concat!("*-01,07-01 ", MIDNIGHT);

/// Whole-expression shorthands and their expansions.
pub const ALIASES: [(&str, &str); 9] = [
    ("minutely", MINUTELY),
    ("hourly", HOURLY),
    ("daily", DAILY),
    ("monthly", MONTHLY),
    ("weekly", WEEKLY),
    ("yearly", YEARLY),
    ("annually", YEARLY),
    ("quarterly", QUARTERLY),
    ("semiannually", SEMIANNUALLY),
];

/// ## Summary
/// Returns the expansion of a whole-expression alias, compared
/// case-insensitively.
#[must_use]
pub fn expand_alias(expression: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(expression))
        .map(|(_, expansion)| *expansion)
}

/// Longest possible length of a month, leap years included.
#[must_use]
pub const fn max_days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in the given month of the given year.
#[must_use]
pub const fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 2 && !is_leap_year(year) {
        28
    } else {
        max_days_in_month(month)
    }
}
