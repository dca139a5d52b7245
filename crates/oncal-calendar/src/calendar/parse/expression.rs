//! Expression decomposition.
//!
//! Splits a full calendar expression into its weekday, date and time
//! sub-fields, fills in defaults for the ones left out and hands each
//! sub-field to the field parser.

use std::str::FromStr;

use oncal_core::constants::{expand_alias, max_days_in_month};
use oncal_core::types::FieldKind;

use super::field::FieldSet;
use crate::error::{ParseError, ParseResult};

/// Raw tokens of an expression, before field parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed {
    /// `None` when the expression names no weekday (all days allowed).
    pub weekday: Option<String>,
    /// Year, month and day-of-month tokens.
    pub date: [String; 3],
    /// Hour, minute and second tokens.
    pub time: [String; 3],
}

/// ## Summary
/// Splits an expression into weekday, date and time tokens.
///
/// The time sub-field is the last token when it contains `:`; the date
/// sub-field is the last remaining token when it contains `-` and starts with
/// a digit or `*`; a single token left in front of those is the weekday.
///
/// ## Errors
/// Returns `ParseError::WrongNumberOfFields` for empty expressions and
/// leftover tokens, `ParseError::BadDate` or `ParseError::BadTime` when a
/// sub-field has the wrong number of components.
pub fn decompose(expression: &str) -> ParseResult<Decomposed> {
    let expression = expand_alias(expression.trim()).unwrap_or(expression);
    let normalized = expression.replace('~', "-~");
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();

    if tokens.is_empty() {
        return Err(ParseError::WrongNumberOfFields);
    }

    let time = match tokens.last() {
        Some(token) if token.contains(':') => {
            let token = tokens.pop().unwrap_or_default();
            split_time(token)?
        }
        _ => default_tokens("0"),
    };

    let date = match tokens.last() {
        Some(token) if is_date_token(token) => {
            let token = tokens.pop().unwrap_or_default();
            split_date(token)?
        }
        _ => default_tokens("*"),
    };

    let weekday = match tokens.as_slice() {
        [] => None,
        [weekday] => Some((*weekday).to_string()),
        _ => return Err(ParseError::WrongNumberOfFields),
    };

    Ok(Decomposed {
        weekday,
        date,
        time,
    })
}

fn is_date_token(token: &str) -> bool {
    token.contains('-') && token.starts_with(|c: char| c.is_ascii_digit() || c == '*')
}

fn default_tokens(value: &str) -> [String; 3] {
    [value.to_string(), value.to_string(), value.to_string()]
}

fn split_time(token: &str) -> ParseResult<[String; 3]> {
    match token.split(':').collect::<Vec<_>>().as_slice() {
        [hour, minute] => Ok([hour.to_string(), minute.to_string(), "0".to_string()]),
        [hour, minute, second] => Ok([hour.to_string(), minute.to_string(), second.to_string()]),
        _ => Err(ParseError::BadTime),
    }
}

fn split_date(token: &str) -> ParseResult<[String; 3]> {
    match token.split('-').collect::<Vec<_>>().as_slice() {
        [month, day] => Ok(["*".to_string(), month.to_string(), day.to_string()]),
        [year, month, day] => Ok([year.to_string(), month.to_string(), day.to_string()]),
        _ => Err(ParseError::BadDate),
    }
}

/// A parsed calendar expression: one value set per field.
///
/// Built once and then read by any number of iterators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    weekdays: FieldSet,
    years: FieldSet,
    months: FieldSet,
    days: FieldSet,
    hours: FieldSet,
    minutes: FieldSet,
    seconds: FieldSet,
}

impl Expression {
    /// ## Summary
    /// Parses a calendar expression such as `Mon..Fri *-*-* 09:00` or
    /// `weekly`.
    ///
    /// Fields are parsed weekday first, then year through second, so the
    /// error names the first offending field.
    ///
    /// ## Errors
    /// Returns a `ParseError` describing the first malformed field, or the
    /// structural problem with the expression.
    #[tracing::instrument(level = "debug", skip(expression), fields(expression = %expression))]
    pub fn parse(expression: &str) -> ParseResult<Self> {
        let Decomposed {
            weekday,
            date: [year, month, day],
            time: [hour, minute, second],
        } = decompose(expression)?;

        let weekdays = match weekday {
            Some(token) => FieldSet::parse(FieldKind::DayOfWeek, &token)?,
            None => FieldSet::full(FieldKind::DayOfWeek),
        };

        let parsed = Self {
            weekdays,
            years: FieldSet::parse(FieldKind::Year, &year)?,
            months: FieldSet::parse(FieldKind::Month, &month)?,
            days: FieldSet::parse(FieldKind::DayOfMonth, &day)?,
            hours: FieldSet::parse(FieldKind::Hour, &hour)?,
            minutes: FieldSet::parse(FieldKind::Minute, &minute)?,
            seconds: FieldSet::parse(FieldKind::Second, &second)?,
        };

        parsed.check_days_fit_months()?;

        tracing::trace!(parsed = ?parsed, "Parsed calendar expression");

        Ok(parsed)
    }

    /// Rejects day sets that no selected month is long enough to contain,
    /// such as `*-02-30`.
    fn check_days_fit_months(&self) -> ParseResult<()> {
        let Some(shortest) = self.days.first() else {
            return Ok(());
        };
        if shortest <= 0 {
            return Ok(());
        }

        let longest_month = self
            .months
            .iter()
            .filter_map(|month| u32::try_from(month).ok())
            .map(max_days_in_month)
            .max()
            .unwrap_or(0);

        if u32::try_from(shortest).is_ok_and(|day| day > longest_month) {
            return Err(ParseError::Field(FieldKind::DayOfMonth));
        }
        Ok(())
    }

    #[must_use]
    pub fn weekdays(&self) -> &FieldSet {
        &self.weekdays
    }

    #[must_use]
    pub fn years(&self) -> &FieldSet {
        &self.years
    }

    #[must_use]
    pub fn months(&self) -> &FieldSet {
        &self.months
    }

    #[must_use]
    pub fn days(&self) -> &FieldSet {
        &self.days
    }

    #[must_use]
    pub fn hours(&self) -> &FieldSet {
        &self.hours
    }

    #[must_use]
    pub fn minutes(&self) -> &FieldSet {
        &self.minutes
    }

    #[must_use]
    pub fn seconds(&self) -> &FieldSet {
        &self.seconds
    }

    /// Returns the value set of the given field.
    #[must_use]
    pub fn field(&self, kind: FieldKind) -> &FieldSet {
        match kind {
            FieldKind::DayOfWeek => &self.weekdays,
            FieldKind::Year => &self.years,
            FieldKind::Month => &self.months,
            FieldKind::DayOfMonth => &self.days,
            FieldKind::Hour => &self.hours,
            FieldKind::Minute => &self.minutes,
            FieldKind::Second => &self.seconds,
        }
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(expression: &str) -> Expression {
        Expression::parse(expression).expect("expression should parse")
    }

    fn set<const N: usize>(values: [i32; N]) -> FieldSet {
        values.into_iter().collect()
    }

    /// Asserts that every field named by `fields` holds its default:
    /// `w`eekday, `y`ear, `m`onth, `d`ay are full, `H`, `M`, `S` are zero.
    fn assert_default(expression: &Expression, fields: &str) {
        for (flag, kind) in "wymdHMS".chars().zip(FieldKind::ALL) {
            if !fields.contains(flag) {
                continue;
            }
            let expected = if matches!(kind, FieldKind::Hour | FieldKind::Minute | FieldKind::Second)
            {
                set([0])
            } else {
                FieldSet::full(kind)
            };
            assert_eq!(expression.field(kind), &expected, "{kind}");
        }
    }

    #[test]
    fn test_decompose_full_expression() {
        let decomposed = decompose("Mon 2023-11-30 11:22:33").expect("valid");
        assert_eq!(decomposed.weekday.as_deref(), Some("Mon"));
        assert_eq!(decomposed.date, ["2023", "11", "30"]);
        assert_eq!(decomposed.time, ["11", "22", "33"]);
    }

    #[test]
    fn test_decompose_defaults() {
        let decomposed = decompose("Fri").expect("valid");
        assert_eq!(decomposed.date, ["*", "*", "*"]);
        assert_eq!(decomposed.time, ["0", "0", "0"]);

        let decomposed = decompose("11-30 8:15").expect("valid");
        assert_eq!(decomposed.weekday, None);
        assert_eq!(decomposed.date, ["*", "11", "30"]);
        assert_eq!(decomposed.time, ["8", "15", "0"]);
    }

    #[test]
    fn test_decompose_reverse_day_marker() {
        let decomposed = decompose("*-*~1").expect("valid");
        assert_eq!(decomposed.date, ["*", "*", "~1"]);

        let decomposed = decompose("Sun *~7/1").expect("valid");
        assert_eq!(decomposed.date, ["*", "*", "~7/1"]);
    }

    #[test]
    fn test_decompose_structural_errors() {
        assert_eq!(decompose(""), Err(ParseError::WrongNumberOfFields));
        assert_eq!(decompose("   "), Err(ParseError::WrongNumberOfFields));
        assert_eq!(
            decompose("Mon *-*-* *:*:* surprise"),
            Err(ParseError::WrongNumberOfFields)
        );
        assert_eq!(decompose("1:2:3:4"), Err(ParseError::BadTime));
        assert_eq!(decompose("12"), Ok(Decomposed {
            weekday: Some("12".to_string()),
            date: default_tokens("*"),
            time: default_tokens("0"),
        }));
        assert_eq!(decompose("1-2-3-4"), Err(ParseError::BadDate));
    }

    #[test]
    fn test_parses_stars() {
        let expression = parse("*-*-* *:*:*");
        assert_default(&expression, "wymd");
        assert_eq!(expression.hours(), &FieldSet::full(FieldKind::Hour));
        assert_eq!(expression.minutes(), &FieldSet::full(FieldKind::Minute));
        assert_eq!(expression.seconds(), &FieldSet::full(FieldKind::Second));
        assert_eq!(expression.years().len(), 230);
    }

    #[test]
    fn test_parses_weekday() {
        for sample in ["Mon", "MON", "Monday", "MONDAY"] {
            let expression = parse(sample);
            assert_default(&expression, "ymdHMS");
            assert_eq!(expression.weekdays(), &set([0]));
        }
    }

    #[test]
    fn test_parses_weekday_with_trailing_comma() {
        let expression = parse("Mon, 12:34");
        assert_default(&expression, "ymdS");
        assert_eq!(expression.weekdays(), &set([0]));
        assert_eq!(expression.hours(), &set([12]));
        assert_eq!(expression.minutes(), &set([34]));
    }

    #[test]
    fn test_parses_date() {
        let expression = parse("2023-11-30");
        assert_default(&expression, "wHMS");
        assert_eq!(expression.years(), &set([2023]));
        assert_eq!(expression.months(), &set([11]));
        assert_eq!(expression.days(), &set([30]));
    }

    #[test]
    fn test_omitted_year() {
        let expression = parse("11-30");
        assert_default(&expression, "wyHMS");
        assert_eq!(expression.months(), &set([11]));
        assert_eq!(expression.days(), &set([30]));
    }

    #[test]
    fn test_two_digit_years() {
        let expression = parse("69-*-*");
        assert_default(&expression, "wmdHMS");
        assert_eq!(expression.years(), &set([2069]));
        assert_eq!(parse("70-*-*").years(), &set([1970]));
    }

    #[test]
    fn test_parses_time() {
        let expression = parse("11:22:33");
        assert_default(&expression, "wymd");
        assert_eq!(expression.hours(), &set([11]));
        assert_eq!(expression.minutes(), &set([22]));
        assert_eq!(expression.seconds(), &set([33]));

        let expression = parse("11:22");
        assert_default(&expression, "wymdS");
    }

    #[test]
    fn test_parses_negative_days() {
        assert_eq!(parse("*-*~1").days(), &set([-1]));
        assert_eq!(parse("*~1").days(), &set([-1]));
        assert_eq!(parse("*-*~1,8").days(), &set([-1, -8]));
        assert_eq!(parse("*-*~1..5/2").days(), &set([-1, -3, -5]));
    }

    #[test]
    fn test_parses_aliases() {
        for sample in ["minutely", "Minutely", "MINUTELY", "MiNuTeLY"] {
            let expression = parse(sample);
            assert_default(&expression, "wymdS");
            assert_eq!(expression.hours(), &FieldSet::full(FieldKind::Hour));
            assert_eq!(expression.minutes(), &FieldSet::full(FieldKind::Minute));
        }

        assert_eq!(parse("weekly").weekdays(), &set([0]));
        assert_eq!(parse("quarterly").months(), &set([1, 4, 7, 10]));
        assert_eq!(parse("semiannually").months(), &set([1, 7]));
        assert_eq!(parse("annually"), parse("yearly"));
        assert_eq!(parse("daily"), parse("00:00"));
        assert_eq!(parse("hourly").minutes(), &set([0]));
        assert_eq!(parse("monthly").days(), &set([1]));
    }

    #[test]
    fn test_rejects_days_no_month_can_hold() {
        assert_eq!(
            Expression::parse("*-02-30"),
            Err(ParseError::Field(FieldKind::DayOfMonth))
        );
        assert_eq!(
            Expression::parse("*-04,06-31"),
            Err(ParseError::Field(FieldKind::DayOfMonth))
        );
        assert!(Expression::parse("*-02-29").is_ok());
        assert!(Expression::parse("*-02,03-31").is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let patterns = [
            "{} *-*-* *:*:*",
            "{}-*-*",
            "*-{}-*",
            "*-*-{}",
            "*-*~{}",
            "{}:*:*",
            "*:{}:*",
            "*:*:{}",
        ];
        let bad_values = [
            "-1", "1000", "ABC", "1-1", "1:1", "Mon/1", "~1", "*/1", "*,1", "1..*",
        ];

        for pattern in patterns {
            for value in bad_values {
                let expression = pattern.replace("{}", value);
                assert!(
                    Expression::parse(&expression).is_err(),
                    "{expression:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_reports_offending_field() {
        let cases = [
            ("* 1-1", FieldKind::DayOfWeek),
            ("1-32", FieldKind::DayOfMonth),
            ("1~29", FieldKind::DayOfMonth),
            ("*-*-5..1", FieldKind::DayOfMonth),
            ("*:1..1_0", FieldKind::Minute),
            ("*:*/0", FieldKind::Minute),
            ("*-13-*", FieldKind::Month),
            ("1900-*-*", FieldKind::Year),
            ("25:00", FieldKind::Hour),
            ("*:*:61", FieldKind::Second),
        ];

        for (expression, kind) in cases {
            let err = Expression::parse(expression).expect_err(expression);
            assert_eq!(err, ParseError::Field(kind), "{expression}");
            assert_eq!(err.to_string(), format!("Bad {kind}"));
        }
    }

    #[test]
    fn test_from_str() {
        let expression: Expression = "Sat,Sun 10:00".parse().expect("valid");
        assert_eq!(expression.weekdays(), &set([5, 6]));
    }
}
