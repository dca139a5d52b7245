//! Start instant parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::calendar::timezone::{ZoneLookup, resolve_local};
use crate::error::{ParseError, ParseResult};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ## Summary
/// Parses the instant iteration starts after.
///
/// Accepted forms are `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` and
/// `YYYY-MM-DDTHH:MM[:SS]`, followed by `Z` or by a space and a zone name.
/// Without either, `default_zone` is used. `now` is the current time in UTC.
///
/// ## Errors
/// Returns `ParseError::NotTimezoneAware` if no zone is given and there is
/// no default, `ParseError::UnknownTimezone` if the zone name does not
/// resolve, and `ParseError::BadStart` for malformed or non-existent times.
pub fn parse_start<L: ZoneLookup + ?Sized>(
    text: &str,
    default_zone: Option<Tz>,
    lookup: &mut L,
) -> ParseResult<DateTime<Tz>> {
    let text = text.trim();

    if text.eq_ignore_ascii_case("now") {
        return Ok(Utc::now().with_timezone(&Tz::UTC));
    }

    let (stamp, zone) = if let Some(stamp) = text.strip_suffix('Z')
        && stamp.ends_with(|c: char| c.is_ascii_digit())
    {
        (stamp, Some(Tz::UTC))
    } else if let Some((stamp, name)) = text.rsplit_once(char::is_whitespace)
        && !name.contains(':')
    {
        let zone = lookup
            .lookup(name)
            .ok_or_else(|| ParseError::UnknownTimezone(name.to_string()))?;
        (stamp.trim_end(), Some(zone))
    } else {
        (text, None)
    };

    let zone = zone.or(default_zone).ok_or(ParseError::NotTimezoneAware)?;
    let local_time = parse_local(stamp)?;

    resolve_local(&zone, &local_time).ok_or_else(|| {
        ParseError::BadStart(format!("{local_time} does not exist in {}", zone.name()))
    })
}

fn parse_local(stamp: &str) -> ParseResult<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(stamp, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(stamp, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ParseError::BadStart(stamp.to_string()))
}
