//! Time zone lookup and wall-clock resolution.
//!
//! Zone names are resolved through an injected [`ZoneLookup`] so callers and
//! tests decide where zone data comes from. [`TimeZoneResolver`] is the
//! default, backed by the IANA database bundled with `chrono-tz`.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{ParseError, ParseResult};

/// Capability to turn a zone name into zone rules.
pub trait ZoneLookup {
    /// Returns the zone called `name`, or `None` if there is no such zone.
    fn lookup(&mut self, name: &str) -> Option<Tz>;
}

/// Resolver for IANA time zone identifiers.
///
/// Keeps a cache of resolved names, so repeated expressions naming the same
/// zone parse it once.
#[derive(Debug, Default)]
pub struct TimeZoneResolver {
    cache: HashMap<String, Tz>,
}

impl TimeZoneResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Resolves a zone identifier to a `chrono_tz::Tz`.
    ///
    /// Vendor prefixes some calendar clients put in front of IANA names
    /// (`/mozilla.org/`, `/softwarestudio.org/`) are stripped first.
    ///
    /// ## Errors
    /// Returns `ParseError::UnknownTimezone` if the name cannot be resolved.
    ///
    /// ## Side Effects
    /// Caches successful resolutions.
    pub fn resolve(&mut self, tzid: &str) -> ParseResult<Tz> {
        if let Some(tz) = self.cache.get(tzid) {
            return Ok(*tz);
        }

        let tz = Tz::from_str(normalize_tzid(tzid))
            .map_err(|_e| ParseError::UnknownTimezone(tzid.to_string()))?;

        tracing::trace!(tzid, resolved = %tz.name(), "Resolved timezone");

        self.cache.insert(tzid.to_string(), tz);

        Ok(tz)
    }
}

impl ZoneLookup for TimeZoneResolver {
    fn lookup(&mut self, name: &str) -> Option<Tz> {
        self.resolve(name).ok()
    }
}

fn normalize_tzid(tzid: &str) -> &str {
    tzid.strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid)
}

/// ## Summary
/// Attaches `zone` to a wall-clock time.
///
/// Returns `None` for times skipped by a forward transition. Times repeated
/// by a backward transition resolve to their first occurrence, i.e. the
/// offset in force before the transition.
#[must_use]
pub fn resolve_local<Z: TimeZone>(zone: &Z, local_time: &NaiveDateTime) -> Option<DateTime<Z>> {
    match zone.from_local_datetime(local_time) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest),
        LocalResult::None => None,
    }
}
