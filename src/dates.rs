use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

/// Parse a `DD/MM/YYYY` date as used by meeting records
pub fn parse_uk_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let year_str = parts.next()?.trim();
    if parts.next().is_some() || year_str.len() != 4 {
        return None;
    }
    let year: i32 = year_str.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse an ISO-8601 date or timestamp into its calendar date and, when
/// present, its time of day
pub fn parse_iso(s: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        let local = dt.naive_local();
        return Some((local.date(), Some(local.time())));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some((dt.date(), Some(dt.time())));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| (date, None))
}

/// Parse either supported date format, preferring `DD/MM/YYYY`
pub fn parse_any_date(s: &str) -> Option<NaiveDate> {
    parse_uk_date(s).or_else(|| parse_iso(s).map(|(date, _)| date))
}

/// Parse an `HH:MM` or `HH:MM:SS` time of day
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Deserialize an optional display date, logging and discarding values that
/// cannot be parsed. Used for informational fields like `updated_at` where a
/// bad value should read as "N/A" rather than fail the whole response.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        if value.trim().is_empty() {
            return None;
        }
        let parsed = parse_any_date(&value);
        if parsed.is_none() {
            tracing::warn!(value = %value, "ignoring unparseable date");
        }
        parsed
    }))
}
