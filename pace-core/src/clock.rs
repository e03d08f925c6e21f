//! Clock helpers: resolve "today" in the user's timezone.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date at `now` in an IANA tz like "America/Chicago".
pub fn local_date_at(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Today's date in `tz`.
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    local_date_at(Utc::now(), tz)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_crosses_midnight() {
        // 03:00 UTC on Feb 21 is still Feb 20 in Chicago (UTC-6)
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 3, 0, 0).unwrap();
        let local = local_date_at(now, "America/Chicago").unwrap();
        assert_eq!(local, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
    }

    #[test]
    fn test_invalid_timezone() {
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 3, 0, 0).unwrap();
        assert!(local_date_at(now, "Mars/Olympus").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-01-16 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
        assert!(parse_date("16/01/2024").is_err());
    }
}
