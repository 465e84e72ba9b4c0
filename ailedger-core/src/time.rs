//! Time utilities: timezone-aware "today" for default dates.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date of `now` in an IANA tz like "America/Chicago".
pub fn date_in_timezone(now: DateTime<Utc>, tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Today's date in the given timezone.
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    date_in_timezone(Utc::now(), tz)
}

/// UTC calendar date of a unix timestamp (seconds), e.g. a block time.
pub fn date_from_unix(secs: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}
