//! Calendar-day deadline arithmetic.

use chrono::{DateTime, NaiveDate};

/// Days assumed until the deadline when none has been recorded.
pub const DEFAULT_DEADLINE_DAYS: i64 = 60;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole days from `today` to `deadline`, negative once overdue.
///
/// Both sides are calendar dates, so time of day never shifts the count.
pub fn days_until(deadline: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match deadline {
        Some(deadline) => deadline.signed_duration_since(today).num_days(),
        None => DEFAULT_DEADLINE_DAYS,
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter for optional dates that tolerates unparseable input.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_some(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let parsed = super::parse_date(&raw);
        if parsed.is_none() {
            warn!(value = %raw, "ignoring unparseable deadline");
        }
        Ok(parsed)
    }
}
