use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Calendar date in Korea for the given instant.
pub fn today_kst(now_utc: DateTime<Utc>) -> anyhow::Result<NaiveDate> {
    let kst = chrono::FixedOffset::east_opt(KST_OFFSET_SECS).context("invalid KST offset")?;
    Ok(now_utc.with_timezone(&kst).date_naive())
}

/// Last date to request from the trend API. The API has no same-day data, so the
/// default is yesterday in KST.
pub fn resolve_end_date(
    end_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = end_date_arg {
        return NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid end date {s:?} (expected YYYY-MM-DD)"));
    }

    Ok(today_kst(now_utc)? - Duration::days(1))
}
