use crate::error::DigestError;
use crate::ingest::types::SearchTrendResponse;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Day-over-day change of one keyword between `d_2` and `d_1`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRecord {
    pub keyword: String,
    pub ratio_d_2: Option<f64>,
    pub ratio_d_1: Option<f64>,
    pub diff: Option<f64>,
    /// `None` when the older ratio is zero or either ratio is missing.
    pub pct_change: Option<f64>,
}

impl DeltaRecord {
    pub fn new(keyword: impl Into<String>, ratio_d_2: Option<f64>, ratio_d_1: Option<f64>) -> Self {
        let diff = match (ratio_d_2, ratio_d_1) {
            (Some(prev), Some(cur)) => Some(cur - prev),
            _ => None,
        };
        let pct_change = match (diff, ratio_d_2) {
            (Some(diff), Some(prev)) if prev != 0.0 => Some(diff / prev * 100.0),
            _ => None,
        };

        Self {
            keyword: keyword.into(),
            ratio_d_2,
            ratio_d_1,
            diff,
            pct_change,
        }
    }
}

/// One batch of records sharing the comparison dates.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub date_d_2: NaiveDate,
    pub date_d_1: NaiveDate,
    pub records: Vec<DeltaRecord>,
}

/// Reduces raw series to the two most recent dates of the batch.
///
/// Every keyword keeps only its last two points. `d_2`/`d_1` are the two latest
/// distinct dates across those tails, shared by all records. Records come back in
/// `keyword_order`; a keyword whose tail misses one of the dates gets `None` there.
pub fn build_report(
    response: &SearchTrendResponse,
    keyword_order: &[String],
) -> anyhow::Result<BatchReport> {
    let mut tails: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for series in &response.results {
        tails
            .entry(series.title.as_str())
            .or_default()
            .extend(series.data.iter().map(|p| (p.period, p.ratio)));
    }
    for points in tails.values_mut() {
        points.sort_by_key(|(date, _)| *date);
        let skip = points.len().saturating_sub(2);
        points.drain(..skip);
    }

    let dates: BTreeSet<NaiveDate> = tails.values().flatten().map(|(date, _)| *date).collect();
    let mut latest = dates.iter().rev().copied();
    let (date_d_1, date_d_2) = match (latest.next(), latest.next()) {
        (Some(d1), Some(d2)) => (d1, d2),
        _ => {
            return Err(DigestError::InsufficientData {
                distinct_dates: dates.len(),
            }
            .into())
        }
    };

    for title in tails.keys() {
        if !keyword_order.iter().any(|kw| kw == title) {
            tracing::warn!(%title, "trend result for unconfigured keyword ignored");
        }
    }

    let records = keyword_order
        .iter()
        .map(|keyword| {
            let tail = tails.get(keyword.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            let ratio_at = |date: NaiveDate| {
                tail.iter()
                    .rev()
                    .find(|(d, _)| *d == date)
                    .map(|(_, ratio)| *ratio)
            };

            let record = DeltaRecord::new(keyword.as_str(), ratio_at(date_d_2), ratio_at(date_d_1));
            if record.ratio_d_2.is_none() || record.ratio_d_1.is_none() {
                tracing::warn!(
                    %keyword,
                    %date_d_2,
                    %date_d_1,
                    "keyword has no data for one of the comparison dates"
                );
            }
            record
        })
        .collect();

    Ok(BatchReport {
        date_d_2,
        date_d_1,
        records,
    })
}
