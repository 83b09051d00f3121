use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TIME_UNIT_DATE: &str = "date";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrendRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_unit: String,
    pub keyword_groups: Vec<KeywordGroupQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroupQuery {
    pub group_name: String,
    pub keywords: Vec<String>,
}

impl SearchTrendRequest {
    /// Daily series with every keyword queried as its own group, so each result
    /// title is the keyword itself.
    pub fn daily(start_date: NaiveDate, end_date: NaiveDate, keywords: &[String]) -> Self {
        Self {
            start_date,
            end_date,
            time_unit: TIME_UNIT_DATE.to_string(),
            keyword_groups: keywords
                .iter()
                .map(|kw| KeywordGroupQuery {
                    group_name: kw.clone(),
                    keywords: vec![kw.clone()],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchTrendResponse {
    #[serde(default)]
    pub results: Vec<TrendSeries>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendSeries {
    pub title: String,
    #[serde(default)]
    pub data: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrendPoint {
    pub period: NaiveDate,
    pub ratio: f64,
}
