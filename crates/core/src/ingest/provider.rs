use crate::ingest::types::{SearchTrendRequest, SearchTrendResponse};
use anyhow::Result;
use chrono::NaiveDate;

/// The trend API accepts at most this many keyword groups per request.
pub const MAX_KEYWORD_GROUPS_PER_REQUEST: usize = 5;

#[async_trait::async_trait]
pub trait TrendProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_search_trend(&self, request: &SearchTrendRequest)
        -> Result<SearchTrendResponse>;
}

/// Fetches daily series for `keywords`, splitting them into requests of at most
/// `MAX_KEYWORD_GROUPS_PER_REQUEST`. Results are concatenated in request order.
pub async fn fetch_keywords(
    provider: &dyn TrendProvider,
    keywords: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<SearchTrendResponse> {
    anyhow::ensure!(!keywords.is_empty(), "no keywords to fetch");

    let mut merged = SearchTrendResponse::default();
    for (chunk_idx, chunk) in keywords.chunks(MAX_KEYWORD_GROUPS_PER_REQUEST).enumerate() {
        let request = SearchTrendRequest::daily(start_date, end_date, chunk);
        let response = provider.fetch_search_trend(&request).await?;

        tracing::debug!(
            provider = provider.provider_name(),
            chunk_idx,
            keywords = chunk.len(),
            series = response.results.len(),
            "fetched search trend chunk"
        );
        merged.results.extend(response.results);
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{TrendPoint, TrendSeries};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        requests: Mutex<Vec<SearchTrendRequest>>,
    }

    #[async_trait::async_trait]
    impl TrendProvider for RecordingProvider {
        fn provider_name(&self) -> &'static str {
            "recording"
        }

        async fn fetch_search_trend(
            &self,
            request: &SearchTrendRequest,
        ) -> Result<SearchTrendResponse> {
            self.requests.lock().unwrap().push(request.clone());
            let results = request
                .keyword_groups
                .iter()
                .map(|g| TrendSeries {
                    title: g.group_name.clone(),
                    data: vec![TrendPoint {
                        period: request.end_date,
                        ratio: 1.0,
                    }],
                })
                .collect();
            Ok(SearchTrendResponse { results })
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[tokio::test]
    async fn splits_large_groups_into_batches_of_five() {
        let provider = RecordingProvider::default();
        let keywords: Vec<String> = (1..=12).map(|i| format!("kw{i}")).collect();

        let merged = fetch_keywords(&provider, &keywords, date(1, 1), date(3, 1))
            .await
            .unwrap();

        let requests = provider.requests.lock().unwrap();
        let sizes: Vec<_> = requests.iter().map(|r| r.keyword_groups.len()).collect();
        assert_eq!(sizes, [5, 5, 2]);
        assert!(requests
            .iter()
            .all(|r| r.start_date == date(1, 1) && r.end_date == date(3, 1)));

        let titles: Vec<_> = merged.results.iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles, keywords);
    }

    #[tokio::test]
    async fn single_request_for_five_or_fewer() {
        let provider = RecordingProvider::default();
        let keywords: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();

        fetch_keywords(&provider, &keywords, date(1, 1), date(1, 2))
            .await
            .unwrap();
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_empty_keyword_list() {
        let provider = RecordingProvider::default();
        assert!(fetch_keywords(&provider, &[], date(1, 1), date(1, 2))
            .await
            .is_err());
        assert!(provider.requests.lock().unwrap().is_empty());
    }
}
