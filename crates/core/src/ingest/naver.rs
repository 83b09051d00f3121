use crate::config::Settings;
use crate::error::DigestError;
use crate::ingest::provider::{TrendProvider, MAX_KEYWORD_GROUPS_PER_REQUEST};
use crate::ingest::types::{SearchTrendRequest, SearchTrendResponse};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_URL: &str = "https://openapi.naver.com/v1/datalab/search";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const HEADER_CLIENT_ID: &str = "x-naver-client-id";
const HEADER_CLIENT_SECRET: &str = "x-naver-client-secret";

/// Naver DataLab search-trend client.
#[derive(Debug, Clone)]
pub struct NaverDatalabClient {
    http: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl NaverDatalabClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client_id = settings.require_naver_client_id()?;
        let client_secret = settings.require_naver_client_secret()?;

        let url = std::env::var("NAVER_DATALAB_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let timeout_secs = std::env::var("NAVER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            url,
            client_id,
            client_secret,
            Duration::from_secs(timeout_secs),
        )
    }

    /// Credentials are checked here so that a value unusable as a header fails at
    /// startup rather than on the first request.
    pub fn new(
        url: String,
        client_id: &str,
        client_secret: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HEADER_CLIENT_ID,
            credential_header("NAVER_CLIENT_ID", client_id)?,
        );
        headers.insert(
            HEADER_CLIENT_SECRET,
            credential_header("NAVER_CLIENT_SECRET", client_secret)?,
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Naver DataLab http client")?;

        Ok(Self { http, url, headers })
    }
}

fn credential_header(key: &str, value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        DigestError::config(format!("{key} contains characters not allowed in an HTTP header"))
    })?;
    header.set_sensitive(true);
    Ok(header)
}

#[async_trait::async_trait]
impl TrendProvider for NaverDatalabClient {
    fn provider_name(&self) -> &'static str {
        "naver_datalab"
    }

    async fn fetch_search_trend(
        &self,
        request: &SearchTrendRequest,
    ) -> Result<SearchTrendResponse> {
        anyhow::ensure!(
            (1..=MAX_KEYWORD_GROUPS_PER_REQUEST).contains(&request.keyword_groups.len()),
            "DataLab accepts 1..={MAX_KEYWORD_GROUPS_PER_REQUEST} keyword groups per request (got {})",
            request.keyword_groups.len()
        );

        let res = self
            .http
            .post(&self.url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| DigestError::Upstream {
                stage: "send",
                detail: err.to_string(),
                raw_body: None,
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|err| DigestError::Upstream {
            stage: "read",
            detail: err.to_string(),
            raw_body: None,
        })?;

        if !status.is_success() {
            return Err(DigestError::Upstream {
                stage: "http",
                detail: format!("status={status}"),
                raw_body: Some(text),
            }
            .into());
        }

        parse_response(&text)
    }
}

pub fn parse_response(text: &str) -> Result<SearchTrendResponse> {
    serde_json::from_str::<SearchTrendResponse>(text).map_err(|err| {
        DigestError::Upstream {
            stage: "decode",
            detail: format!("unexpected DataLab response shape: {err}"),
            raw_body: Some(text.to_string()),
        }
        .into()
    })
}
