use std::fmt;

// Upstream error bodies are echoed into messages up to this many characters.
const BODY_EXCERPT_CHARS: usize = 300;

/// Failure categories of a digest run. Carried inside `anyhow::Error`; callers use
/// `downcast_ref::<DigestError>()` to tell them apart.
#[derive(Debug, Clone)]
pub enum DigestError {
    /// Missing or invalid configuration. Raised before any network call.
    Config { detail: String },

    /// The trend API answered with a non-success status or an unusable body.
    Upstream {
        stage: &'static str,
        detail: String,
        raw_body: Option<String>,
    },

    /// Fewer than two distinct dates across the batch.
    InsufficientData { distinct_dates: usize },

    /// The messaging API rejected the message.
    Delivery {
        detail: String,
        raw_body: Option<String>,
    },
}

impl DigestError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Upstream { .. } => "upstream",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::Delivery { .. } => "delivery",
        }
    }

    /// Response body returned by the remote API, when one was read.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Upstream { raw_body, .. } | Self::Delivery { raw_body, .. } => {
                raw_body.as_deref()
            }
            _ => None,
        }
    }
}

fn write_body_excerpt(f: &mut fmt::Formatter<'_>, raw_body: Option<&str>) -> fmt::Result {
    let Some(body) = raw_body.map(str::trim).filter(|b| !b.is_empty()) else {
        return Ok(());
    };

    let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    if excerpt.len() < body.len() {
        write!(f, "; body: {excerpt}...")
    } else {
        write!(f, "; body: {excerpt}")
    }
}

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { detail } => write!(f, "configuration error: {detail}"),
            Self::Upstream {
                stage,
                detail,
                raw_body,
            } => {
                write!(f, "trend API error (stage={stage}): {detail}")?;
                write_body_excerpt(f, raw_body.as_deref())
            }
            Self::InsufficientData { distinct_dates } => write!(
                f,
                "fewer than 2 dates to compare (found {distinct_dates}); check that the trend data is sufficient"
            ),
            Self::Delivery { detail, raw_body } => {
                write!(f, "message delivery failed: {detail}")?;
                write_body_excerpt(f, raw_body.as_deref())
            }
        }
    }
}

impl std::error::Error for DigestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_anyhow_round_trip() {
        let err: anyhow::Error = DigestError::InsufficientData { distinct_dates: 1 }.into();
        let err = err.context("group \"brand\" failed");

        let inner = err.downcast_ref::<DigestError>().unwrap();
        assert_eq!(inner.kind(), "insufficient_data");
        assert!(format!("{err:#}").contains("found 1"));
    }

    #[test]
    fn shows_remote_error_body() {
        let err = DigestError::Delivery {
            detail: "status=400 Bad Request".to_string(),
            raw_body: Some(r#"{"ok":false,"description":"Bad Request: chat not found"}"#.to_string()),
        };
        assert_eq!(
            err.to_string(),
            r#"message delivery failed: status=400 Bad Request; body: {"ok":false,"description":"Bad Request: chat not found"}"#
        );
        assert!(err.raw_body().unwrap().contains("chat not found"));
    }

    #[test]
    fn truncates_long_bodies() {
        let err = DigestError::Upstream {
            stage: "http",
            detail: "status=500 Internal Server Error".to_string(),
            raw_body: Some("가".repeat(BODY_EXCERPT_CHARS + 50)),
        };
        let msg = err.to_string();
        assert!(msg.ends_with("..."), "{msg}");
        assert_eq!(msg.matches('가').count(), BODY_EXCERPT_CHARS);
    }

    #[test]
    fn omits_empty_body() {
        let err = DigestError::Upstream {
            stage: "http",
            detail: "status=502 Bad Gateway".to_string(),
            raw_body: Some("  ".to_string()),
        };
        assert_eq!(err.to_string(), "trend API error (stage=http): status=502 Bad Gateway");
        assert_eq!(DigestError::config("x").raw_body(), None);
    }
}
