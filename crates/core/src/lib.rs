pub mod domain;
pub mod error;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod time;

#[cfg(test)]
pub(crate) mod test_support;

pub mod config {
    use crate::error::DigestError;

    pub const ENV_NAVER_CLIENT_ID: &str = "NAVER_CLIENT_ID";
    pub const ENV_NAVER_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
    pub const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
    pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub naver_client_id: Option<String>,
        pub naver_client_secret: Option<String>,
        pub telegram_bot_token: Option<String>,
        pub telegram_chat_id: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self::from_lookup(|key| std::env::var(key).ok()))
        }

        /// Builds settings from an arbitrary key lookup. Blank values count as unset.
        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
            let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
            Self {
                naver_client_id: get(ENV_NAVER_CLIENT_ID),
                naver_client_secret: get(ENV_NAVER_CLIENT_SECRET),
                telegram_bot_token: get(ENV_TELEGRAM_BOT_TOKEN),
                telegram_chat_id: get(ENV_TELEGRAM_CHAT_ID),
                sentry_dsn: get("SENTRY_DSN"),
            }
        }

        /// Fails fast with every missing credential named at once.
        pub fn validate(&self, require_telegram: bool) -> anyhow::Result<()> {
            let mut missing = Vec::new();
            if self.naver_client_id.is_none() {
                missing.push(ENV_NAVER_CLIENT_ID);
            }
            if self.naver_client_secret.is_none() {
                missing.push(ENV_NAVER_CLIENT_SECRET);
            }
            if require_telegram {
                if self.telegram_bot_token.is_none() {
                    missing.push(ENV_TELEGRAM_BOT_TOKEN);
                }
                if self.telegram_chat_id.is_none() {
                    missing.push(ENV_TELEGRAM_CHAT_ID);
                }
            }

            if !missing.is_empty() {
                return Err(DigestError::config(format!(
                    "missing required environment variables: {}",
                    missing.join(", ")
                ))
                .into());
            }

            if require_telegram {
                self.require_telegram_chat_id()?;
            }
            Ok(())
        }

        pub fn require_naver_client_id(&self) -> anyhow::Result<&str> {
            require(&self.naver_client_id, ENV_NAVER_CLIENT_ID)
        }

        pub fn require_naver_client_secret(&self) -> anyhow::Result<&str> {
            require(&self.naver_client_secret, ENV_NAVER_CLIENT_SECRET)
        }

        pub fn require_telegram_bot_token(&self) -> anyhow::Result<&str> {
            require(&self.telegram_bot_token, ENV_TELEGRAM_BOT_TOKEN)
        }

        pub fn require_telegram_chat_id(&self) -> anyhow::Result<i64> {
            let raw = require(&self.telegram_chat_id, ENV_TELEGRAM_CHAT_ID)?;
            raw.trim().parse::<i64>().map_err(|_| {
                DigestError::config(format!(
                    "{ENV_TELEGRAM_CHAT_ID} must be an integer chat id (got {raw:?})"
                ))
                .into()
            })
        }
    }

    fn require<'a>(value: &'a Option<String>, key: &str) -> anyhow::Result<&'a str> {
        value
            .as_deref()
            .ok_or_else(|| DigestError::config(format!("{key} is required")).into())
    }

}
