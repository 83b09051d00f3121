use crate::config::Settings;
use crate::error::DigestError;
use crate::notify::Notifier;
use anyhow::Context;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: reqwest::Client,
    base_url: String,
    bot_token: String,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let bot_token = settings.require_telegram_bot_token()?.to_string();
        let chat_id = settings.require_telegram_chat_id()?;

        let base_url = std::env::var("TELEGRAM_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("TELEGRAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(
            base_url,
            bot_token,
            chat_id,
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn new(
        base_url: String,
        bot_token: String,
        chat_id: i64,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Telegram http client")?;

        Ok(Self {
            http,
            base_url,
            bot_token,
            chat_id,
        })
    }

    // The token is part of the path; never log this URL.
    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn channel_name(&self) -> &'static str {
        "telegram"
    }

    async fn send_text(&self, text: &str) -> anyhow::Result<()> {
        let chat_id = self.chat_id.to_string();
        let form = [("chat_id", chat_id.as_str()), ("text", text)];

        let res = self
            .http
            .post(self.send_message_url())
            .form(&form)
            .send()
            .await
            .map_err(|err| DigestError::Delivery {
                // reqwest errors embed the URL, which carries the bot token.
                detail: err.without_url().to_string(),
                raw_body: None,
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.ok();
            return Err(DigestError::Delivery {
                detail: format!("status={status}"),
                raw_body: body,
            }
            .into());
        }

        tracing::info!(chat_id = self.chat_id, chars = text.chars().count(), "telegram message sent");
        Ok(())
    }
}
