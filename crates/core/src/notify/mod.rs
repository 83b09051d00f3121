pub mod telegram;

pub use telegram::TelegramNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn channel_name(&self) -> &'static str;

    async fn send_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Prints the message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct StdoutNotifier;

#[async_trait::async_trait]
impl Notifier for StdoutNotifier {
    fn channel_name(&self) -> &'static str {
        "stdout"
    }

    async fn send_text(&self, text: &str) -> anyhow::Result<()> {
        println!("{text}");
        Ok(())
    }
}
