use async_trait::async_trait;
use chanport_contract::{Message, WebhookPayload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("history read for channel {channel_id} returned status {status}")]
    HistoryStatus { channel_id: String, status: u16 },
    #[error("webhook post returned status {0}")]
    WebhookStatus(u16),
    #[error("unusable history payload: {0}")]
    InvalidPayload(String),
}

/// The two chat-platform operations the pipeline consumes: a paginated
/// history read and a webhook post. Pages arrive newest-first; ordering is
/// the fetcher's job, not the transport's.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// One history page for a channel or thread, at most `limit` messages,
    /// strictly older than `before` when a cursor is given.
    async fn fetch_page(
        &self,
        credential: &str,
        channel_id: &str,
        before: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Message>, PlatformError>;

    /// Posts one reconstructed message through the destination webhook,
    /// optionally into a thread of the webhook's channel.
    async fn post_webhook(
        &self,
        webhook_url: &str,
        thread_id: Option<&str>,
        payload: &WebhookPayload,
    ) -> Result<(), PlatformError>;
}
