use std::sync::Mutex;

use async_trait::async_trait;
use chanport_contract::{Message, WebhookPayload};

use crate::platform::{ChatPlatform, PlatformError};

#[derive(Debug, Clone)]
pub struct PostedMessage {
    pub webhook_url: String,
    pub thread_id: Option<String>,
    pub payload: WebhookPayload,
}

/// Scripted platform used by tests and local dry-runs. Holds a channel's
/// history oldest-first and serves it the way the real API does: pages
/// newest-first, bounded by the `before` cursor.
#[derive(Debug, Default)]
pub struct InMemoryChatPlatform {
    messages: Vec<Message>,
    fail_fetch: bool,
    fail_posts_containing: Option<String>,
    posts: Mutex<Vec<PostedMessage>>,
    cursors: Mutex<Vec<Option<String>>>,
}

impl InMemoryChatPlatform {
    /// `messages` in chronological (oldest-first) order, ids numeric.
    pub fn with_history(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            fail_fetch: true,
            ..Default::default()
        }
    }

    /// Makes every webhook post whose content contains `marker` fail.
    pub fn fail_posts_containing(mut self, marker: impl Into<String>) -> Self {
        self.fail_posts_containing = Some(marker.into());
        self
    }

    pub fn posted(&self) -> Vec<PostedMessage> {
        self.posts.lock().expect("posts lock").clone()
    }

    /// The sequence of `before` cursors the fetcher asked for.
    pub fn requested_cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().expect("cursor lock").clone()
    }

    fn numeric(id: &str) -> u64 {
        id.parse().unwrap_or(0)
    }
}

#[async_trait]
impl ChatPlatform for InMemoryChatPlatform {
    async fn fetch_page(
        &self,
        _credential: &str,
        channel_id: &str,
        before: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Message>, PlatformError> {
        self.cursors
            .lock()
            .expect("cursor lock")
            .push(before.map(str::to_string));

        if self.fail_fetch {
            return Err(PlatformError::HistoryStatus {
                channel_id: channel_id.to_string(),
                status: 403,
            });
        }

        let cutoff = before.map(Self::numeric);
        let page: Vec<Message> = self
            .messages
            .iter()
            .rev()
            .filter(|m| cutoff.map_or(true, |c| Self::numeric(&m.id) < c))
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(page)
    }

    async fn post_webhook(
        &self,
        webhook_url: &str,
        thread_id: Option<&str>,
        payload: &WebhookPayload,
    ) -> Result<(), PlatformError> {
        if let Some(marker) = &self.fail_posts_containing {
            if payload.content.contains(marker.as_str()) {
                return Err(PlatformError::WebhookStatus(400));
            }
        }

        self.posts.lock().expect("posts lock").push(PostedMessage {
            webhook_url: webhook_url.to_string(),
            thread_id: thread_id.map(str::to_string),
            payload: payload.clone(),
        });
        Ok(())
    }
}
