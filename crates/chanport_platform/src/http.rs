use async_trait::async_trait;
use chanport_contract::{Attachment, Author, Embed, EmbedField, Message, WebhookPayload};
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::debug;

use crate::platform::{ChatPlatform, PlatformError};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Real chat-platform client. History reads authenticate with the bot
/// credential per request; webhook posts need no credential.
#[derive(Debug, Clone)]
pub struct HttpChatPlatform {
    client: reqwest::Client,
    api_base: String,
}

impl HttpChatPlatform {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }
}

impl HttpChatPlatform {
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self::new(reqwest::Client::new(), api_base)
    }
}

impl Default for HttpChatPlatform {
    fn default() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl ChatPlatform for HttpChatPlatform {
    async fn fetch_page(
        &self,
        credential: &str,
        channel_id: &str,
        before: Option<&str>,
        limit: u8,
    ) -> Result<Vec<Message>, PlatformError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);
        let mut request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bot {credential}"))
            .query(&[("limit", limit.to_string())]);
        if let Some(cursor) = before {
            request = request.query(&[("before", cursor)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::HistoryStatus {
                channel_id: channel_id.to_string(),
                status: status.as_u16(),
            });
        }

        let page: Vec<WireMessage> = response.json().await?;
        debug!(channel_id = %channel_id, count = page.len(), "fetched history page");
        Ok(page.into_iter().map(Message::from).collect())
    }

    async fn post_webhook(
        &self,
        webhook_url: &str,
        thread_id: Option<&str>,
        payload: &WebhookPayload,
    ) -> Result<(), PlatformError> {
        let mut request = self.client.post(webhook_url).json(payload);
        if let Some(thread) = thread_id {
            request = request.query(&[("thread_id", thread)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::WebhookStatus(status.as_u16()));
        }
        Ok(())
    }
}

// Upstream wire shapes, mapped into contract types at the edge so nothing
// past this module knows about the platform's JSON layout.

#[derive(Debug, Deserialize)]
struct WireMessage {
    id: String,
    #[serde(default)]
    content: String,
    author: WireAuthor,
    #[serde(default)]
    attachments: Vec<WireAttachment>,
    #[serde(default)]
    embeds: Vec<WireEmbed>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct WireAuthor {
    id: String,
    username: String,
    global_name: Option<String>,
    avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireAttachment {
    url: String,
    filename: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireEmbed {
    image: Option<WireEmbedMedia>,
    thumbnail: Option<WireEmbedMedia>,
    video: Option<WireEmbedMedia>,
    description: Option<String>,
    #[serde(default)]
    fields: Vec<WireEmbedField>,
}

#[derive(Debug, Deserialize)]
struct WireEmbedMedia {
    url: String,
}

#[derive(Debug, Deserialize)]
struct WireEmbedField {
    name: String,
    value: String,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Message {
            id: wire.id,
            author: Author::from(wire.author),
            content: wire.content,
            attachments: wire
                .attachments
                .into_iter()
                .map(|a| Attachment {
                    url: a.url,
                    filename: a.filename,
                })
                .collect(),
            embeds: wire.embeds.into_iter().map(Embed::from).collect(),
            sent_at: wire.timestamp,
        }
    }
}

impl From<WireAuthor> for Author {
    fn from(wire: WireAuthor) -> Self {
        let avatar_url = wire
            .avatar
            .map(|hash| format!("https://cdn.discordapp.com/avatars/{}/{}.png", wire.id, hash));
        Author {
            display_name: wire.global_name.unwrap_or(wire.username),
            avatar_url,
        }
    }
}

impl From<WireEmbed> for Embed {
    fn from(wire: WireEmbed) -> Self {
        Embed {
            image_url: wire.image.map(|m| m.url),
            thumbnail_url: wire.thumbnail.map(|m| m.url),
            video_url: wire.video.map(|m| m.url),
            description: wire.description,
            fields: wire
                .fields
                .into_iter()
                .map(|f| EmbedField {
                    name: f.name,
                    value: f.value,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_message_maps_into_contract_shape() {
        let raw = r#"{
            "id": "1005",
            "content": "hello",
            "author": {"id": "7", "username": "ana", "global_name": "Ana", "avatar": "aa11"},
            "attachments": [{"url": "https://cdn.discordapp.com/attachments/1/2/a.png", "filename": "a.png"}],
            "embeds": [{"image": {"url": "https://media.discordapp.net/x/y.gif"}, "description": "d", "fields": [{"name": "n", "value": "v"}]}],
            "timestamp": "2024-05-01T12:00:00Z"
        }"#;

        let message = Message::from(serde_json::from_str::<WireMessage>(raw).expect("parse"));
        assert_eq!(message.id, "1005");
        assert_eq!(message.author.display_name, "Ana");
        assert_eq!(
            message.author.avatar_url.as_deref(),
            Some("https://cdn.discordapp.com/avatars/7/aa11.png")
        );
        assert_eq!(message.attachments[0].filename.as_deref(), Some("a.png"));
        assert_eq!(
            message.embeds[0].image_url.as_deref(),
            Some("https://media.discordapp.net/x/y.gif")
        );
        assert_eq!(message.embeds[0].fields[0].value, "v");
    }

    #[test]
    fn missing_optional_wire_fields_default_cleanly() {
        let raw = r#"{
            "id": "1006",
            "author": {"id": "8", "username": "bo", "global_name": null, "avatar": null},
            "timestamp": "2024-05-01T12:00:01Z"
        }"#;

        let message = Message::from(serde_json::from_str::<WireMessage>(raw).expect("parse"));
        assert_eq!(message.author.display_name, "bo");
        assert_eq!(message.author.avatar_url, None);
        assert!(message.content.is_empty());
        assert!(message.attachments.is_empty());
        assert!(message.embeds.is_empty());
    }
}
