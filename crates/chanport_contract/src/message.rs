use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type MessageId = String;
pub type ChannelId = String;
pub type FileId = i64;

/// Authorship carried through to the reposted message so the destination
/// channel shows the original writer, not the webhook identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// One source message as fetched. Never mutated after the fetcher hands it
/// over; the rewriter produces derived copies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<Embed>,
    pub sent_at: DateTime<Utc>,
}

/// Wire body for the destination webhook post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl WebhookPayload {
    pub fn from_rewritten(author: &Author, content: String, embeds: Vec<Embed>) -> Self {
        Self {
            content,
            embeds,
            username: author.display_name.clone(),
            avatar_url: author.avatar_url.clone(),
        }
    }
}
