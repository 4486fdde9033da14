pub mod message;
pub mod ndjson;
pub mod progress;
pub mod request;

pub use message::{
    Attachment, Author, ChannelId, Embed, EmbedField, FileId, Message, MessageId, WebhookPayload,
};
pub use ndjson::{decode_line, encode_line, CodecError};
pub use progress::{FailureRecord, MigrationStats, ProgressEvent};
pub use request::{MigrationRequest, RequestError};
