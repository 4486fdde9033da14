pub mod filetype;
pub mod http;

use async_trait::async_trait;
use chanport_contract::FileId;
use chanport_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::{HttpFileTransfer, DEFAULT_TIMEOUT, MIGRATION_TAG};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("download returned status {0}")]
    Status(u16),
    #[error("storage rejected the file: {0}")]
    Storage(#[from] StorageError),
}

/// Result of migrating one remote file: where it now lives and how the
/// rewritten message should reference it. Lives only while its message is
/// being processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferOutcome {
    pub source_url: String,
    pub stored_name: String,
    pub download_url: String,
    pub file_id: FileId,
}

/// Moves one referenced file into local storage under a fresh identity.
/// A failure is scoped to its source URL; callers keep processing sibling
/// URLs and still repost the message.
#[async_trait]
pub trait FileTransfer: Send + Sync {
    async fn transfer(&self, source_url: &str) -> Result<TransferOutcome, TransferError>;
}
