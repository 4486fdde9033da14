use std::sync::Mutex;

use async_trait::async_trait;
use chanport_contract::FileId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("blob write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("file registration failed: {0}")]
    Registration(String),
}

/// Metadata handed to the file-storage collaborator when a migrated file
/// is registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMetadata {
    pub original_name: String,
    pub stored_name: String,
    pub file_type: String,
    pub mime_type: String,
    pub size: u64,
    pub download_url: String,
    pub tags: Vec<String>,
    pub description: String,
    pub uploaded_by: String,
}

/// The narrow surface of the external file-storage service the pipeline
/// depends on. Freshness of stored identities is this collaborator's
/// responsibility once a name is registered.
#[async_trait]
pub trait FileRegistry: Send + Sync {
    async fn register_file(&self, metadata: &FileMetadata) -> Result<FileId, StorageError>;

    fn build_download_url(&self, stored_name: &str) -> String;
}

/// Registry stand-in for tests and single-process deployments where the
/// storage service is not reachable.
#[derive(Debug)]
pub struct InMemoryFileRegistry {
    base_url: String,
    files: Mutex<Vec<FileMetadata>>,
    fail_registration: bool,
}

impl InMemoryFileRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            files: Mutex::new(Vec::new()),
            fail_registration: false,
        }
    }

    pub fn failing(base_url: impl Into<String>) -> Self {
        Self {
            fail_registration: true,
            ..Self::new(base_url)
        }
    }

    pub fn registered(&self) -> Vec<FileMetadata> {
        self.files.lock().expect("registry lock").clone()
    }
}

#[async_trait]
impl FileRegistry for InMemoryFileRegistry {
    async fn register_file(&self, metadata: &FileMetadata) -> Result<FileId, StorageError> {
        if self.fail_registration {
            return Err(StorageError::Registration(
                "registry rejected metadata".to_string(),
            ));
        }

        let mut files = self.files.lock().expect("registry lock");
        files.push(metadata.clone());
        let file_id = files.len() as FileId;
        info!(stored_name = %metadata.stored_name, file_id, "registered migrated file");
        Ok(file_id)
    }

    fn build_download_url(&self, stored_name: &str) -> String {
        format!("{}/files/{}", self.base_url.trim_end_matches('/'), stored_name)
    }
}
