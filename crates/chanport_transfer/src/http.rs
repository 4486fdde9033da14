use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chanport_storage::{generate_stored_name, FileMetadata, FileRegistry, LocalBlobStore};
use futures::StreamExt;
use mime::Mime;
use reqwest::header::CONTENT_TYPE;
use tracing::{info, warn};

use crate::filetype::{category_for, extension_for, extension_from_url, original_name_from_url};
use crate::{FileTransfer, TransferError, TransferOutcome};

/// Tag distinguishing migrated files from direct uploads.
pub const MIGRATION_TAG: &str = "migrated";

/// Idle/total bound on one download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads one remote file, streams it into the blob store under a
/// fresh identity and registers it with the file-storage collaborator.
pub struct HttpFileTransfer {
    client: reqwest::Client,
    blobs: LocalBlobStore,
    registry: Arc<dyn FileRegistry>,
    uploaded_by: String,
}

impl HttpFileTransfer {
    pub fn new(
        blobs: LocalBlobStore,
        registry: Arc<dyn FileRegistry>,
        uploaded_by: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransferError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            blobs,
            registry,
            uploaded_by: uploaded_by.into(),
        })
    }

    fn derive_extension(mime_essence: Option<&str>, source_url: &str) -> String {
        mime_essence
            .and_then(extension_for)
            .map(str::to_string)
            .or_else(|| extension_from_url(source_url))
            .unwrap_or_else(|| "bin".to_string())
    }
}

#[async_trait]
impl FileTransfer for HttpFileTransfer {
    async fn transfer(&self, source_url: &str) -> Result<TransferOutcome, TransferError> {
        let response = self.client.get(source_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %source_url, status = status.as_u16(), "download rejected");
            return Err(TransferError::Status(status.as_u16()));
        }

        let mime_essence = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Mime>().ok())
            .map(|m| m.essence_str().to_string());

        let extension = Self::derive_extension(mime_essence.as_deref(), source_url);
        let stored_name = generate_stored_name(&extension);

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|err| io::Error::new(io::ErrorKind::Other, err)));
        let size = self.blobs.write_stream(&stored_name, chunks).await?;

        let mime_type = mime_essence.unwrap_or_else(|| "application/octet-stream".to_string());
        let download_url = self.registry.build_download_url(&stored_name);
        let metadata = FileMetadata {
            original_name: original_name_from_url(source_url),
            stored_name: stored_name.clone(),
            file_type: category_for(&mime_type).to_string(),
            mime_type,
            size,
            download_url: download_url.clone(),
            tags: vec![MIGRATION_TAG.to_string()],
            description: format!("Migrated from {source_url}"),
            uploaded_by: self.uploaded_by.clone(),
        };
        let file_id = self.registry.register_file(&metadata).await?;

        info!(url = %source_url, stored_name = %stored_name, size, "file migrated");
        Ok(TransferOutcome {
            source_url: source_url.to_string(),
            stored_name,
            download_url,
            file_id,
        })
    }
}
