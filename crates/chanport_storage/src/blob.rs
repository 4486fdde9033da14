use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::registry::StorageError;

/// Flat on-disk blob directory. Files land under their stored identity;
/// chunks are written as they arrive so large downloads are never held in
/// memory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    /// Streams `chunks` into the blob file and returns the byte count. A
    /// failed write leaves no partial blob behind.
    pub async fn write_stream<S>(&self, stored_name: &str, chunks: S) -> Result<u64, StorageError>
    where
        S: Stream<Item = Result<Bytes, std::io::Error>>,
    {
        futures::pin_mut!(chunks);
        let path = self.path_for(stored_name);
        let mut file = fs::File::create(&path).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    file.write_all(&bytes).await?;
                    written += bytes.len() as u64;
                }
                Err(err) => {
                    drop(file);
                    let _ = fs::remove_file(&path).await;
                    return Err(StorageError::Io(err));
                }
            }
        }

        file.flush().await?;
        debug!(stored_name = %stored_name, written, "blob persisted");
        Ok(written)
    }
}

impl AsRef<Path> for LocalBlobStore {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn ok_chunks(parts: &[&'static [u8]]) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Unpin {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok(Bytes::from_static(p)))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn writes_chunks_and_reports_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::open(dir.path()).await.expect("open");

        let written = store
            .write_stream("x.bin", ok_chunks(&[b"hello ", b"world"]))
            .await
            .expect("write");

        assert_eq!(written, 11);
        let on_disk = std::fs::read(store.path_for("x.bin")).expect("read back");
        assert_eq!(on_disk, b"hello world");
    }

    #[tokio::test]
    async fn mid_stream_error_removes_partial_blob() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::open(dir.path()).await.expect("open");

        let chunks = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "stalled")),
        ]);
        let err = store.write_stream("y.bin", chunks).await.unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        assert!(!store.path_for("y.bin").exists());
    }
}
