pub mod blob;
pub mod registry;
pub mod stored;

pub use blob::LocalBlobStore;
pub use registry::{FileMetadata, FileRegistry, InMemoryFileRegistry, StorageError};
pub use stored::generate_stored_name;
