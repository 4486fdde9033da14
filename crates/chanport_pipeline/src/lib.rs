pub mod extract;
pub mod orchestrator;
pub mod rewrite;

pub use extract::extract_file_urls;
pub use orchestrator::{run_migration, RunError, POST_PACING};
pub use rewrite::rewrite_message;
