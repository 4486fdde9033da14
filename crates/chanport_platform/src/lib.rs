pub mod fetcher;
pub mod http;
pub mod memory;
pub mod platform;

pub use fetcher::{fetch_full_history, PAGE_LIMIT};
pub use http::{HttpChatPlatform, DEFAULT_API_BASE};
pub use memory::InMemoryChatPlatform;
pub use platform::{ChatPlatform, PlatformError};
