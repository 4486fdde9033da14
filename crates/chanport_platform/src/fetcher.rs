use chanport_contract::Message;
use tracing::info;

use crate::platform::{ChatPlatform, PlatformError};

/// Upstream page cap for history reads.
pub const PAGE_LIMIT: u8 = 100;

/// Retrieves the complete history of a channel or thread, oldest-first.
///
/// The upstream API only pages newest-first, so pages are accumulated with
/// the oldest id seen as the next `before` cursor and the whole sequence is
/// reversed at the end. A short or empty page signals exhaustion. Any page
/// failure aborts the fetch: a partial history cannot guarantee ordering or
/// completeness, so there is no partial result.
pub async fn fetch_full_history<P: ChatPlatform + ?Sized>(
    platform: &P,
    credential: &str,
    container_id: &str,
) -> Result<Vec<Message>, PlatformError> {
    let mut history: Vec<Message> = Vec::new();
    let mut before: Option<String> = None;

    loop {
        let page = platform
            .fetch_page(credential, container_id, before.as_deref(), PAGE_LIMIT)
            .await?;
        let exhausted = page.len() < PAGE_LIMIT as usize;

        // Pages are newest-first, so the page's last element is the oldest
        // message seen and becomes the next cursor.
        if let Some(oldest) = page.last() {
            before = Some(oldest.id.clone());
        }
        history.extend(page);

        if exhausted {
            break;
        }
    }

    history.reverse();
    info!(container_id = %container_id, total = history.len(), "history retrieval complete");
    Ok(history)
}
