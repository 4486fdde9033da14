use std::collections::HashMap;
use std::time::Duration;

use chanport_contract::{
    Message, MigrationRequest, MigrationStats, ProgressEvent, RequestError, WebhookPayload,
};
use chanport_platform::{fetch_full_history, ChatPlatform, PlatformError};
use chanport_transfer::FileTransfer;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::extract::extract_file_urls;
use crate::rewrite::rewrite_message;

/// Pause after each successful repost, to stay under platform-side
/// throttling. Pacing, not correctness.
pub const POST_PACING: Duration = Duration::from_millis(500);

/// Run-aborting failures. Everything else is recorded in the stats and
/// skipped.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid migration request: {0}")]
    Request(#[from] RequestError),
    #[error("history fetch failed: {0}")]
    Fetch(#[from] PlatformError),
}

/// Drives one migration end to end: fetch the ordered history, then per
/// message extract file URLs, transfer each sequentially, rewrite, repost,
/// and report progress. One failing file or message never stops the run;
/// only a malformed request or a history-fetch failure does.
///
/// Emits `Fetching`, one `Processing` per message, and exactly one
/// terminal `Completed` or `Error`. A closed event sink is tolerated: the
/// run finishes and events are dropped.
pub async fn run_migration<P, T>(
    platform: &P,
    transfer: &T,
    request: &MigrationRequest,
    events: &mpsc::Sender<ProgressEvent>,
) -> Result<MigrationStats, RunError>
where
    P: ChatPlatform + ?Sized,
    T: FileTransfer + ?Sized,
{
    if let Err(err) = request.validate() {
        emit(events, ProgressEvent::Error { detail: err.to_string() }).await;
        return Err(err.into());
    }

    emit(events, ProgressEvent::Fetching).await;
    let history = match fetch_full_history(
        platform,
        &request.bot_token,
        request.source_container_id(),
    )
    .await
    {
        Ok(history) => history,
        Err(err) => {
            warn!(error = %err, "migration aborted during history fetch");
            emit(events, ProgressEvent::Error { detail: err.to_string() }).await;
            return Err(err.into());
        }
    };

    let total = history.len();
    let mut stats = MigrationStats {
        total_messages: total,
        ..Default::default()
    };

    for (index, message) in history.iter().enumerate() {
        let detail = process_message(platform, transfer, request, message, &mut stats).await;
        emit(
            events,
            ProgressEvent::Processing {
                processed: index + 1,
                total,
                detail,
            },
        )
        .await;
    }

    info!(
        total = stats.total_messages,
        posted = stats.messages_posted,
        files = stats.files_uploaded,
        failures = stats.errors.len(),
        "migration completed"
    );
    emit(events, ProgressEvent::Completed { stats: stats.clone() }).await;
    Ok(stats)
}

/// One message through the whole pipeline. File-level failures are
/// recorded and leave their URL out of the map, so the repost goes ahead
/// with the original reference; a repost failure is recorded and the run
/// moves on. Files already transferred for a failed repost stay in
/// storage.
async fn process_message<P, T>(
    platform: &P,
    transfer: &T,
    request: &MigrationRequest,
    message: &Message,
    stats: &mut MigrationStats,
) -> String
where
    P: ChatPlatform + ?Sized,
    T: FileTransfer + ?Sized,
{
    let urls = extract_file_urls(message);
    if !urls.is_empty() {
        stats.messages_with_files += 1;
    }

    let mut url_map: HashMap<String, String> = HashMap::new();
    for url in &urls {
        stats.files_processed += 1;
        match transfer.transfer(url).await {
            Ok(outcome) => {
                stats.files_uploaded += 1;
                url_map.insert(url.clone(), outcome.download_url);
            }
            Err(err) => {
                warn!(message_id = %message.id, url = %url, error = %err, "file transfer failed");
                stats.record_failure(&message.id, Some(url.clone()), err.to_string());
            }
        }
    }

    let (content, embeds) = rewrite_message(message, &url_map);
    let payload = WebhookPayload::from_rewritten(&message.author, content, embeds);
    match platform
        .post_webhook(
            &request.destination_webhook_url,
            request.destination_thread_id.as_deref(),
            &payload,
        )
        .await
    {
        Ok(()) => {
            stats.messages_posted += 1;
            sleep(POST_PACING).await;
            format!("reposted message {}", message.id)
        }
        Err(err) => {
            warn!(message_id = %message.id, error = %err, "webhook repost failed");
            stats.record_failure(&message.id, None, err.to_string());
            format!("failed to repost message {}", message.id)
        }
    }
}

async fn emit(events: &mpsc::Sender<ProgressEvent>, event: ProgressEvent) {
    if events.send(event).await.is_err() {
        debug!("progress sink closed; event dropped");
    }
}
