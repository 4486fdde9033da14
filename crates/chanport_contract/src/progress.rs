use serde::{Deserialize, Serialize};

use crate::message::MessageId;

/// One recorded failure. `url` is present for file-level failures and
/// absent for message-level ones (repost, rewrite).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureRecord {
    pub message_id: MessageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub error: String,
}

/// Per-run accumulator, owned by exactly one orchestrator instance.
/// Counters only ever grow while the run is live.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationStats {
    pub total_messages: usize,
    pub messages_with_files: usize,
    pub files_processed: usize,
    pub files_uploaded: usize,
    pub messages_posted: usize,
    pub errors: Vec<FailureRecord>,
}

impl MigrationStats {
    pub fn record_failure(&mut self, message_id: &str, url: Option<String>, error: String) {
        self.errors.push(FailureRecord {
            message_id: message_id.to_string(),
            url,
            error,
        });
    }
}

/// Progress protocol for one run. Exactly one `Completed` or `Error`
/// terminates the stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Fetching,
    Processing {
        processed: usize,
        total: usize,
        detail: String,
    },
    Completed {
        stats: MigrationStats,
    },
    Error {
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_event_serializes_with_type_tag() {
        let event = ProgressEvent::Processing {
            processed: 3,
            total: 10,
            detail: "message 333".to_string(),
        };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["type"], "processing");
        assert_eq!(value["processed"], 3);
        assert_eq!(value["total"], 10);
    }

    #[test]
    fn completed_event_carries_full_stats() {
        let mut stats = MigrationStats {
            total_messages: 2,
            messages_posted: 2,
            ..Default::default()
        };
        stats.record_failure("555", Some("https://cdn.example/x.png".to_string()), "timeout".into());

        let value = serde_json::to_value(ProgressEvent::Completed { stats }).expect("serialize");
        assert_eq!(value["type"], "completed");
        assert_eq!(value["stats"]["total_messages"], 2);
        assert_eq!(value["stats"]["errors"][0]["message_id"], "555");
    }

    #[test]
    fn file_failure_keeps_originating_url() {
        let mut stats = MigrationStats::default();
        stats.record_failure("9", Some("https://cdn.example/a.bin".to_string()), "503".into());
        stats.record_failure("9", None, "webhook rejected".into());

        assert_eq!(stats.errors.len(), 2);
        assert_eq!(stats.errors[0].url.as_deref(), Some("https://cdn.example/a.bin"));
        assert_eq!(stats.errors[1].url, None);
    }
}
