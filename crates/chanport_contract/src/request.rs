use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static WEBHOOK_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://(?:discord\.com|discordapp\.com)/api/webhooks/\d+/[\w-]+$")
        .expect("webhook url pattern")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("bot credential cannot be empty")]
    MissingCredential,
    #[error("source channel id is required")]
    MissingChannelId,
    #[error("{field} must be a numeric snowflake id: {value}")]
    MalformedId { field: &'static str, value: String },
    #[error("destination webhook url does not match the platform webhook shape: {0}")]
    MalformedWebhookUrl(String),
}

/// The trigger that starts one migration run. Validation failures are
/// fatal: no run is started for a malformed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationRequest {
    pub bot_token: String,
    pub source_channel_id: String,
    pub source_thread_id: Option<String>,
    pub destination_webhook_url: String,
    pub destination_thread_id: Option<String>,
    pub initiated_by: String,
}

impl MigrationRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.bot_token.trim().is_empty() {
            return Err(RequestError::MissingCredential);
        }
        if self.source_channel_id.is_empty() {
            return Err(RequestError::MissingChannelId);
        }
        require_snowflake("source_channel_id", &self.source_channel_id)?;
        if let Some(id) = &self.source_thread_id {
            require_snowflake("source_thread_id", id)?;
        }
        if let Some(id) = &self.destination_thread_id {
            require_snowflake("destination_thread_id", id)?;
        }
        if !WEBHOOK_URL.is_match(&self.destination_webhook_url) {
            return Err(RequestError::MalformedWebhookUrl(
                self.destination_webhook_url.clone(),
            ));
        }
        Ok(())
    }

    /// Threads are addressed as channels by the history endpoint, so a
    /// thread id, when present, wins over the parent channel id.
    pub fn source_container_id(&self) -> &str {
        self.source_thread_id
            .as_deref()
            .unwrap_or(&self.source_channel_id)
    }
}

fn require_snowflake(field: &'static str, value: &str) -> Result<(), RequestError> {
    let numeric = !value.is_empty()
        && value.len() <= 20
        && value.bytes().all(|b| b.is_ascii_digit());
    if numeric {
        Ok(())
    } else {
        Err(RequestError::MalformedId {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MigrationRequest {
        MigrationRequest {
            bot_token: "bot-token".to_string(),
            source_channel_id: "111222333444555666".to_string(),
            source_thread_id: None,
            destination_webhook_url:
                "https://discord.com/api/webhooks/123456789/abcDEF_ghi-jkl".to_string(),
            destination_thread_id: None,
            initiated_by: "42".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        assert_eq!(request().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_numeric_channel_id() {
        let mut req = request();
        req.source_channel_id = "general".to_string();
        assert!(matches!(
            req.validate(),
            Err(RequestError::MalformedId { field: "source_channel_id", .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_thread_id() {
        let mut req = request();
        req.destination_thread_id = Some("not-a-thread".to_string());
        assert!(matches!(
            req.validate(),
            Err(RequestError::MalformedId { field: "destination_thread_id", .. })
        ));
    }

    #[test]
    fn rejects_foreign_webhook_url() {
        let mut req = request();
        req.destination_webhook_url = "https://example.com/api/webhooks/1/token".to_string();
        assert!(matches!(
            req.validate(),
            Err(RequestError::MalformedWebhookUrl(_))
        ));
    }

    #[test]
    fn rejects_blank_credential() {
        let mut req = request();
        req.bot_token = "  ".to_string();
        assert_eq!(req.validate(), Err(RequestError::MissingCredential));
    }

    #[test]
    fn thread_id_overrides_channel_for_history_reads() {
        let mut req = request();
        assert_eq!(req.source_container_id(), "111222333444555666");
        req.source_thread_id = Some("999888777".to_string());
        assert_eq!(req.source_container_id(), "999888777");
    }
}
