use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to serialize event to JSON: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to deserialize event line: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("event line contains an interior newline")]
    EmbeddedNewline,
}

/// Encodes one value as a single newline-terminated JSON line, the unit of
/// the progress transport. serde_json never emits raw newlines inside a
/// compact document; the check guards against non-event payloads.
pub fn encode_line<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let body = serde_json::to_string(value).map_err(CodecError::Serialize)?;
    if body.contains('\n') {
        return Err(CodecError::EmbeddedNewline);
    }
    Ok(format!("{body}\n"))
}

pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, CodecError> {
    serde_json::from_str(line.trim_end_matches('\n')).map_err(CodecError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::{decode_line, encode_line};
    use crate::progress::ProgressEvent;

    #[test]
    fn event_lines_round_trip() {
        let event = ProgressEvent::Processing {
            processed: 1,
            total: 3,
            detail: "message 101 reposted".to_string(),
        };

        let line = encode_line(&event).expect("encode");
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let decoded: ProgressEvent = decode_line(&line).expect("decode");
        assert_eq!(event, decoded);
    }
}
