use chanport_contract::Message;
use once_cell::sync::Lazy;
use regex::Regex;

// File URLs the platform's CDN serves. Anything else in free text is not a
// migratable file reference and is left alone.
static FILE_HOST_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://(?:cdn\.discordapp\.com|media\.discordapp\.net)/[^\s<>|]+")
        .expect("file host url pattern")
});

/// Collects every file-reference URL in one message, in first-appearance
/// order, deduplicated so each file is transferred once per message.
///
/// Scan order: attachments, then per embed its image/thumbnail/video URLs,
/// field values and description, then the raw content. Structured URL
/// fields must match the known host shape to count; free text is scanned
/// with the same pattern. An unrecognized URL is ignored, never an error.
pub fn extract_file_urls(message: &Message) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();

    for attachment in &message.attachments {
        push_if_file_url(&mut urls, &attachment.url);
    }

    for embed in &message.embeds {
        for candidate in [&embed.image_url, &embed.thumbnail_url, &embed.video_url] {
            if let Some(url) = candidate {
                push_if_file_url(&mut urls, url);
            }
        }
        for field in &embed.fields {
            scan_text(&mut urls, &field.value);
        }
        if let Some(description) = &embed.description {
            scan_text(&mut urls, description);
        }
    }

    scan_text(&mut urls, &message.content);
    urls
}

fn push_if_file_url(urls: &mut Vec<String>, url: &str) {
    if FILE_HOST_URL.is_match(url) && !urls.iter().any(|seen| seen == url) {
        urls.push(url.to_string());
    }
}

fn scan_text(urls: &mut Vec<String>, text: &str) {
    for found in FILE_HOST_URL.find_iter(text) {
        let url = found.as_str();
        if !urls.iter().any(|seen| seen == url) {
            urls.push(url.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanport_contract::{Attachment, Author, Embed, EmbedField, Message};
    use chrono::Utc;

    const CDN_A: &str = "https://cdn.discordapp.com/attachments/10/20/a.png";
    const CDN_B: &str = "https://media.discordapp.net/attachments/10/21/b.mp4";

    fn bare_message() -> Message {
        Message {
            id: "100".to_string(),
            author: Author {
                display_name: "ana".to_string(),
                avatar_url: None,
            },
            content: String::new(),
            attachments: Vec::new(),
            embeds: Vec::new(),
            sent_at: Utc::now(),
        }
    }

    #[test]
    fn collects_from_every_substructure_in_order() {
        let mut message = bare_message();
        message.attachments.push(Attachment {
            url: CDN_A.to_string(),
            filename: Some("a.png".to_string()),
        });
        message.embeds.push(Embed {
            image_url: Some(CDN_B.to_string()),
            description: Some(format!("see {CDN_A} again")),
            fields: vec![EmbedField {
                name: "clip".to_string(),
                value: "https://cdn.discordapp.com/attachments/10/22/c.gif here".to_string(),
            }],
            ..Default::default()
        });
        message.content = "trailing https://cdn.discordapp.com/attachments/10/23/d.zip".to_string();

        let urls = extract_file_urls(&message);
        assert_eq!(
            urls,
            vec![
                CDN_A.to_string(),
                CDN_B.to_string(),
                "https://cdn.discordapp.com/attachments/10/22/c.gif".to_string(),
                "https://cdn.discordapp.com/attachments/10/23/d.zip".to_string(),
            ]
        );
    }

    #[test]
    fn same_url_in_content_and_embed_field_counts_once() {
        let mut message = bare_message();
        message.content = format!("look {CDN_A}");
        message.embeds.push(Embed {
            fields: vec![EmbedField {
                name: "f".to_string(),
                value: format!("see {CDN_A} and {CDN_A}"),
            }],
            ..Default::default()
        });

        assert_eq!(extract_file_urls(&message), vec![CDN_A.to_string()]);
    }

    #[test]
    fn foreign_hosts_are_ignored_not_errors() {
        let mut message = bare_message();
        message.content = "https://example.com/a.png and http://cdn.discordapp.com/x.png".to_string();
        message.attachments.push(Attachment {
            url: "https://files.elsewhere.io/z.bin".to_string(),
            filename: None,
        });

        assert!(extract_file_urls(&message).is_empty());
    }

    #[test]
    fn message_without_references_yields_nothing() {
        let mut message = bare_message();
        message.content = "plain words only".to_string();
        assert!(extract_file_urls(&message).is_empty());
    }
}
