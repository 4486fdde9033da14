/// Extension for a known content type. Unlisted types fall back to the
/// URL-path extension, then to the generic binary extension.
pub fn extension_for(mime_essence: &str) -> Option<&'static str> {
    let extension = match mime_essence {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        "application/pdf" => "pdf",
        "application/zip" => "zip",
        "application/json" => "json",
        "text/plain" => "txt",
        "text/html" => "html",
        "text/csv" => "csv",
        _ => return None,
    };
    Some(extension)
}

/// Plausible extension from the URL path: the suffix after the final dot
/// of the final segment, 2 to 4 alphabetic characters, lowercased.
pub fn extension_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    let (_, suffix) = segment.rsplit_once('.')?;
    if (2..=4).contains(&suffix.len()) && suffix.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some(suffix.to_ascii_lowercase())
    } else {
        None
    }
}

/// Coarse category stored with the file metadata.
pub fn category_for(mime_essence: &str) -> &'static str {
    if mime_essence.starts_with("image/") {
        "image"
    } else if mime_essence.starts_with("video/") {
        "video"
    } else if mime_essence.starts_with("audio/") {
        "audio"
    } else if mime_essence.starts_with("text/") || mime_essence == "application/pdf" {
        "document"
    } else {
        "binary"
    }
}

/// Display name for the registered file: the URL's final path segment.
pub fn original_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("file")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_content_types_map_to_extensions() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("audio/x-wav"), Some("wav"));
        assert_eq!(extension_for("application/x-msdownload"), None);
    }

    #[test]
    fn url_fallback_requires_short_alphabetic_suffix() {
        assert_eq!(
            extension_from_url("https://cdn.discordapp.com/attachments/1/2/photo.JPEG?ex=66"),
            Some("jpeg".to_string())
        );
        assert_eq!(extension_from_url("https://cdn.example/archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension_from_url("https://cdn.example/file.a"), None);
        assert_eq!(extension_from_url("https://cdn.example/file.12ab"), None);
        assert_eq!(extension_from_url("https://cdn.example/readme"), None);
    }

    #[test]
    fn categories_follow_mime_top_level() {
        assert_eq!(category_for("image/webp"), "image");
        assert_eq!(category_for("video/mp4"), "video");
        assert_eq!(category_for("text/markdown"), "document");
        assert_eq!(category_for("application/pdf"), "document");
        assert_eq!(category_for("application/octet-stream"), "binary");
    }

    #[test]
    fn original_name_is_final_path_segment() {
        assert_eq!(
            original_name_from_url("https://cdn.discordapp.com/attachments/1/2/notes.pdf?ex=1"),
            "notes.pdf"
        );
        assert_eq!(original_name_from_url("https://cdn.example/"), "file");
    }
}
