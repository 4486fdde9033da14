use chrono::Utc;

/// Collision-resistant stored identity: millisecond timestamp plus a
/// random hex suffix, dotted with the derived extension.
pub fn generate_stored_name(extension: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::random();
    format!("{millis}-{suffix:08x}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::generate_stored_name;

    #[test]
    fn stored_names_carry_the_extension() {
        let name = generate_stored_name("png");
        assert!(name.ends_with(".png"));

        let stem = name.trim_end_matches(".png");
        let (millis, suffix) = stem.split_once('-').expect("timestamp-suffix shape");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
        assert!(suffix.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_names_differ() {
        assert_ne!(generate_stored_name("bin"), generate_stored_name("bin"));
    }
}
