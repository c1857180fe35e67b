/// Text processing utilities
pub mod text {
    /// Keep at most `max_chars` characters, never splitting a code point.
    pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => &text[..byte_index],
            None => text,
        }
    }

    /// Extract the first N sentences from text
    pub fn extract_sentences(text: &str, count: usize) -> String {
        let sentences: Vec<&str> = text
            .split_inclusive(['.', '!', '?'])
            .take(count)
            .collect();
        sentences.concat().trim().to_string()
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Validate feed URL format
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }
}
