//! Utility functions for path naming and HTTP client setup

use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Fallback used when a title sanitizes down to nothing
const UNTITLED: &str = "untitled";

/// File name of a path as an owned string (the display name of a directory)
///
/// # Examples
///
/// ```
/// use media_catalog::utils::file_display_name;
/// use std::path::Path;
///
/// assert_eq!(file_display_name(Path::new("/data/music/Album")).as_deref(), Some("Album"));
/// ```
pub fn file_display_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// File stem of a path (name without extension), used as a fallback title
///
/// # Examples
///
/// ```
/// use media_catalog::utils::file_stem_name;
/// use std::path::Path;
///
/// assert_eq!(file_stem_name(Path::new("/data/photo/beach.jpg")).as_deref(), Some("beach"));
/// ```
pub fn file_stem_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}

/// Turn an arbitrary title into a single safe path component
///
/// Separators and reserved characters are stripped. Titles that sanitize to
/// an empty string become `"untitled"`.
///
/// # Examples
///
/// ```
/// use media_catalog::utils::safe_file_name;
///
/// assert_eq!(safe_file_name("AC/DC: Live"), "ACDC Live");
/// assert_eq!(safe_file_name("///"), "untitled");
/// ```
pub fn safe_file_name(title: &str) -> String {
    let sanitized = sanitize_filename::sanitize(title.trim());
    let sanitized = sanitized.trim();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        UNTITLED.to_string()
    } else {
        sanitized.to_string()
    }
}

/// Shorten `s` to at most `max_bytes` bytes without splitting a character
///
/// The cut moves back to the last space when one falls in the second half
/// of the kept text. Trailing whitespace and dots are dropped.
pub fn truncate_at_boundary(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_string();
    }

    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut kept = &s[..end];
    if let Some(pos) = kept.rfind(' ')
        && pos > max_bytes / 2
    {
        kept = &kept[..pos];
    }

    let kept = kept.trim_end_matches(|c: char| c.is_whitespace() || c == '.');
    if kept.is_empty() {
        UNTITLED.to_string()
    } else {
        kept.to_string()
    }
}

/// Build the shared HTTP client used for feeds, artwork and search backends
pub fn build_http_client(config: &DownloadConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.feed_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_of_root_is_none() {
        assert_eq!(file_display_name(Path::new("/")), None);
    }

    #[test]
    fn stem_drops_only_last_extension() {
        assert_eq!(
            file_stem_name(Path::new("/x/archive.tar.gz")).as_deref(),
            Some("archive.tar")
        );
    }

    #[test]
    fn safe_file_name_removes_separators() {
        let name = safe_file_name("Episode 1/2: The \"Start\"");
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
        assert!(!name.contains('"'));
        assert!(name.starts_with("Episode 12"));
    }

    #[test]
    fn safe_file_name_never_returns_dot_components() {
        assert_eq!(safe_file_name(".."), "untitled");
        assert_eq!(safe_file_name("   "), "untitled");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_at_boundary("short", 100), "short");
    }

    #[test]
    fn truncate_cuts_at_word_boundary() {
        let result = truncate_at_boundary("word1 word2 word3 word4 word5", 20);
        assert_eq!(result, "word1 word2 word3");
    }

    #[test]
    fn truncate_respects_multibyte_characters() {
        let title = "é".repeat(200);
        let result = truncate_at_boundary(&title, 101);
        assert_eq!(result.len(), 100);
        assert!(result.chars().all(|c| c == 'é'));
    }

    #[test]
    fn http_client_builds_from_defaults() {
        assert!(build_http_client(&DownloadConfig::default()).is_ok());
    }
}
