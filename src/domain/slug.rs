//! URL slug and excerpt derivation.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EXCERPT_LENGTH;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static slug pattern is valid"));

/// Lowercase `text` and join its runs of letters and digits with `-`.
/// Letters outside ASCII are kept as they are.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Slug for a post title, disambiguated by the creation instant.
///
/// The suffix is the millisecond timestamp in base 36, so two posts with the
/// same title only collide when created in the same millisecond.
pub fn unique_slug(title: &str, at: DateTime<Utc>) -> String {
    let base = slugify(title);
    let suffix = to_base36(at.timestamp_millis().max(0) as u64);
    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

/// First `EXCERPT_LENGTH` characters of `content`, whitespace trimmed.
pub fn derive_excerpt(content: &str) -> String {
    let trimmed = content.trim();
    match trimmed.char_indices().nth(EXCERPT_LENGTH) {
        Some((idx, _)) => format!("{}...", trimmed[..idx].trim_end()),
        None => trimmed.to_string(),
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
