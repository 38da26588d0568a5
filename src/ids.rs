//! Short external-facing identifiers and URL slugs.
//!
//! Generated ids look like `PRD-4K9ZQ2MB`. Collisions are improbable but not
//! impossible; callers doing uniqueness-sensitive inserts must verify against
//! storage and disambiguate on conflict.

use chrono::Utc;
use rand::Rng;

const TOKEN_LEN: usize = 8;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `"{PREFIX}-{8-char base36 token}"`, prefix upper-cased.
pub fn new_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", prefix.to_uppercase(), token.to_uppercase())
}

/// URL-safe slug: lowercase, whitespace runs to single hyphens, everything
/// outside `[a-z0-9-]` stripped, duplicate hyphens collapsed.
pub fn derive_slug(base: &str) -> String {
    let mut slug = String::with_capacity(base.len());
    let mut last_hyphen = true; // suppress a leading hyphen
    for c in base.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            if !last_hyphen {
                slug.push('-');
                last_hyphen = true;
            }
        } else if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_hyphen = false;
        }
        // anything else is dropped
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Disambiguate a candidate slug against an existence check. A taken slug gets
/// a millisecond timestamp suffix; the suffixed slug is not rechecked.
pub fn ensure_unique<F>(candidate: String, exists: F) -> String
where
    F: FnOnce(&str) -> bool,
{
    if exists(&candidate) {
        format!("{}-{}", candidate, Utc::now().timestamp_millis())
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_id_has_prefix_and_token() {
        let id = new_id("prd");
        assert!(id.starts_with("PRD-"));
        assert_eq!(id.len(), 4 + TOKEN_LEN);
    }

    #[test]
    fn derive_slug_normalizes() {
        assert_eq!(derive_slug("  Blue  T-Shirt (XL) "), "blue-t-shirt-xl");
        assert_eq!(derive_slug("Größe 42"), "gre-42");
        assert_eq!(derive_slug("---"), "");
    }

    #[test]
    fn ensure_unique_suffixes_only_on_collision() {
        let taken: HashSet<&str> = ["shirt-large"].into_iter().collect();
        assert_eq!(
            ensure_unique("shirt-small".into(), |s| taken.contains(s)),
            "shirt-small"
        );
        let disambiguated = ensure_unique("shirt-large".into(), |s| taken.contains(s));
        assert!(disambiguated.starts_with("shirt-large-"));
        assert!(disambiguated.len() > "shirt-large-".len());
    }
}
