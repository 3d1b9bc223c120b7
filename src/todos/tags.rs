//! Tag normalization

use super::error::{Result, TodoError};
use std::collections::HashSet;

/// Separator between tags when a list travels as one string
pub const TAG_SEPARATOR: char = ',';

/// Normalize a single tag: trimmed and lower-cased.
///
/// Blank input stays blank; callers decide whether an empty tag is meaningful.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize, drop blank labels and deduplicate, keeping first occurrence order.
pub fn clean_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Reject labels containing [`TAG_SEPARATOR`]; they could not be told apart
/// from two tags once joined.
pub fn check_tags(tags: &[String]) -> Result<()> {
    match tags.iter().find(|t| t.contains(TAG_SEPARATOR)) {
        Some(tag) => Err(TodoError::Validation(format!(
            "tag must not contain '{TAG_SEPARATOR}': {tag}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  RuSt "), "rust");
        assert_eq!(normalize_tag("go"), "go");
    }

    #[test]
    fn test_normalize_keeps_empty() {
        assert_eq!(normalize_tag("   "), "");
        assert_eq!(normalize_tag(""), "");
    }

    #[test]
    fn test_clean_tags_collapses_case_and_space() {
        assert_eq!(clean_tags(["Go", " go ", "GO"]), vec!["go".to_string()]);
    }

    #[test]
    fn test_clean_tags_keeps_order_and_drops_blank() {
        let cleaned = clean_tags(vec!["Work", "", "home", "  ", "WORK", "errands"]);
        assert_eq!(cleaned, vec!["work", "home", "errands"]);
    }

    #[test]
    fn test_check_tags_rejects_separator() {
        assert!(check_tags(&["home".to_string(), "work".to_string()]).is_ok());
        assert_eq!(
            check_tags(&["home,work".to_string()]).unwrap_err(),
            TodoError::Validation("tag must not contain ',': home,work".into())
        );
    }
}
