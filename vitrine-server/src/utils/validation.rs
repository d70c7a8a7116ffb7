//! Input validation helpers
//!
//! Centralized text length constants and validation functions. The tag
//! helpers are the single validation routine applied at BOTH post
//! creation and tag edit, so the two paths cannot drift apart.

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Tag labels ("Shirt", "Jeans", "Shoes")
pub const MIN_LABEL_LEN: usize = 2;
pub const MAX_LABEL_LEN: usize = 100;

/// Captions
pub const MAX_CAPTION_LEN: usize = 2000;

/// Comments
pub const MAX_COMMENT_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a tag label: trimmed length within [MIN_LABEL_LEN, MAX_LABEL_LEN]
pub fn validate_tag_label(label: &str) -> Result<(), AppError> {
    let trimmed = label.trim();
    if trimmed.chars().count() < MIN_LABEL_LEN {
        return Err(AppError::new(ErrorCode::InvalidTagLabel));
    }
    if trimmed.len() > MAX_LABEL_LEN {
        return Err(AppError::with_message(
            ErrorCode::InvalidTagLabel,
            format!("Label is too long (max {MAX_LABEL_LEN} chars)"),
        ));
    }
    Ok(())
}

/// Validate a tag link: must carry an http(s) scheme
pub fn validate_tag_link(link: &str) -> Result<(), AppError> {
    let lower = link.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(AppError::new(ErrorCode::InvalidTagLink));
    }
    if link.len() > MAX_URL_LEN {
        return Err(AppError::with_message(
            ErrorCode::InvalidTagLink,
            format!("Link is too long (max {MAX_URL_LEN} chars)"),
        ));
    }
    Ok(())
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_rejects_single_char() {
        assert!(validate_tag_label("a").is_err());
        assert!(validate_tag_label(" a ").is_err());
        assert!(validate_tag_label("ab").is_ok());
    }

    #[test]
    fn test_label_rejects_overlong() {
        assert!(validate_tag_label(&"x".repeat(MAX_LABEL_LEN + 1)).is_err());
    }

    #[test]
    fn test_link_requires_http_scheme() {
        assert!(validate_tag_link("https://shop.example/shoes").is_ok());
        assert!(validate_tag_link("http://shop.example").is_ok());
        assert!(validate_tag_link("HTTPS://SHOP.EXAMPLE").is_ok());
        assert!(validate_tag_link("ftp://shop.example").is_err());
        assert!(validate_tag_link("shop.example/shoes").is_err());
        assert!(validate_tag_link("").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("hello", "comment", 10).is_ok());
        assert!(validate_required_text("", "comment", 10).is_err());
        assert!(validate_required_text("   ", "comment", 10).is_err());
        assert!(validate_required_text("toolongtext", "comment", 5).is_err());
    }
}
