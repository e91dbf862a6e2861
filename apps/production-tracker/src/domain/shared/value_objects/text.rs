//! Free-text field helpers.

use crate::domain::shared::DomainError;

/// Trim a required text field and enforce its maximum length in characters.
///
/// # Errors
///
/// Returns `InvalidValue` if the trimmed value is empty or too long.
pub fn required_text(field: &str, raw: &str, max_chars: usize) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid(field, "This field is required."));
    }
    bounded_text(field, trimmed, max_chars)
}

/// Trim an optional text field and enforce its maximum length in characters.
///
/// # Errors
///
/// Returns `InvalidValue` if the trimmed value is too long.
pub fn bounded_text(field: &str, raw: &str, max_chars: usize) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    let count = trimmed.chars().count();
    if count > max_chars {
        return Err(DomainError::invalid(
            field,
            format!("Ensure this value has at most {max_chars} characters (it has {count})."),
        ));
    }
    Ok(trimmed.to_string())
}

/// Case-insensitive substring match used by the search endpoints.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  Cutting ", 20).unwrap(), "Cutting");
    }

    #[test]
    fn required_text_rejects_blank() {
        let err = required_text("name", "   ", 20).unwrap_err();
        assert!(format!("{err}").contains("required"));
    }

    #[test]
    fn bounded_text_counts_characters_not_bytes() {
        assert!(bounded_text("name", "éééé", 4).is_ok());
        assert!(bounded_text("name", "ééééé", 4).is_err());
    }

    #[test]
    fn contains_ignore_case_matches() {
        assert!(contains_ignore_case("Asha Verma", "verm"));
        assert!(!contains_ignore_case("Asha Verma", "kumar"));
    }
}
