//! # Validation Utilities
//!
//! Input validation helpers.
//!
//! Lengths are counted in Unicode scalar values so that "Zoë" is three characters.

/// Number of characters in `value`.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Validate minimum length.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if char_len(value) < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate email format.
pub fn validate_email(email: &str) -> Result<(), String> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err("Please enter a valid email address".to_string())
    }
}

/// Syntactic email check.
///
/// Accepts `local@domain` where:
/// - there is exactly one `@`
/// - the local part is non-empty ASCII alphanumerics or `_'+.-`, does not start with `.`,
///   has no `..`, and ends with an alphanumeric or one of `_+-`
/// - the domain has at least two dot-separated labels of ASCII alphanumerics or `-`,
///   no label starts or ends with `-`, and the last label is alphabetic with 2+ chars
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    let local_ends_ok = local
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
    if !local_ends_ok
        || local.starts_with('.')
        || local.contains("..")
        || !local.chars().all(is_local_char)
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return false;
    }

    labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

fn is_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '.' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "ada@example.com",
            "first.last+tag@sub.example.co.uk",
            "x@a-b.io",
            "o'brien_j-r@example.ie",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "ada@",
            "ada@example",
            "ada@@example.com",
            "ada@exa mple.com",
            "a da@example.com",
            ".ada@example.com",
            "ada@-example.com",
            "ada@example.c",
            "ada@example.123",
            "ada@example..com",
            "a\"b@example.com",
            "a!b@example.com",
            "zoë@example.com",
            "ada.@example.com",
            "ada'@example.com",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn test_min_length_counts_chars_not_bytes() {
        assert!(validate_min_length("Zoë", 3, "Name").is_ok());
        assert!(validate_min_length("é", 2, "Name").is_err());
        assert_eq!(
            validate_min_length("a", 2, "Name").unwrap_err(),
            "Name must be at least 2 characters"
        );
    }
}
