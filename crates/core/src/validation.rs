//! Form-field validation.
//!
//! These run before any network or side-effecting call. They are pure
//! predicates returning `Ok(())` or a short human-readable reason, so the
//! API layer can map failures straight to 400 responses.

use serde::{Deserialize, Serialize};

/// Student classes the programs accept.
pub const STUDENT_CLASSES: &[&str] = &["5", "6", "7", "8", "9", "10", "11", "12"];

/// Program tier a registrant selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Batch {
    Spark,
    Builders,
    Innovators,
}

impl Batch {
    /// Case-insensitive parse from the form value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spark" => Some(Self::Spark),
            "builders" => Some(Self::Builders),
            "innovators" => Some(Self::Innovators),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spark => "spark",
            Self::Builders => "builders",
            Self::Innovators => "innovators",
        }
    }
}

/// Validates a registrant or contact name.
pub fn validate_name(s: &str) -> Result<(), &'static str> {
    if s.trim().len() < 2 {
        return Err("Name must be at least 2 characters");
    }
    Ok(())
}

/// Validates an email address.
///
/// Equivalent to the pattern `^[^\s@]+@[^\s@]+\.[^\s@]+$`: exactly one `@`,
/// no whitespace anywhere, and a dot in the domain part with at least one
/// character on each side.
pub fn validate_email(s: &str) -> Result<(), &'static str> {
    const ERR: &str = "Enter a valid email address";

    if s.chars().any(|c| c.is_whitespace()) {
        return Err(ERR);
    }

    let mut parts = s.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ERR),
    };
    if local.is_empty() || domain.is_empty() {
        return Err(ERR);
    }

    // The domain needs an interior dot (not leading, not trailing).
    let len = domain.chars().count();
    let has_interior_dot = domain
        .chars()
        .enumerate()
        .any(|(i, c)| c == '.' && i > 0 && i < len - 1);
    if !has_interior_dot {
        return Err(ERR);
    }

    Ok(())
}

/// Validates an Indian mobile number and returns it normalized to 10 digits.
///
/// Strips spaces, dashes and a leading `+`; a `91` country prefix on a
/// 12-digit result is dropped. The remainder must be exactly 10 digits
/// starting 6-9.
pub fn validate_phone(s: &str) -> Result<String, &'static str> {
    const ERR: &str = "Enter a valid 10-digit mobile number";

    let stripped: String = s
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '+'))
        .collect();
    if !stripped.chars().all(|c| c.is_ascii_digit()) {
        return Err(ERR);
    }

    let digits = match stripped.strip_prefix("91") {
        Some(rest) if stripped.len() == 12 => rest,
        _ => stripped.as_str(),
    };

    if digits.len() != 10 {
        return Err(ERR);
    }
    if !matches!(digits.as_bytes()[0], b'6'..=b'9') {
        return Err(ERR);
    }

    Ok(digits.to_string())
}

/// Validates the student-class form value against the fixed set.
pub fn validate_student_class(s: &str) -> Result<(), &'static str> {
    if STUDENT_CLASSES.contains(&s.trim()) {
        Ok(())
    } else {
        Err("Select a valid class")
    }
}

/// Validates the batch form value.
pub fn validate_batch(s: &str) -> Result<Batch, &'static str> {
    Batch::parse(s).ok_or("Select a valid batch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_requires_two_chars() {
        assert!(validate_name("Al").is_ok());
        assert!(validate_name("  A  ").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn email_accepts_simple_addresses() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@sub.domain.in").is_ok());
    }

    #[test]
    fn email_rejects_missing_domain_dot() {
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a.b@c").is_err());
    }

    #[test]
    fn email_rejects_whitespace_and_double_at() {
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@@c.com").is_err());
        assert!(validate_email("a@c.").is_err());
        assert!(validate_email("@c.com").is_err());
    }

    #[test]
    fn phone_accepts_ten_digits_starting_six_to_nine() {
        assert_eq!(validate_phone("8228907407").unwrap(), "8228907407");
        assert_eq!(validate_phone("6000000000").unwrap(), "6000000000");
    }

    #[test]
    fn phone_strips_country_code_and_separators() {
        assert_eq!(validate_phone("+91 8228907407").unwrap(), "8228907407");
        assert_eq!(validate_phone("82289-07407").unwrap(), "8228907407");
    }

    #[test]
    fn phone_rejects_short_or_bad_leading_digit() {
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("5228907407").is_err());
        assert!(validate_phone("82289074071").is_err());
        assert!(validate_phone("82289o7407").is_err());
    }

    #[test]
    fn batch_parses_case_insensitively() {
        assert_eq!(validate_batch("SPARK").unwrap(), Batch::Spark);
        assert_eq!(validate_batch("builders").unwrap(), Batch::Builders);
        assert!(validate_batch("premium").is_err());
        assert!(validate_batch("").is_err());
    }

    #[test]
    fn student_class_must_be_in_set() {
        assert!(validate_student_class("8").is_ok());
        assert!(validate_student_class(" 10 ").is_ok());
        assert!(validate_student_class("4").is_err());
        assert!(validate_student_class("").is_err());
    }
}
