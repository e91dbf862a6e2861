//! Contact details: phone numbers and email addresses.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::domain::shared::DomainError;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// A phone number normalized to its digits.
///
/// Spaces, dashes, dots and parentheses are dropped on input so that
/// `98765 43210` and `98765-43210` collide on the uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns error if the number has characters other than digits and
    /// separators, or fewer than 7 / more than 15 digits.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let mut digits = String::with_capacity(raw.len());
        for ch in raw.trim().chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '.' | '(' | ')' => {}
                '+' if digits.is_empty() => {}
                _ => {
                    return Err(DomainError::invalid(
                        "phone",
                        format!("Unexpected character '{ch}' in phone number"),
                    ));
                }
            }
        }
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(DomainError::invalid(
                "phone",
                format!("Phone number must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits"),
            ));
        }
        Ok(Self(digits))
    }

    /// Get the normalized digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the digits contain the given fragment.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

/// A syntactically plausible email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse an email address.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not of the form `local@domain.tld`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid("email", "This field is required."));
        }
        if !email_regex().is_match(trimmed) {
            return Err(DomainError::invalid("email", "Enter a valid email address."));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
