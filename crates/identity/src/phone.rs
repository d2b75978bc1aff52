//! Chilean mobile phone normalization.

use serde::{Deserialize, Serialize};

use brigada_core::{DomainError, DomainResult};

/// A normalized Chilean mobile number: `"+56"` followed by nine digits, the
/// first of which is `9`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Canonical form, e.g. `"+56912345678"`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The nine national digits, without the country prefix.
    pub fn national_digits(&self) -> &str {
        &self.0[3..]
    }
}

impl core::fmt::Display for Phone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for Phone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_phone(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize_phone(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

/// Normalize a raw phone string to the canonical `+56` form.
///
/// Accepts both bare national numbers (`"912345678"`, `"9 1234 5678"`) and
/// already-prefixed ones (`"+56912345678"`). The national part must be nine
/// digits starting with `9`.
pub fn normalize_phone(raw: &str) -> DomainResult<Phone> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let national = compact.strip_prefix("+56").unwrap_or(&compact);

    if national.is_empty() || !national.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::parse("phone must contain only digits"));
    }
    if national.len() != 9 {
        return Err(DomainError::parse(format!(
            "phone must have 9 digits (got {})",
            national.len()
        )));
    }
    if !national.starts_with('9') {
        return Err(DomainError::parse("phone must start with 9"));
    }

    Ok(Phone(format!("+56{national}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spaced_national_number() {
        assert_eq!(normalize_phone("9 1234 5678").unwrap().as_str(), "+56912345678");
    }

    #[test]
    fn accepts_already_prefixed_number() {
        let phone = normalize_phone("+56987654321").unwrap();
        assert_eq!(phone.as_str(), "+56987654321");
        assert_eq!(phone.national_digits(), "987654321");
    }

    #[test]
    fn rejects_wrong_leading_digit() {
        assert!(matches!(
            normalize_phone("8123 4567"),
            Err(DomainError::Parse(_))
        ));
        assert!(matches!(
            normalize_phone("812345678"),
            Err(DomainError::Parse(_))
        ));
    }

    #[test]
    fn rejects_wrong_length_and_non_digits() {
        assert!(normalize_phone("91234567").is_err());
        assert!(normalize_phone("9123456789").is_err());
        assert!(normalize_phone("9abc45678").is_err());
        assert!(normalize_phone("").is_err());
    }
}
