//! Proper-name normalization (first names, last names).

use serde::{Deserialize, Serialize};

use brigada_core::{DomainError, DomainResult};

const ACCENTED: &str = "áéíóúÁÉÍÓÚñÑüÜ";

/// A title-cased proper name: letters, spaces and Spanish accented characters
/// only, one space between words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProperName(String);

impl ProperName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProperName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for ProperName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_proper_name(s)
    }
}

impl TryFrom<String> for ProperName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize_proper_name(&value)
    }
}

impl From<ProperName> for String {
    fn from(value: ProperName) -> Self {
        value.0
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ACCENTED.contains(c)
}

/// Validate and title-case a proper name.
///
/// Digits and symbols are rejected; surrounding/duplicate whitespace is
/// collapsed; each word comes out capitalized (`"juan pérez"` → `"Juan Pérez"`).
pub fn normalize_proper_name(raw: &str) -> DomainResult<ProperName> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::parse("name cannot be empty"));
    }
    if !trimmed.chars().all(|c| is_name_char(c) || c == ' ') {
        return Err(DomainError::parse(
            "name must contain only letters and spaces",
        ));
    }

    let mut words: Vec<String> = Vec::new();
    for word in trimmed.split_whitespace() {
        let mut cased = String::with_capacity(word.len());
        for (i, c) in word.chars().enumerate() {
            if i == 0 {
                cased.extend(c.to_uppercase());
            } else {
                cased.extend(c.to_lowercase());
            }
        }
        words.push(cased);
    }

    Ok(ProperName(words.join(" ")))
}
