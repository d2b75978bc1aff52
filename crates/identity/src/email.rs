//! Email normalization.

use brigada_core::{DomainError, DomainResult};

/// Trim, lowercase and structurally check an email address.
///
/// This is a shape check, not deliverability: exactly one `@`, a non-empty
/// local part, and a domain with an interior dot.
pub fn normalize_email(raw: &str) -> DomainResult<String> {
    let email = raw.trim().to_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::parse("email must contain '@'"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(DomainError::parse("invalid email format"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::parse("email must not contain spaces"));
    }
    let dot_ok = domain
        .find('.')
        .is_some_and(|i| i > 0 && i < domain.len() - 1);
    if !dot_ok {
        return Err(DomainError::parse("invalid email domain"));
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Ana.Soto@Example.COM ").unwrap(),
            "ana.soto@example.com"
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "no-at.example.com", "@example.com", "a@b", "a@.com", "a@com.", "a@b@c.com", "a b@c.com"] {
            assert!(normalize_email(bad).is_err(), "accepted: {bad}");
        }
    }
}
