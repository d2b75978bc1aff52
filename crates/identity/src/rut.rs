//! Chilean RUT parsing, Modulo-11 checksum and canonical formatting.
//!
//! A RUT is a decimal body plus one check character (`0`-`9` or `K`). Users
//! type it in many shapes (`12.345.678-k`, `12345678-K`, `12345678`); this
//! module normalizes all of them to the single canonical form
//! `"<body>-<CHECK>"` and never lets a mismatched body/check pair through.

use serde::{Deserialize, Serialize};

use brigada_core::{DomainError, DomainResult};

/// A validated RUT. The check character is always the Modulo-11 checksum of
/// the body; construction goes through [`validate_and_canonicalize`] or
/// [`verify`], so a mismatched pair cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut {
    body: String,
    check: char,
}

impl Rut {
    /// Decimal digits of the body, without separators.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Uppercase check character (`0`-`9` or `K`).
    pub fn check_digit(&self) -> char {
        self.check
    }

    /// Canonical textual form, `"<body>-<check>"`.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for Rut {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.body, self.check)
    }
}

impl core::str::FromStr for Rut {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_and_canonicalize(s)
    }
}

impl TryFrom<String> for Rut {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_and_canonicalize(&value)
    }
}

impl From<Rut> for String {
    fn from(value: Rut) -> Self {
        value.to_string()
    }
}

/// Outcome of [`parse`]: the body digits plus the check digit the user
/// explicitly supplied, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRut {
    pub body: String,
    pub supplied_check: Option<char>,
}

/// Modulo-11 check digit for a numeric body.
///
/// Digits are weighted least-significant first with the repeating factor
/// cycle `2,3,4,5,6,7`; the result is `(-sum) mod 11`, mapped to `'K'` for
/// ten. That remainder is always in `[0, 10]`, so no other branch exists.
pub fn compute_check_digit(body: u64) -> char {
    check_digit_of(&body.to_string())
}

/// Same algorithm over a pre-validated string of decimal digits, so bodies of
/// arbitrary length never overflow an integer parse.
fn check_digit_of(digits: &str) -> char {
    let mut sum: u64 = 0;
    let mut factor: u64 = 2;
    for c in digits.chars().rev() {
        let d = c.to_digit(10).unwrap_or(0) as u64;
        sum += d * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    let remainder = (11 - (sum % 11)) % 11;
    match remainder {
        10 => 'K',
        r => char::from(b'0' + r as u8),
    }
}

/// Strip separators and detect whether the user supplied a check digit.
///
/// `.`, `-` and whitespace are removed and the rest uppercased. Intention is
/// read from the *original* input: a literal `-` means the final cleaned
/// character is the user's check digit; otherwise the whole cleaned string is
/// the body and no check digit was supplied.
pub fn parse(raw: &str) -> DomainResult<ParsedRut> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return Err(DomainError::parse("RUT is too short"));
    }
    if !cleaned.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::parse("RUT contains invalid characters"));
    }

    let (body, supplied_check) = if raw.contains('-') {
        let mut chars = cleaned.chars();
        let check = chars.next_back();
        (chars.as_str().to_string(), check)
    } else {
        (cleaned, None)
    };

    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::parse("RUT body must contain only digits"));
    }

    Ok(ParsedRut {
        body,
        supplied_check,
    })
}

/// Parse, checksum and canonicalize a raw RUT string.
///
/// Dual-mode field contract:
/// - check digit supplied (hyphen present) → verify it; disagreement is
///   [`DomainError::ChecksumMismatch`].
/// - check digit omitted → if the trailing digit happens to complete a valid
///   body/check pair, honor that reading; otherwise auto-compute the check
///   digit for the whole body.
///
/// Either way the result is the canonical `"<body>-<check>"` pair.
pub fn validate_and_canonicalize(raw: &str) -> DomainResult<Rut> {
    let parsed = parse(raw)?;

    if let Some(supplied) = parsed.supplied_check {
        let computed = check_digit_of(&parsed.body);
        if supplied != computed {
            return Err(DomainError::ChecksumMismatch { supplied, computed });
        }
        return Ok(Rut {
            body: parsed.body,
            check: computed,
        });
    }

    if parsed.body.len() >= 2 {
        let (head, tail) = parsed.body.split_at(parsed.body.len() - 1);
        if let Some(last) = tail.chars().next() {
            if check_digit_of(head) == last {
                return Ok(Rut {
                    body: head.to_string(),
                    check: last,
                });
            }
        }
    }

    let check = check_digit_of(&parsed.body);
    Ok(Rut {
        body: parsed.body,
        check,
    })
}

/// Strict verify-only validation.
///
/// Always treats the final cleaned character as the check digit, regardless
/// of hyphens, and verifies it unconditionally. This is the stored-record
/// counterpart of [`validate_and_canonicalize`], with no auto-computation.
pub fn verify(raw: &str) -> DomainResult<Rut> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return Err(DomainError::parse("RUT is too short"));
    }
    if !cleaned.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::parse("RUT contains invalid characters"));
    }

    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    let supplied = match check.chars().next() {
        Some(c) => c,
        None => return Err(DomainError::parse("RUT is too short")),
    };
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::parse("RUT body must contain only digits"));
    }

    let computed = check_digit_of(body);
    if supplied != computed {
        return Err(DomainError::ChecksumMismatch { supplied, computed });
    }

    Ok(Rut {
        body: body.to_string(),
        check: computed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn check_digit_known_vectors() {
        assert_eq!(compute_check_digit(19_980_425), '1');
        assert_eq!(compute_check_digit(17_124_966), 'K');
        assert_eq!(compute_check_digit(11_111_111), '1');
    }

    #[test]
    fn canonicalize_accepts_all_common_shapes() {
        for raw in ["19.980.425-1", "199804251", "19980425", "19980425-1"] {
            let rut = validate_and_canonicalize(raw).unwrap();
            assert_eq!(rut.to_string(), "19980425-1", "input: {raw}");
        }
    }

    #[test]
    fn canonicalize_rejects_wrong_check_digit() {
        let err = validate_and_canonicalize("19.980.425-K").unwrap_err();
        assert_eq!(
            err,
            DomainError::ChecksumMismatch {
                supplied: 'K',
                computed: '1'
            }
        );
    }

    #[test]
    fn canonicalize_rejects_garbage() {
        assert!(matches!(
            validate_and_canonicalize("hola-mundo"),
            Err(DomainError::Parse(_))
        ));
        assert!(matches!(
            validate_and_canonicalize(""),
            Err(DomainError::Parse(_))
        ));
        assert!(matches!(
            validate_and_canonicalize("5"),
            Err(DomainError::Parse(_))
        ));
    }

    #[test]
    fn lowercase_k_is_accepted() {
        let rut = validate_and_canonicalize("17.124.966-k").unwrap();
        assert_eq!(rut.to_string(), "17124966-K");
        assert_eq!(rut.check_digit(), 'K');
    }

    #[test]
    fn parse_detects_intention_from_hyphen() {
        let with = parse("19980425-1").unwrap();
        assert_eq!(with.body, "19980425");
        assert_eq!(with.supplied_check, Some('1'));

        let without = parse("19980425").unwrap();
        assert_eq!(without.body, "19980425");
        assert_eq!(without.supplied_check, None);
    }

    #[test]
    fn trailing_k_without_hyphen_is_not_a_check_digit() {
        // No hyphen means the whole cleaned string is the body, and bodies
        // are numeric. K-ending RUTs must be written with their hyphen.
        assert!(matches!(parse("17124966K"), Err(DomainError::Parse(_))));
        assert!(matches!(
            validate_and_canonicalize("17124966k"),
            Err(DomainError::Parse(_))
        ));
        assert_eq!(
            validate_and_canonicalize("17124966-K").unwrap().to_string(),
            "17124966-K"
        );
    }

    #[test]
    fn verify_always_splits() {
        assert_eq!(verify("19980425-1").unwrap().to_string(), "19980425-1");
        assert_eq!(verify("199804251").unwrap().to_string(), "19980425-1");
        assert_eq!(verify("17124966K").unwrap().to_string(), "17124966-K");
        assert!(matches!(
            verify("19980425-K"),
            Err(DomainError::ChecksumMismatch { .. })
        ));
        assert!(matches!(verify("1"), Err(DomainError::Parse(_))));
    }

    #[test]
    fn serde_round_trips_canonical_string() {
        let rut = validate_and_canonicalize("19.980.425-1").unwrap();
        let json = serde_json::to_string(&rut).unwrap();
        assert_eq!(json, "\"19980425-1\"");
        let back: Rut = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rut);

        let bad: Result<Rut, _> = serde_json::from_str("\"19980425-K\"");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn check_digit_is_total_and_in_alphabet(body in 1u64..1_000_000_000_000) {
            let dv = compute_check_digit(body);
            prop_assert!(dv == 'K' || dv.is_ascii_digit());
        }

        #[test]
        fn canonical_form_is_a_fixed_point(body in 10u64..1_000_000_000) {
            let dv = compute_check_digit(body);
            let canonical = format!("{body}-{dv}");
            let rut = validate_and_canonicalize(&canonical).unwrap();
            prop_assert_eq!(rut.to_string(), canonical.clone());
            // Re-validating the canonical output must be the identity.
            let again = validate_and_canonicalize(&rut.to_string()).unwrap();
            prop_assert_eq!(again.to_string(), canonical);
        }

        #[test]
        fn verify_agrees_with_canonicalize_on_explicit_pairs(body in 10u64..1_000_000_000) {
            let dv = compute_check_digit(body);
            let raw = format!("{body}-{dv}");
            prop_assert_eq!(
                verify(&raw).unwrap(),
                validate_and_canonicalize(&raw).unwrap()
            );
        }
    }
}
