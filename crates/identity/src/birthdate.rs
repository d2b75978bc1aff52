//! Birth-date sanity validation.

use chrono::{Datelike, NaiveDate};

use brigada_core::{DomainError, DomainResult};

const MIN_AGE_YEARS: i32 = 14;
const MAX_AGE_YEARS: i32 = 100;

/// Validate that a birth date is plausible relative to `today`:
/// not in the future, and an age between 14 and 100 years.
pub fn validate_birth_date(birth: NaiveDate, today: NaiveDate) -> DomainResult<()> {
    if birth > today {
        return Err(DomainError::validation(
            "birth date cannot be in the future",
        ));
    }

    let had_birthday = (today.month(), today.day()) >= (birth.month(), birth.day());
    let age = today.year() - birth.year() - if had_birthday { 0 } else { 1 };

    if age < MIN_AGE_YEARS {
        return Err(DomainError::validation(format!(
            "user must be at least {MIN_AGE_YEARS} years old (is {age})"
        )));
    }
    if age > MAX_AGE_YEARS {
        return Err(DomainError::validation(
            "birth date does not look valid (older than 100 years)",
        ));
    }

    Ok(())
}
