//! The validated user record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use brigada_core::{Describable, DomainResult, Entity, UserId};

use crate::{
    birthdate::validate_birth_date, email::normalize_email, name::ProperName,
    normalize_proper_name, phone::Phone, rut::Rut, validate_and_canonicalize,
};

/// Raw registration input, as collected from a form. Every field is
/// unvalidated text; [`User::register`] turns it into a canonical record or
/// a per-field error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub rut: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// A user account with canonicalized identity fields.
///
/// The RUT is immutable after creation: there is no setter and the edit flow
/// never touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    rut: Rut,
    email: String,
    first_name: ProperName,
    last_name: ProperName,
    phone: Option<Phone>,
    birth_date: Option<NaiveDate>,
    is_verified: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Validate and normalize a registration input into a user record.
    ///
    /// Each field goes through its own normalizer; the first failing field
    /// aborts with its `DomainError`, which the form boundary reports
    /// per-field.
    pub fn register(id: UserId, input: NewUser, now: DateTime<Utc>) -> DomainResult<Self> {
        let rut = validate_and_canonicalize(&input.rut)?;
        let email = normalize_email(&input.email)?;
        let first_name = normalize_proper_name(&input.first_name)?;
        let last_name = normalize_proper_name(&input.last_name)?;
        let phone = input
            .phone
            .as_deref()
            .map(crate::normalize_phone)
            .transpose()?;
        if let Some(birth) = input.birth_date {
            validate_birth_date(birth, now.date_naive())?;
        }

        Ok(Self {
            id,
            rut,
            email,
            first_name,
            last_name,
            phone,
            birth_date: input.birth_date,
            is_verified: false,
            is_active: true,
            created_at: now,
        })
    }

    pub fn rut(&self) -> &Rut {
        &self.rut
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &ProperName {
        &self.first_name
    }

    pub fn last_name(&self) -> &ProperName {
        &self.last_name
    }

    pub fn phone(&self) -> Option<&Phone> {
        self.phone.as_ref()
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl Describable for User {
    fn display_text(&self) -> String {
        self.full_name()
    }
}
