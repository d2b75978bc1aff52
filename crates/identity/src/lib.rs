//! `brigada-identity` — identity fields and the validated user record.
//!
//! Pure validation/normalization: the Chilean RUT engine, phone and proper-name
//! normalizers, and the `User` record assembled from them. No IO, no state.

pub mod birthdate;
pub mod email;
pub mod name;
pub mod phone;
pub mod rut;
pub mod user;

pub use birthdate::validate_birth_date;
pub use email::normalize_email;
pub use name::{normalize_proper_name, ProperName};
pub use phone::{normalize_phone, Phone};
pub use rut::{compute_check_digit, parse, validate_and_canonicalize, verify, ParsedRut, Rut};
pub use user::{NewUser, User};
