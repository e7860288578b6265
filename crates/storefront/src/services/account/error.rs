//! Account error types.

use thiserror::Error;

use coolcat_core::ContactError;

use crate::db::RepositoryError;

/// Errors that can occur during signup, login and profile lookup.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required field is missing or blank.
    #[error("{0}")]
    Validation(String),

    /// The contact is neither a valid email nor a valid phone number.
    #[error("invalid contact: {0}")]
    InvalidContact(#[from] ContactError),

    /// Unknown contact, unparseable contact, or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The contact belongs to an account whose password did not match.
    #[error("an account with this contact already exists")]
    DuplicateContact,

    /// Customer not found.
    #[error("customer not found")]
    CustomerNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
