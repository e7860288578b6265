//! Customer contact classification.
//!
//! A customer signs up and logs in with a single "contact" field that holds
//! either an email address or a phone number. [`Contact::parse`] decides which
//! one it is without guessing:
//!
//! | Input                     | Result                         |
//! |---------------------------|--------------------------------|
//! | empty / whitespace        | [`ContactError::Empty`]        |
//! | contains `@`              | [`Contact::Email`] or [`ContactError::InvalidEmail`] |
//! | no `@`                    | [`Contact::Phone`] or [`ContactError::InvalidPhone`] |
//!
//! Anything with an `@` is never reinterpreted as a phone number, so
//! `a@b@c.com` and `user@localhost` are rejected rather than falling through.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::{Email, EmailError};
use super::phone::{PhoneError, PhoneNumber};

/// Errors that can occur when classifying a contact string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// No contact was provided.
    #[error("an email address or phone number is required")]
    Empty,
    /// The contact looked like an email but is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    /// The contact looked like a phone number but is malformed.
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
}

/// A normalized customer contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Contact {
    /// Lowercased email address.
    Email(Email),
    /// E.164 phone number.
    Phone(PhoneNumber),
}

impl Contact {
    /// Classify and normalize a raw contact string.
    ///
    /// # Errors
    ///
    /// See the module documentation for the classification table.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::Empty);
        }

        if s.contains('@') {
            Ok(Self::Email(Email::parse(s)?))
        } else {
            Ok(Self::Phone(PhoneNumber::parse(s)?))
        }
    }

    /// The email address, if this contact is one.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        match self {
            Self::Email(email) => Some(email),
            Self::Phone(_) => None,
        }
    }

    /// The phone number, if this contact is one.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        match self {
            Self::Phone(phone) => Some(phone),
            Self::Email(_) => None,
        }
    }

    /// The normalized value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(email) => email.as_str(),
            Self::Phone(phone) => phone.as_str(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Contact {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
