//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use coolcat_core::{Contact, CustomerId, Email, PhoneNumber};

/// A registered customer.
///
/// At least one of `email` and `phone_number` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    /// Lowercased email, if the customer signed up with one.
    pub email: Option<Email>,
    /// E.164 phone number, if the customer signed up with one.
    pub phone_number: Option<PhoneNumber>,
    /// Postal address. Not collected at signup.
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// The contact the customer can log in with, preferring email.
    #[must_use]
    pub fn contact(&self) -> Option<Contact> {
        self.email
            .clone()
            .map(Contact::Email)
            .or_else(|| self.phone_number.clone().map(Contact::Phone))
    }

    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// Optional postal address fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// A customer together with their stored password hash.
///
/// Only the account service sees this type; it is never serialized.
#[derive(Debug, Clone)]
pub struct CustomerCredentials {
    pub customer: Customer,
    /// PHC-format Argon2 hash.
    pub password_hash: String,
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub contact: Contact,
    /// PHC-format Argon2 hash, never the plaintext.
    pub password_hash: String,
}
