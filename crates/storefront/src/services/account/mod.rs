//! Account service.
//!
//! Customer signup, password login and profile lookup. Customers identify
//! themselves with a single contact field holding an email or phone number.

mod error;

pub use error::AccountError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use coolcat_core::{Contact, CustomerId};

use crate::db::RepositoryError;
use crate::db::customers::CustomerRepository;
use crate::models::customer::{Customer, NewCustomer};

/// Account service.
pub struct AccountService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// Register a customer.
    ///
    /// Signing up again with the same contact and password returns the
    /// existing customer instead of creating a second one.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if the first name or password is blank.
    /// Returns `AccountError::InvalidContact` if the contact cannot be classified.
    /// Returns `AccountError::DuplicateContact` if the contact is registered
    /// with a different password.
    #[instrument(skip_all)]
    pub async fn signup(
        &self,
        first_name: &str,
        last_name: &str,
        contact: &str,
        password: &str,
    ) -> Result<Customer, AccountError> {
        let first_name = first_name.trim();
        if first_name.is_empty() {
            return Err(AccountError::Validation("first name is required".to_owned()));
        }
        if password.is_empty() {
            return Err(AccountError::Validation("password is required".to_owned()));
        }
        let contact = Contact::parse(contact)?;

        if let Some(existing) = self.existing_customer(&contact, password).await? {
            info!(customer_id = %existing.id, "Signup matched existing customer");
            return Ok(existing);
        }

        let new = NewCustomer {
            first_name: first_name.to_owned(),
            last_name: last_name.trim().to_owned(),
            contact,
            password_hash: hash_password(password)?,
        };

        match self.customers.create(&new).await {
            Ok(customer) => {
                info!(customer_id = %customer.id, "Customer created");
                Ok(customer)
            }
            // A concurrent signup inserted the same contact first.
            Err(RepositoryError::Conflict(_)) => self
                .existing_customer(&new.contact, password)
                .await?
                .ok_or(AccountError::DuplicateContact),
            Err(other) => Err(other.into()),
        }
    }

    /// Log in with a contact and password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if either field is blank.
    /// Returns `AccountError::InvalidCredentials` for an unknown contact,
    /// an unparseable contact, or a wrong password.
    #[instrument(skip_all)]
    pub async fn login(&self, contact: &str, password: &str) -> Result<Customer, AccountError> {
        if contact.trim().is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "contact and password are required".to_owned(),
            ));
        }

        let Ok(contact) = Contact::parse(contact) else {
            debug!("Login with unparseable contact");
            verify_dummy_password(password);
            return Err(AccountError::InvalidCredentials);
        };

        let Some(credentials) = self.customers.get_credentials(&contact).await? else {
            debug!("Login for unknown contact");
            verify_dummy_password(password);
            return Err(AccountError::InvalidCredentials);
        };

        verify_password(password, &credentials.password_hash)?;

        info!(customer_id = %credentials.customer.id, "Customer logged in");
        Ok(credentials.customer)
    }

    /// Get a customer's profile.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::CustomerNotFound` if the customer doesn't exist.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, AccountError> {
        self.customers
            .get_by_id(id)
            .await?
            .ok_or(AccountError::CustomerNotFound)
    }

    /// The customer registered under `contact`, if `password` is theirs.
    ///
    /// `Ok(None)` means the contact is free.
    async fn existing_customer(
        &self,
        contact: &Contact,
        password: &str,
    ) -> Result<Option<Customer>, AccountError> {
        let Some(credentials) = self.customers.get_credentials(contact).await? else {
            return Ok(None);
        };

        match verify_password(password, &credentials.password_hash) {
            Ok(()) => Ok(Some(credentials.customer)),
            Err(_) => Err(AccountError::DuplicateContact),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Hash checked on failed lookups so unknown contacts cost one Argon2
/// verification, like known ones.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("coolcat-no-such-customer").ok());

/// Run a verification whose result is discarded.
fn verify_dummy_password(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Hash a password with Argon2id and a random salt.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)
}
