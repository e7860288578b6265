//! Customer repository for database operations.
//!
//! Lookups by contact go through the normalized [`Contact`], so an email is
//! always matched lowercased and a phone number in E.164 form.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use coolcat_core::{Contact, CustomerId, Email, PhoneNumber};

use super::RepositoryError;
use crate::models::customer::{Address, Customer, CustomerCredentials, NewCustomer};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    first_name: String,
    last_name: String,
    email: Option<Email>,
    phone_number: Option<PhoneNumber>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    password_hash: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        if row.email.is_none() && row.phone_number.is_none() {
            return Err(RepositoryError::DataCorruption(format!(
                "customer {} has neither email nor phone number",
                row.id
            )));
        }

        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            address: Address {
                street: row.street,
                city: row.city,
                state: row.state,
                zip_code: row.zip_code,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a customer by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, first_name, last_name, email, phone_number,
                   street, city, state, zip_code, created_at, updated_at
            FROM customers
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Get a customer and their password hash by normalized contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_credentials(
        &self,
        contact: &Contact,
    ) -> Result<Option<CustomerCredentials>, RepositoryError> {
        let query = match contact {
            Contact::Email(email) => sqlx::query_as::<_, CredentialsRow>(
                r"
                SELECT id, first_name, last_name, email, phone_number,
                       street, city, state, zip_code, created_at, updated_at,
                       password_hash
                FROM customers
                WHERE email = ?
                ",
            )
            .bind(email),
            Contact::Phone(phone) => sqlx::query_as::<_, CredentialsRow>(
                r"
                SELECT id, first_name, last_name, email, phone_number,
                       street, city, state, zip_code, created_at, updated_at,
                       password_hash
                FROM customers
                WHERE phone_number = ?
                ",
            )
            .bind(phone),
        };

        let Some(row) = query.fetch_optional(self.pool).await? else {
            return Ok(None);
        };

        Ok(Some(CustomerCredentials {
            customer: Customer::try_from(row.customer)?,
            password_hash: row.password_hash,
        }))
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or phone number is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers
                (first_name, last_name, email, phone_number, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, first_name, last_name, email, phone_number,
                      street, city, state, zip_code, created_at, updated_at
            ",
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.contact.email())
        .bind(new.contact.phone())
        .bind(&new.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "contact already registered"))?;

        Customer::try_from(row)
    }

    /// Count customers registered under a contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_contact(&self, contact: &Contact) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customers WHERE email = ? OR phone_number = ?",
        )
        .bind(contact.email())
        .bind(contact.phone())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }
}
