//! Integration tests for customer accounts.

use coolcat_core::Contact;
use coolcat_integration_tests::TestStore;
use coolcat_storefront::db::CustomerRepository;
use coolcat_storefront::services::{AccountError, AccountService};

#[tokio::test]
async fn test_repeated_signup_creates_one_customer() {
    let store = TestStore::new().await;
    let accounts = AccountService::new(&store.pool);

    let first = accounts
        .signup("Jane", "Doe", "jane@example.com", "pw1")
        .await
        .expect("first signup");
    let second = accounts
        .signup("Jane", "Doe", "  JANE@example.com ", "pw1")
        .await
        .expect("second signup");

    assert_eq!(first.id, second.id);
    assert_eq!(store.count("customers").await, 1);

    let contact = Contact::parse("jane@example.com").expect("valid contact");
    let count = CustomerRepository::new(&store.pool)
        .count_by_contact(&contact)
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_signup_with_taken_contact_and_other_password() {
    let store = TestStore::new().await;
    store.customer("+1 650 253 0000", "pw1").await;

    let err = AccountService::new(&store.pool)
        .signup("Other", "", "+16502530000", "pw2")
        .await
        .expect_err("duplicate contact");
    assert!(matches!(err, AccountError::DuplicateContact));
    assert_eq!(store.count("customers").await, 1);
}

#[tokio::test]
async fn test_passwords_are_stored_hashed() {
    let store = TestStore::new().await;
    store.customer("jane@example.com", "correct horse").await;

    let hash: String = sqlx::query_scalar("SELECT password_hash FROM customers")
        .fetch_one(&store.pool)
        .await
        .expect("stored hash");
    assert!(hash.starts_with("$argon2"));
    assert!(!hash.contains("correct horse"));
}

#[tokio::test]
async fn test_login_by_phone_and_email() {
    let store = TestStore::new().await;
    let accounts = AccountService::new(&store.pool);
    let by_phone = store.customer("+1 (650) 253-0000", "pw1").await;
    let by_email = store.customer("Jane@Example.com", "pw2").await;

    let logged_in = accounts.login("+16502530000", "pw1").await.expect("phone login");
    assert_eq!(logged_in.id, by_phone.id);

    let logged_in = accounts
        .login("jane@example.com", "pw2")
        .await
        .expect("email login");
    assert_eq!(logged_in.id, by_email.id);

    assert!(matches!(
        accounts.login("jane@example.com", "pw1").await,
        Err(AccountError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_hostile_input_is_stored_verbatim() {
    let store = TestStore::new().await;
    let accounts = AccountService::new(&store.pool);
    let contact = "x';DROP_TABLE_customers;--@example.com";

    let customer = accounts
        .signup("Robert');DROP TABLE customers;--", "", contact, "pw1")
        .await
        .expect("signup with hostile input");
    assert_eq!(customer.first_name, "Robert');DROP TABLE customers;--");
    assert_eq!(store.count("customers").await, 1);

    let logged_in = accounts.login(contact, "pw1").await.expect("login");
    assert_eq!(logged_in.id, customer.id);

    assert!(matches!(
        accounts.login("' OR '1'='1", "' OR '1'='1").await,
        Err(AccountError::InvalidCredentials)
    ));
    assert!(matches!(
        accounts.login("x@example.com' OR '1'='1", "pw1").await,
        Err(AccountError::InvalidCredentials)
    ));
}
