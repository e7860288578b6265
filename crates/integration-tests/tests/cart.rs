//! Integration tests for cart mutations.

use tokio::task::JoinSet;

use coolcat_core::{Price, VariantId};
use coolcat_integration_tests::TestStore;
use coolcat_storefront::models::{MAX_LINE_QUANTITY, RemoveQuantity};
use coolcat_storefront::services::{CartError, CartService};

#[tokio::test]
async fn test_adds_merge_into_one_line() {
    let store = TestStore::new().await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let variants = store.product("Cool Cat Poker", &[("Black", 2599)]).await;
    let cart = CartService::new(&store.pool);

    cart.add(customer.id, variants[0], 2).await.expect("first add");
    let total = cart.add(customer.id, variants[0], 3).await.expect("second add");

    assert_eq!(total, 5);
    assert_eq!(store.count("cart_items").await, 1);
    assert_eq!(store.cart_quantity(customer.id, variants[0]).await, Some(5));
}

#[tokio::test]
async fn test_removing_more_than_held_deletes_the_line() {
    let store = TestStore::new().await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let variants = store.product("Cool Cat Poker", &[("Black", 2599)]).await;
    let cart = CartService::new(&store.pool);

    cart.add(customer.id, variants[0], 4).await.expect("add");
    let remaining = cart
        .remove(customer.id, variants[0], RemoveQuantity::Count(999))
        .await
        .expect("remove");

    assert_eq!(remaining, 0);
    assert_eq!(store.cart_quantity(customer.id, variants[0]).await, None);
}

#[tokio::test]
async fn test_partial_and_full_removal() {
    let store = TestStore::new().await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let variants = store
        .product("Cool Cat Cash", &[("Black", 2999), ("Red", 2999)])
        .await;
    let cart = CartService::new(&store.pool);

    cart.add(customer.id, variants[0], 4).await.expect("add black");
    cart.add(customer.id, variants[1], 1).await.expect("add red");

    let remaining = cart
        .remove(customer.id, variants[0], RemoveQuantity::Count(1))
        .await
        .expect("partial remove");
    assert_eq!(remaining, 3);

    cart.remove(customer.id, variants[1], RemoveQuantity::All)
        .await
        .expect("full remove");

    let summary = cart.get_summary(customer.id).await.expect("cart");
    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.total_items, 3);
    assert_eq!(summary.subtotal, Price::from_cents(8997).expect("price"));
}

#[tokio::test]
async fn test_carts_are_per_customer() {
    let store = TestStore::new().await;
    let jane = store.customer("jane@example.com", "pw1").await;
    let bob = store.customer("bob@example.com", "pw1").await;
    let variants = store.product("Cool Cat Poker", &[("White", 2599)]).await;
    let cart = CartService::new(&store.pool);

    cart.add(jane.id, variants[0], 2).await.expect("jane adds");
    cart.remove(bob.id, variants[0], RemoveQuantity::All)
        .await
        .expect("bob removes nothing");

    assert_eq!(store.cart_quantity(jane.id, variants[0]).await, Some(2));
    assert!(cart.get_cart(bob.id).await.expect("bob cart").is_empty());
}

#[tokio::test]
async fn test_unknown_variant_is_rejected() {
    let store = TestStore::new().await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let cart = CartService::new(&store.pool);

    let err = cart
        .add(customer.id, VariantId::new(404), 1)
        .await
        .expect_err("unknown variant");
    assert!(matches!(err, CartError::InvalidVariant(_)));
    assert_eq!(store.count("cart_items").await, 0);
}

#[tokio::test]
async fn test_line_cannot_grow_past_limit() {
    let store = TestStore::new().await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let variants = store.product("Cool Cat Poker", &[("Black", 2599)]).await;
    let cart = CartService::new(&store.pool);

    let total = cart
        .add(customer.id, variants[0], MAX_LINE_QUANTITY)
        .await
        .expect("fill line");
    assert_eq!(total, MAX_LINE_QUANTITY);

    let err = cart
        .add(customer.id, variants[0], 1)
        .await
        .expect_err("line is full");
    assert!(matches!(err, CartError::LineFull));

    let err = cart
        .add(customer.id, variants[0], i64::MAX)
        .await
        .expect_err("huge quantity");
    assert!(matches!(err, CartError::InvalidQuantity(i64::MAX)));

    let summary = cart.get_summary(customer.id).await.expect("cart still reads");
    assert_eq!(summary.total_items, MAX_LINE_QUANTITY);
    assert_eq!(
        store.cart_quantity(customer.id, variants[0]).await,
        Some(MAX_LINE_QUANTITY)
    );
}

#[tokio::test]
async fn test_two_full_lines_total_correctly() {
    let store = TestStore::new().await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let variants = store
        .product("Cool Cat Cash", &[("Black", 2999), ("Red", 2999)])
        .await;
    let cart = CartService::new(&store.pool);

    for variant in &variants {
        cart.add(customer.id, *variant, MAX_LINE_QUANTITY)
            .await
            .expect("fill line");
    }

    let summary = cart.get_summary(customer.id).await.expect("cart");
    assert_eq!(summary.total_items, 2 * MAX_LINE_QUANTITY);
    assert_eq!(
        summary.subtotal,
        Price::from_cents(2 * 2999 * MAX_LINE_QUANTITY).expect("price")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_merge_into_one_line() {
    const ADDS: i64 = 16;

    let store = TestStore::on_disk(8).await;
    let customer = store.customer("jane@example.com", "pw1").await;
    let variants = store.product("Cool Cat Poker", &[("Black", 2599)]).await;

    let mut tasks = JoinSet::new();
    for _ in 0..ADDS {
        let pool = store.pool.clone();
        let (customer_id, variant_id) = (customer.id, variants[0]);
        tasks.spawn(async move { CartService::new(&pool).add(customer_id, variant_id, 1).await });
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("task panicked").expect("concurrent add");
    }

    assert_eq!(store.count("cart_items").await, 1);
    assert_eq!(store.cart_quantity(customer.id, variants[0]).await, Some(ADDS));
}
