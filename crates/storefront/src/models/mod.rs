//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod order;
pub mod session;

pub use cart::{
    CartItem, CartLine, CartSummary, MAX_LINE_QUANTITY, QuantityOverflow, RemoveQuantity,
};
pub use catalog::{NewProduct, NewVariant, Product, Variant, VariantDetail};
pub use customer::{Address, Customer, CustomerCredentials, NewCustomer};
pub use order::{Order, OrderHeader, OrderItem, OrderLine, OrderSummary};
pub use session::{CurrentCustomer, keys as session_keys};
