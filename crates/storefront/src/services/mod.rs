//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `account` - Customer signup, login and profile
//! - `catalog` - Read-only products and variants
//! - `cart` - Cart line mutations
//! - `checkout` - Atomic cart-to-order conversion
//! - `orders` - Order history
//!
//! Services borrow the pool for the length of a request and take the
//! acting customer as an explicit `CustomerId`.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

pub use account::{AccountError, AccountService};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutError, CheckoutService};
pub use orders::{OrderError, OrderService};
