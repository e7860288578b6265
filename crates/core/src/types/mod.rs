//! Core types for the Cool Cat storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod status;

pub use contact::{Contact, ContactError};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use price::{Price, PriceError};
pub use status::{OrderStatus, OrderStatusParseError};
