//! Cool Cat Core - Shared domain types.
//!
//! This crate provides the types used across the Cool Cat components:
//! - `storefront` - Customer-facing store service (accounts, catalog, cart, checkout, orders)
//! - `cli` - Command-line tools for migrations, seeding and fulfillment
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The optional `sqlite` feature adds `sqlx` encode/decode
//! implementations so the types can be bound and read directly.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, contacts (email / phone), prices and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
