//! Core library for the platter restaurant ordering backend.
//!
//! Everything below the HTTP boundary lives here:
//!
//! - Domain types for restaurants, menu items, users, and the order
//!   aggregate ([`model`])
//! - Schema migrations written as Rust functions and applied in version
//!   order ([`migrate`], [`migrations`])
//! - Store modules that speak tokio-postgres directly ([`store`])
//! - Connection pooling for the server ([`pool`])
//!
//! # Ordering invariants
//!
//! The order aggregate carries the data-integrity rules:
//!
//! - An order item's `price` is copied from the menu item when the item is
//!   added and never rewritten afterwards ("price at time of order").
//! - Deleting an order deletes its items; deleting a menu item deletes the
//!   order items referencing it and leaves sibling items alone.
//! - `quantity >= 1` and `price >= 0` hold for every order item, enforced
//!   in the store and backed by CHECK constraints.
//!
//! Multi-step writes run inside a single transaction. Nothing here caches,
//! so every read reflects the latest committed state.

mod error;
pub mod migrate;
pub mod migrations;
pub mod model;
pub mod pool;
pub mod store;

pub use error::Error;
pub use migrate::{Migration, MigrationContext, MigrationRunner};
pub use model::{MenuItem, Order, OrderItem, OrderStatus, Restaurant, User};

/// Result type for platter operations.
pub type Result<T> = std::result::Result<T, Error>;

inventory::collect!(Migration);
