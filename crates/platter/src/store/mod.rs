//! Store modules, one per resource family, all speaking tokio-postgres
//! directly.
//!
//! Read and single-statement functions take `&impl GenericClient`, so they
//! run equally against a pooled client, a bare connection, or an open
//! transaction. Multi-step writes take `&mut Client` and own their
//! transaction.

pub mod catalog;
pub mod orders;
pub mod users;

use tokio_postgres::error::SqlState;

/// Name the missing entity when `err` is a foreign-key violation, based on
/// the constraint that fired. `None` for anything else.
pub(crate) fn missing_referent(err: &tokio_postgres::Error) -> Option<&'static str> {
    let db = err.as_db_error()?;
    if db.code() != &SqlState::FOREIGN_KEY_VIOLATION {
        return None;
    }
    let constraint = db.constraint()?;
    // Constraint names are Postgres defaults: <table>_<column>_fkey.
    // Match the more specific column names first.
    if constraint.contains("menu_item_id") {
        Some("menu item")
    } else if constraint.contains("restaurant_id") {
        Some("restaurant")
    } else if constraint.contains("user_id") {
        Some("user")
    } else if constraint.contains("order_id") {
        Some("order")
    } else {
        None
    }
}

pub(crate) fn is_unique_violation(err: &tokio_postgres::Error) -> bool {
    err.as_db_error()
        .is_some_and(|db| db.code() == &SqlState::UNIQUE_VIOLATION)
}
