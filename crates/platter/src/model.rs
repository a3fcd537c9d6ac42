//! Domain types.
//!
//! Field sets mirror the persisted schema; `src/migrations/` holds the
//! authoritative DDL.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{Error, Result};

/// A restaurant. Owns menu items and receives orders; deleting one removes
/// both (see the `ON DELETE CASCADE` rules in the migrations).
#[derive(Debug, Clone, Serialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub description: Option<String>,
}

/// One sellable item on a restaurant's menu.
///
/// `price` is the live catalog price. Orders never read it back after the
/// fact; each order item carries its own snapshot ([`OrderItem::price`]).
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    /// Free-form grouping, e.g. "mains" or "drinks".
    pub category: String,
    /// Tri-state: unset means the restaurant has not said either way.
    pub available: Option<bool>,
}

/// A registered user. Deleting a user keeps their orders; the reference is
/// nulled out instead.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A customer's order, tracked through [`OrderStatus`].
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub restaurant_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line within an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// Per-unit price at the time the item was added. Later changes to the
    /// menu item's price do not touch this.
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Order lifecycle states.
///
/// Stored as text in the `orders.status` column; anything outside this set
/// is rejected on the way in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Every recognized status, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// The wire and storage spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("unknown order status {s:?}")))
    }
}

impl Restaurant {
    pub(crate) fn from_row(row: &Row) -> Result<Restaurant> {
        Ok(Restaurant {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            zip_code: row.try_get("zip_code")?,
            description: row.try_get("description")?,
        })
    }
}

impl MenuItem {
    pub(crate) fn from_row(row: &Row) -> Result<MenuItem> {
        Ok(MenuItem {
            id: row.try_get("id")?,
            restaurant_id: row.try_get("restaurant_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            image_url: row.try_get("image_url")?,
            category: row.try_get("category")?,
            available: row.try_get("available")?,
        })
    }
}

impl User {
    pub(crate) fn from_row(row: &Row) -> Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl Order {
    pub(crate) fn from_row(row: &Row) -> Result<Order> {
        let status: String = row.try_get("status")?;
        Ok(Order {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            restaurant_id: row.try_get("restaurant_id")?,
            status: status.parse()?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl OrderItem {
    pub(crate) fn from_row(row: &Row) -> Result<OrderItem> {
        Ok(OrderItem {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            menu_item_id: row.try_get("menu_item_id")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
