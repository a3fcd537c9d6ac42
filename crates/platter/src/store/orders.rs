//! The order aggregate: orders and their line items.
//!
//! Order item prices are snapshots taken from the menu item at add time;
//! nothing in this module rewrites them afterwards.

use rust_decimal::Decimal;
use tokio_postgres::{Client, GenericClient};
use uuid::Uuid;

use crate::model::{Order, OrderItem, OrderStatus};
use crate::store::{catalog, missing_referent};
use crate::{Error, Result};

/// Create an empty order in `pending` state.
///
/// The restaurant reference is validated by the foreign key, so a bogus id
/// comes back as `NotFound` rather than a storage error. Same for a bogus
/// user id.
pub async fn create(
    client: &impl GenericClient,
    restaurant_id: Uuid,
    user_id: Option<Uuid>,
) -> Result<Order> {
    let id = Uuid::new_v4();
    let row = match client
        .query_one(
            "INSERT INTO orders (id, user_id, restaurant_id)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, restaurant_id, status, created_at",
            &[&id, &user_id, &restaurant_id],
        )
        .await
    {
        Ok(row) => row,
        Err(e) => {
            return Err(match missing_referent(&e) {
                Some(what) => Error::NotFound(what),
                None => e.into(),
            });
        }
    };
    Order::from_row(&row)
}

pub async fn get(client: &impl GenericClient, order_id: Uuid) -> Result<Order> {
    let row = client
        .query_opt(
            "SELECT id, user_id, restaurant_id, status, created_at
             FROM orders WHERE id = $1",
            &[&order_id],
        )
        .await?
        .ok_or(Error::NotFound("order"))?;
    Order::from_row(&row)
}

/// All orders, oldest first.
pub async fn list(client: &impl GenericClient) -> Result<Vec<Order>> {
    let rows = client
        .query(
            "SELECT id, user_id, restaurant_id, status, created_at
             FROM orders ORDER BY created_at, id",
            &[],
        )
        .await?;
    rows.iter().map(Order::from_row).collect()
}

/// Line items for an order, oldest first.
///
/// An order with zero items comes back as `NotFound`, indistinguishable
/// from a missing order. Long-standing contract of the items endpoint;
/// callers that need the distinction should call [`get`] first.
pub async fn items(client: &impl GenericClient, order_id: Uuid) -> Result<Vec<OrderItem>> {
    let rows = client
        .query(
            "SELECT id, order_id, menu_item_id, quantity, price, created_at
             FROM order_items WHERE order_id = $1 ORDER BY created_at, id",
            &[&order_id],
        )
        .await?;
    if rows.is_empty() {
        return Err(Error::NotFound("order items"));
    }
    rows.iter().map(OrderItem::from_row).collect()
}

/// Exact total for an order: SUM(price * quantity) over its items,
/// computed in the database so no float arithmetic is involved.
///
/// Zero items means a NULL sum, reported as `NotFound` like [`items`].
pub async fn total(client: &impl GenericClient, order_id: Uuid) -> Result<Decimal> {
    let row = client
        .query_one(
            "SELECT SUM(price * quantity) FROM order_items WHERE order_id = $1",
            &[&order_id],
        )
        .await?;
    let total: Option<Decimal> = row.try_get(0)?;
    total.ok_or(Error::NotFound("order items"))
}

/// Append a line item to an order, snapshotting the menu item's current
/// price as the item's `price`.
///
/// The order check, price lookup, and insert share one transaction, so a
/// menu item deleted mid-operation surfaces as `NotFound` instead of a
/// stale snapshot or a dangling row.
pub async fn add_item(
    client: &mut Client,
    order_id: Uuid,
    menu_item_id: Uuid,
    quantity: i32,
) -> Result<OrderItem> {
    if quantity < 1 {
        return Err(Error::Validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }

    let tx = client.transaction().await?;
    if tx
        .query_opt("SELECT 1 FROM orders WHERE id = $1", &[&order_id])
        .await?
        .is_none()
    {
        return Err(Error::NotFound("order"));
    }
    let menu_item = catalog::get_menu_item(&tx, menu_item_id).await?;

    let id = Uuid::new_v4();
    let row = match tx
        .query_one(
            "INSERT INTO order_items (id, order_id, menu_item_id, quantity, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, order_id, menu_item_id, quantity, price, created_at",
            &[&id, &order_id, &menu_item_id, &quantity, &menu_item.price],
        )
        .await
    {
        Ok(row) => row,
        Err(e) => {
            return Err(match missing_referent(&e) {
                Some(what) => Error::NotFound(what),
                None => e.into(),
            });
        }
    };
    tx.commit().await?;
    OrderItem::from_row(&row)
}

/// Overwrite the order's status. `None` leaves the row untouched and
/// returns it as-is.
pub async fn update_status(
    client: &impl GenericClient,
    order_id: Uuid,
    status: Option<OrderStatus>,
) -> Result<Order> {
    let Some(status) = status else {
        return get(client, order_id).await;
    };
    let row = client
        .query_opt(
            "UPDATE orders SET status = $2 WHERE id = $1
             RETURNING id, user_id, restaurant_id, status, created_at",
            &[&order_id, &status.as_str()],
        )
        .await?
        .ok_or(Error::NotFound("order"))?;
    Order::from_row(&row)
}

/// Remove an order; the cascade rule removes its items.
pub async fn delete(client: &impl GenericClient, order_id: Uuid) -> Result<()> {
    let deleted = client
        .execute("DELETE FROM orders WHERE id = $1", &[&order_id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound("order"));
    }
    Ok(())
}

/// Remove one line item. The order id is part of the key, so an item id
/// that belongs to a different order is `NotFound`, not deleted.
pub async fn delete_item(
    client: &impl GenericClient,
    order_id: Uuid,
    item_id: Uuid,
) -> Result<()> {
    let deleted = client
        .execute(
            "DELETE FROM order_items WHERE id = $1 AND order_id = $2",
            &[&item_id, &order_id],
        )
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound("order item"));
    }
    Ok(())
}
