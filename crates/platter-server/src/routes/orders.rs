//! `/orders` endpoints: the order aggregate.

use axum::extract::{Path, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use platter::model::{Order, OrderItem, OrderStatus};
use platter::store::orders;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/", get(list).post(create))
        .route("/orders/{id}", get(get_one).delete(remove))
        .route("/orders/{id}/items", get(items).post(add_item))
        .route("/orders/{id}/items/{item_id}", delete(remove_item))
        .route("/orders/{id}/status", put(update_status))
        .route("/orders/{id}/total", get(total))
}

/// Body for `POST /orders/`. New orders always start pending and empty;
/// unknown extra fields are ignored.
#[derive(Debug, Deserialize)]
struct CreateOrder {
    restaurant_id: Uuid,
    #[serde(default)]
    user_id: Option<Uuid>,
}

/// Body for `POST /orders/{id}/items`. A client-supplied `price` is
/// accepted for compatibility and ignored: the stored price is always the
/// menu item's current one.
#[derive(Debug, Deserialize)]
struct AddItem {
    menu_item_id: Uuid,
    quantity: i32,
    #[serde(default)]
    #[allow(dead_code)]
    price: Option<f64>,
}

/// Body for `PUT /orders/{id}/status`. An omitted status is a no-op that
/// still returns the order.
#[derive(Debug, Deserialize)]
struct UpdateStatus {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct OrderTotal {
    order_id: Uuid,
    total: Decimal,
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    let conn = state.conn().await?;
    Ok(Json(orders::list(&**conn).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateOrder>,
) -> ApiResult<Json<Order>> {
    let conn = state.conn().await?;
    Ok(Json(
        orders::create(&**conn, body.restaurant_id, body.user_id).await?,
    ))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Order>> {
    let conn = state.conn().await?;
    Ok(Json(orders::get(&**conn, id).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let conn = state.conn().await?;
    orders::delete(&**conn, id).await?;
    Ok(Json(json!({ "message": "order deleted" })))
}

async fn items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<OrderItem>>> {
    let conn = state.conn().await?;
    Ok(Json(orders::items(&**conn, id).await?))
}

async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddItem>,
) -> ApiResult<Json<OrderItem>> {
    let mut conn = state.conn().await?;
    Ok(Json(
        orders::add_item(&mut **conn, id, body.menu_item_id, body.quantity).await?,
    ))
}

async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    let conn = state.conn().await?;
    orders::delete_item(&**conn, id, item_id).await?;
    Ok(Json(json!({ "message": "order item deleted" })))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatus>,
) -> ApiResult<Json<Order>> {
    let status = body
        .status
        .as_deref()
        .map(|s| s.parse::<OrderStatus>())
        .transpose()?;
    let conn = state.conn().await?;
    Ok(Json(orders::update_status(&**conn, id, status).await?))
}

async fn total(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OrderTotal>> {
    let conn = state.conn().await?;
    let total = orders::total(&**conn, id).await?;
    Ok(Json(OrderTotal {
        order_id: id,
        total,
    }))
}
