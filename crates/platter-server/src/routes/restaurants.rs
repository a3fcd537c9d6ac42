//! `/restaurants` endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use platter::model::Restaurant;
use platter::store::catalog::{self, NewRestaurant, RestaurantPatch};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants/", get(list).post(create))
        .route(
            "/restaurants/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Restaurant>>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::list_restaurants(&**conn).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewRestaurant>,
) -> ApiResult<Json<Restaurant>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::create_restaurant(&**conn, body).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Restaurant>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::get_restaurant(&**conn, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RestaurantPatch>,
) -> ApiResult<Json<Restaurant>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::update_restaurant(&**conn, id, body).await?))
}

/// Deletes the restaurant and, through the cascade rules, its menu items
/// and orders.
async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let conn = state.conn().await?;
    catalog::delete_restaurant(&**conn, id).await?;
    Ok(Json(json!({ "message": "restaurant deleted" })))
}
