//! `/menu-items` endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use platter::model::MenuItem;
use platter::store::catalog::{self, MenuItemPatch, NewMenuItem};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu-items/", get(list).post(create))
        .route("/menu-items/{id}", get(get_one).put(update).delete(remove))
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    restaurant_id: Option<Uuid>,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<MenuItem>>> {
    let conn = state.conn().await?;
    Ok(Json(
        catalog::list_menu_items(&**conn, query.restaurant_id).await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewMenuItem>,
) -> ApiResult<Json<MenuItem>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::create_menu_item(&**conn, body).await?))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MenuItem>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::get_menu_item(&**conn, id).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MenuItemPatch>,
) -> ApiResult<Json<MenuItem>> {
    let conn = state.conn().await?;
    Ok(Json(catalog::update_menu_item(&**conn, id, body).await?))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let conn = state.conn().await?;
    catalog::delete_menu_item(&**conn, id).await?;
    Ok(Json(json!({ "message": "menu item deleted" })))
}
