//! `/users` endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use platter::model::User;
use platter::store::users::{self, NewUser};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list).post(create))
        .route("/users/{id}", get(get_one).delete(remove))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let conn = state.conn().await?;
    Ok(Json(users::list(&**conn).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> ApiResult<Json<User>> {
    let conn = state.conn().await?;
    Ok(Json(users::create(&**conn, body).await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<User>> {
    let conn = state.conn().await?;
    Ok(Json(users::get(&**conn, id).await?))
}

/// Deletes the user; their orders survive with the user reference nulled.
async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Value>> {
    let conn = state.conn().await?;
    users::delete(&**conn, id).await?;
    Ok(Json(json!({ "message": "user deleted" })))
}
