//! Registered users.

use serde::Deserialize;
use tokio_postgres::GenericClient;
use uuid::Uuid;

use crate::model::User;
use crate::store::is_unique_violation;
use crate::{Error, Result};

/// Input for registering a user.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

pub async fn create(client: &impl GenericClient, input: NewUser) -> Result<User> {
    let id = Uuid::new_v4();
    let row = match client
        .query_one(
            "INSERT INTO users (id, name, email)
             VALUES ($1, $2, $3)
             RETURNING id, name, email, created_at",
            &[&id, &input.name, &input.email],
        )
        .await
    {
        Ok(row) => row,
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Validation(format!(
                "a user with email {} already exists",
                input.email
            )));
        }
        Err(e) => return Err(e.into()),
    };
    User::from_row(&row)
}

pub async fn get(client: &impl GenericClient, id: Uuid) -> Result<User> {
    let row = client
        .query_opt(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
            &[&id],
        )
        .await?
        .ok_or(Error::NotFound("user"))?;
    User::from_row(&row)
}

/// All users, oldest first.
pub async fn list(client: &impl GenericClient) -> Result<Vec<User>> {
    let rows = client
        .query(
            "SELECT id, name, email, created_at FROM users ORDER BY created_at, id",
            &[],
        )
        .await?;
    rows.iter().map(User::from_row).collect()
}

/// Remove a user. Their orders survive with `user_id` nulled out.
pub async fn delete(client: &impl GenericClient, id: Uuid) -> Result<()> {
    let deleted = client
        .execute("DELETE FROM users WHERE id = $1", &[&id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound("user"));
    }
    Ok(())
}
