//! The catalog: restaurants and their menu items.

use rust_decimal::Decimal;
use serde::Deserialize;
use tokio_postgres::GenericClient;
use uuid::Uuid;

use crate::model::{MenuItem, Restaurant};
use crate::store::missing_referent;
use crate::{Error, Result};

/// Input for creating a restaurant.
#[derive(Debug, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial restaurant update; omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub description: Option<String>,
}

/// Input for creating a menu item.
#[derive(Debug, Deserialize)]
pub struct NewMenuItem {
    pub restaurant_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub available: Option<bool>,
}

/// Partial menu item update; omitted fields keep their stored values.
/// The restaurant reference is fixed at creation and cannot be moved.
#[derive(Debug, Default, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub available: Option<bool>,
}

pub async fn create_restaurant(
    client: &impl GenericClient,
    input: NewRestaurant,
) -> Result<Restaurant> {
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            "INSERT INTO restaurants (id, name, address, city, state, zip_code, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, address, city, state, zip_code, description",
            &[
                &id,
                &input.name,
                &input.address,
                &input.city,
                &input.state,
                &input.zip_code,
                &input.description,
            ],
        )
        .await?;
    Restaurant::from_row(&row)
}

pub async fn get_restaurant(client: &impl GenericClient, id: Uuid) -> Result<Restaurant> {
    let row = client
        .query_opt(
            "SELECT id, name, address, city, state, zip_code, description
             FROM restaurants WHERE id = $1",
            &[&id],
        )
        .await?
        .ok_or(Error::NotFound("restaurant"))?;
    Restaurant::from_row(&row)
}

/// All restaurants, by name.
pub async fn list_restaurants(client: &impl GenericClient) -> Result<Vec<Restaurant>> {
    let rows = client
        .query(
            "SELECT id, name, address, city, state, zip_code, description
             FROM restaurants ORDER BY name, id",
            &[],
        )
        .await?;
    rows.iter().map(Restaurant::from_row).collect()
}

pub async fn update_restaurant(
    client: &impl GenericClient,
    id: Uuid,
    patch: RestaurantPatch,
) -> Result<Restaurant> {
    let row = client
        .query_opt(
            "UPDATE restaurants SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                state = COALESCE($5, state),
                zip_code = COALESCE($6, zip_code),
                description = COALESCE($7, description)
             WHERE id = $1
             RETURNING id, name, address, city, state, zip_code, description",
            &[
                &id,
                &patch.name,
                &patch.address,
                &patch.city,
                &patch.state,
                &patch.zip_code,
                &patch.description,
            ],
        )
        .await?
        .ok_or(Error::NotFound("restaurant"))?;
    Restaurant::from_row(&row)
}

/// Remove a restaurant. Cascades take its menu items and orders with it.
pub async fn delete_restaurant(client: &impl GenericClient, id: Uuid) -> Result<()> {
    let deleted = client
        .execute("DELETE FROM restaurants WHERE id = $1", &[&id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound("restaurant"));
    }
    Ok(())
}

pub async fn create_menu_item(
    client: &impl GenericClient,
    input: NewMenuItem,
) -> Result<MenuItem> {
    validate_price(input.price)?;
    let id = Uuid::new_v4();
    let row = match client
        .query_one(
            "INSERT INTO menu_items
                (id, restaurant_id, name, description, price, image_url, category, available)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, restaurant_id, name, description, price, image_url, category, available",
            &[
                &id,
                &input.restaurant_id,
                &input.name,
                &input.description,
                &input.price,
                &input.image_url,
                &input.category,
                &input.available,
            ],
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
    MenuItem::from_row(&row)
}

pub async fn get_menu_item(client: &impl GenericClient, id: Uuid) -> Result<MenuItem> {
    let row = client
        .query_opt(
            "SELECT id, restaurant_id, name, description, price, image_url, category, available
             FROM menu_items WHERE id = $1",
            &[&id],
        )
        .await?
        .ok_or(Error::NotFound("menu item"))?;
    MenuItem::from_row(&row)
}

/// Menu items by name, optionally narrowed to one restaurant.
pub async fn list_menu_items(
    client: &impl GenericClient,
    restaurant_id: Option<Uuid>,
) -> Result<Vec<MenuItem>> {
    let rows = match restaurant_id {
        Some(restaurant_id) => {
            client
                .query(
                    "SELECT id, restaurant_id, name, description, price, image_url, category, available
                     FROM menu_items WHERE restaurant_id = $1 ORDER BY name, id",
                    &[&restaurant_id],
                )
                .await?
        }
        None => {
            client
                .query(
                    "SELECT id, restaurant_id, name, description, price, image_url, category, available
                     FROM menu_items ORDER BY name, id",
                    &[],
                )
                .await?
        }
    };
    rows.iter().map(MenuItem::from_row).collect()
}

/// Apply a partial update. Changing `price` here never touches existing
/// order items; their snapshots stand.
pub async fn update_menu_item(
    client: &impl GenericClient,
    id: Uuid,
    patch: MenuItemPatch,
) -> Result<MenuItem> {
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    let row = client
        .query_opt(
            "UPDATE menu_items SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image_url = COALESCE($5, image_url),
                category = COALESCE($6, category),
                available = COALESCE($7, available)
             WHERE id = $1
             RETURNING id, restaurant_id, name, description, price, image_url, category, available",
            &[
                &id,
                &patch.name,
                &patch.description,
                &patch.price,
                &patch.image_url,
                &patch.category,
                &patch.available,
            ],
        )
        .await?
        .ok_or(Error::NotFound("menu item"))?;
    MenuItem::from_row(&row)
}

/// Remove a menu item. Order items referencing it are deleted by the
/// cascade rule; other items on those orders stay.
pub async fn delete_menu_item(client: &impl GenericClient, id: Uuid) -> Result<()> {
    let deleted = client
        .execute("DELETE FROM menu_items WHERE id = $1", &[&id])
        .await?;
    if deleted == 0 {
        return Err(Error::NotFound("menu item"));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    Ok(())
}
