//! Integration tests against a real Postgres.
//!
//! Two modes:
//! - CI mode: uses a service container (set POSTGRES_HOST and POSTGRES_PORT env vars)
//! - Local mode: uses testcontainers to spin up a postgres container (requires docker)
//!
//! Every test gets its own freshly migrated database, so tests can run in
//! parallel against a shared server.

use platter::Error;
use platter::migrate::MigrationRunner;
use platter::model::{MenuItem, OrderStatus, Restaurant};
use platter::store::catalog::{self, MenuItemPatch, NewMenuItem, NewRestaurant, RestaurantPatch};
use platter::store::orders;
use platter::store::users::{self, NewUser};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use testcontainers::{ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::NoTls;
use uuid::Uuid;

/// Holds the migrated per-test database connection and, in local mode, the
/// container keeping it alive.
struct PostgresHandle {
    client: tokio_postgres::Client,
    _container: Option<testcontainers::ContainerAsync<Postgres>>,
}

async fn connect(conn_string: &str) -> tokio_postgres::Client {
    let (client, connection) = tokio_postgres::connect(conn_string, NoTls)
        .await
        .expect("Failed to connect to Postgres");

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });

    client
}

/// Connect to the admin database, carve out a fresh database for this
/// test, and run all migrations in it.
async fn setup() -> PostgresHandle {
    let (base, _container) = if let (Ok(host), Ok(port)) = (
        std::env::var("POSTGRES_HOST"),
        std::env::var("POSTGRES_PORT"),
    ) {
        let base = format!("host={host} port={port} user=postgres password=postgres");
        (base, None)
    } else {
        let container = Postgres::default()
            .with_tag("18")
            .start()
            .await
            .expect("Failed to start Postgres container");
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(5432).await.unwrap();
        let base = format!("host={host} port={port} user=postgres password=postgres");
        (base, Some(container))
    };

    let admin = connect(&format!("{base} dbname=postgres")).await;
    let db_name = format!("platter_test_{}", Uuid::new_v4().simple());
    admin
        .execute(&format!("CREATE DATABASE {db_name}"), &[])
        .await
        .expect("Failed to create test database");

    let mut client = connect(&format!("{base} dbname={db_name}")).await;
    MigrationRunner::new(&mut client)
        .migrate()
        .await
        .expect("Failed to run migrations");

    PostgresHandle { client, _container }
}

async fn sample_restaurant(client: &tokio_postgres::Client) -> Restaurant {
    catalog::create_restaurant(
        client,
        NewRestaurant {
            name: "Pine & Vine".into(),
            address: "114 W Main St".into(),
            city: "Carrboro".into(),
            state: "NC".into(),
            zip_code: "27510".into(),
            description: None,
        },
    )
    .await
    .unwrap()
}

async fn sample_menu_item(
    client: &tokio_postgres::Client,
    restaurant_id: Uuid,
    name: &str,
    price: Decimal,
) -> MenuItem {
    catalog::create_menu_item(
        client,
        NewMenuItem {
            restaurant_id,
            name: name.into(),
            description: None,
            price,
            image_url: None,
            category: "mains".into(),
            available: Some(true),
        },
    )
    .await
    .unwrap()
}

async fn order_item_count(client: &tokio_postgres::Client, order_id: Uuid) -> i64 {
    let row = client
        .query_one(
            "SELECT COUNT(*) FROM order_items WHERE order_id = $1",
            &[&order_id],
        )
        .await
        .unwrap();
    row.get(0)
}

#[tokio::test]
async fn test_migrations_apply_once() {
    let mut handle = setup().await;

    // setup() already migrated; a second run finds nothing to do.
    let ran = MigrationRunner::new(&mut handle.client)
        .migrate()
        .await
        .unwrap();
    assert!(ran.is_empty());

    let statuses = MigrationRunner::new(&mut handle.client)
        .status()
        .await
        .unwrap();
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().all(|s| s.applied));
    // Version order is application order.
    assert!(statuses.windows(2).all(|w| w[0].version < w[1].version));
}

#[tokio::test]
async fn test_new_order_is_pending_and_empty() {
    let handle = setup().await;
    let client = &handle.client;
    let restaurant = sample_restaurant(client).await;

    let order = orders::create(client, restaurant.id, None).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.user_id, None);
    assert_eq!(order.restaurant_id, restaurant.id);

    // Zero items reads as not-found, for both the item list and the total.
    assert!(matches!(
        orders::items(client, order.id).await.unwrap_err(),
        Error::NotFound("order items")
    ));
    assert!(matches!(
        orders::total(client, order.id).await.unwrap_err(),
        Error::NotFound("order items")
    ));
}

#[tokio::test]
async fn test_order_lifecycle() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Margherita", dec!(9.99)).await;

    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();

    let item = orders::add_item(&mut handle.client, order.id, dish.id, 3)
        .await
        .unwrap();
    assert_eq!(item.order_id, order.id);
    assert_eq!(item.quantity, 3);
    assert_eq!(item.price, dec!(9.99));

    let total = orders::total(&handle.client, order.id).await.unwrap();
    assert_eq!(total, dec!(29.97));

    let updated = orders::update_status(&handle.client, order.id, Some(OrderStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Confirmed);

    orders::delete(&handle.client, order.id).await.unwrap();
    assert!(matches!(
        orders::get(&handle.client, order.id).await.unwrap_err(),
        Error::NotFound("order")
    ));
}

#[tokio::test]
async fn test_item_price_survives_menu_price_change() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Ramen", dec!(11.00)).await;

    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, dish.id, 1)
        .await
        .unwrap();

    catalog::update_menu_item(
        &handle.client,
        dish.id,
        MenuItemPatch {
            price: Some(dec!(14.50)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let items = orders::items(&handle.client, order.id).await.unwrap();
    assert_eq!(items[0].price, dec!(11.00));
    assert_eq!(
        catalog::get_menu_item(&handle.client, dish.id)
            .await
            .unwrap()
            .price,
        dec!(14.50)
    );
    // The total uses the snapshot too.
    assert_eq!(
        orders::total(&handle.client, order.id).await.unwrap(),
        dec!(11.00)
    );
}

#[tokio::test]
async fn test_total_sums_exactly() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let soup = sample_menu_item(&handle.client, restaurant.id, "Soup", dec!(3.50)).await;
    let roll = sample_menu_item(&handle.client, restaurant.id, "Roll", dec!(1.25)).await;

    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, soup.id, 2)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, roll.id, 1)
        .await
        .unwrap();

    assert_eq!(
        orders::total(&handle.client, order.id).await.unwrap(),
        dec!(8.25)
    );
}

#[tokio::test]
async fn test_deleting_order_removes_its_items() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Tacos", dec!(8.00)).await;

    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, dish.id, 2)
        .await
        .unwrap();
    assert_eq!(order_item_count(&handle.client, order.id).await, 1);

    orders::delete(&handle.client, order.id).await.unwrap();
    assert_eq!(order_item_count(&handle.client, order.id).await, 0);
}

#[tokio::test]
async fn test_deleting_menu_item_removes_only_its_order_items() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let kept = sample_menu_item(&handle.client, restaurant.id, "Kept", dec!(5.00)).await;
    let doomed = sample_menu_item(&handle.client, restaurant.id, "Doomed", dec!(6.00)).await;

    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, kept.id, 1)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, doomed.id, 1)
        .await
        .unwrap();

    catalog::delete_menu_item(&handle.client, doomed.id)
        .await
        .unwrap();

    let items = orders::items(&handle.client, order.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].menu_item_id, kept.id);
}

#[tokio::test]
async fn test_delete_item_requires_matching_order() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Pie", dec!(4.00)).await;

    let first = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    let second = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    let item = orders::add_item(&mut handle.client, second.id, dish.id, 1)
        .await
        .unwrap();

    // Right item id, wrong order id: nothing is deleted.
    let err = orders::delete_item(&handle.client, first.id, item.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("order item")));
    assert_eq!(order_item_count(&handle.client, second.id).await, 1);

    orders::delete_item(&handle.client, second.id, item.id)
        .await
        .unwrap();
    assert_eq!(order_item_count(&handle.client, second.id).await, 0);
}

#[tokio::test]
async fn test_add_item_rejects_non_positive_quantity() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Stew", dec!(7.00)).await;
    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();

    for quantity in [0, -3] {
        let err = orders::add_item(&mut handle.client, order.id, dish.id, quantity)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "quantity {quantity}");
    }
    assert_eq!(order_item_count(&handle.client, order.id).await, 0);
}

#[tokio::test]
async fn test_add_item_checks_order_and_menu_item() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Salad", dec!(6.50)).await;
    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();

    let err = orders::add_item(&mut handle.client, Uuid::new_v4(), dish.id, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("order")));

    let err = orders::add_item(&mut handle.client, order.id, Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("menu item")));
}

#[tokio::test]
async fn test_create_order_checks_references() {
    let handle = setup().await;
    let client = &handle.client;
    let restaurant = sample_restaurant(client).await;

    let err = orders::create(client, Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("restaurant")));

    let err = orders::create(client, restaurant.id, Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("user")));
}

#[tokio::test]
async fn test_status_update_without_value_is_a_noop() {
    let handle = setup().await;
    let client = &handle.client;
    let restaurant = sample_restaurant(client).await;
    let order = orders::create(client, restaurant.id, None).await.unwrap();

    let untouched = orders::update_status(client, order.id, None).await.unwrap();
    assert_eq!(untouched.status, OrderStatus::Pending);

    orders::update_status(client, order.id, Some(OrderStatus::Ready))
        .await
        .unwrap();
    let fetched = orders::get(client, order.id).await.unwrap();
    assert_eq!(fetched.status, OrderStatus::Ready);

    let err = orders::update_status(client, Uuid::new_v4(), Some(OrderStatus::Ready))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound("order")));
}

#[tokio::test]
async fn test_orders_list_in_creation_order() {
    let handle = setup().await;
    let client = &handle.client;
    let restaurant = sample_restaurant(client).await;

    let mut created = Vec::new();
    for _ in 0..3 {
        created.push(orders::create(client, restaurant.id, None).await.unwrap().id);
    }

    let listed: Vec<Uuid> = orders::list(client).await.unwrap().iter().map(|o| o.id).collect();
    assert_eq!(listed, created);
}

#[tokio::test]
async fn test_deleting_user_keeps_their_orders() {
    let handle = setup().await;
    let client = &handle.client;
    let restaurant = sample_restaurant(client).await;
    let user = users::create(
        client,
        NewUser {
            name: "Sam Vo".into(),
            email: "sam@example.com".into(),
        },
    )
    .await
    .unwrap();

    let order = orders::create(client, restaurant.id, Some(user.id))
        .await
        .unwrap();
    assert_eq!(order.user_id, Some(user.id));

    users::delete(client, user.id).await.unwrap();

    let fetched = orders::get(client, order.id).await.unwrap();
    assert_eq!(fetched.user_id, None);
    assert_eq!(fetched.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_deleting_restaurant_cascades() {
    let mut handle = setup().await;
    let restaurant = sample_restaurant(&handle.client).await;
    let dish = sample_menu_item(&handle.client, restaurant.id, "Curry", dec!(10.00)).await;
    let order = orders::create(&handle.client, restaurant.id, None)
        .await
        .unwrap();
    orders::add_item(&mut handle.client, order.id, dish.id, 1)
        .await
        .unwrap();

    catalog::delete_restaurant(&handle.client, restaurant.id)
        .await
        .unwrap();

    assert!(matches!(
        catalog::get_menu_item(&handle.client, dish.id).await.unwrap_err(),
        Error::NotFound("menu item")
    ));
    assert!(matches!(
        orders::get(&handle.client, order.id).await.unwrap_err(),
        Error::NotFound("order")
    ));
    assert_eq!(order_item_count(&handle.client, order.id).await, 0);
}

#[tokio::test]
async fn test_restaurant_crud() {
    let handle = setup().await;
    let client = &handle.client;

    let restaurant = sample_restaurant(client).await;
    assert_eq!(catalog::list_restaurants(client).await.unwrap().len(), 1);

    let updated = catalog::update_restaurant(
        client,
        restaurant.id,
        RestaurantPatch {
            city: Some("Durham".into()),
            description: Some("Wood-fired pizza".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    // Patched fields change, the rest stay put.
    assert_eq!(updated.city, "Durham");
    assert_eq!(updated.description.as_deref(), Some("Wood-fired pizza"));
    assert_eq!(updated.name, restaurant.name);
    assert_eq!(updated.zip_code, restaurant.zip_code);

    catalog::delete_restaurant(client, restaurant.id)
        .await
        .unwrap();
    assert!(matches!(
        catalog::get_restaurant(client, restaurant.id).await.unwrap_err(),
        Error::NotFound("restaurant")
    ));
}

#[tokio::test]
async fn test_menu_item_crud_and_filtering() {
    let handle = setup().await;
    let client = &handle.client;
    let first = sample_restaurant(client).await;
    let second = catalog::create_restaurant(
        client,
        NewRestaurant {
            name: "Blue Door".into(),
            address: "9 Elm St".into(),
            city: "Durham".into(),
            state: "NC".into(),
            zip_code: "27701".into(),
            description: None,
        },
    )
    .await
    .unwrap();

    let dish = sample_menu_item(client, first.id, "Gnocchi", dec!(13.00)).await;
    sample_menu_item(client, second.id, "Bibimbap", dec!(12.00)).await;

    assert_eq!(catalog::list_menu_items(client, None).await.unwrap().len(), 2);
    let filtered = catalog::list_menu_items(client, Some(first.id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, dish.id);

    let updated = catalog::update_menu_item(
        client,
        dish.id,
        MenuItemPatch {
            name: Some("Gnocchi al pesto".into()),
            available: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.name, "Gnocchi al pesto");
    assert_eq!(updated.available, Some(false));
    assert_eq!(updated.price, dec!(13.00));

    catalog::delete_menu_item(client, dish.id).await.unwrap();
    assert!(matches!(
        catalog::get_menu_item(client, dish.id).await.unwrap_err(),
        Error::NotFound("menu item")
    ));
}

#[tokio::test]
async fn test_menu_item_rejects_negative_price() {
    let handle = setup().await;
    let client = &handle.client;
    let restaurant = sample_restaurant(client).await;

    let err = catalog::create_menu_item(
        client,
        NewMenuItem {
            restaurant_id: restaurant.id,
            name: "Free lunch".into(),
            description: None,
            price: dec!(-1.00),
            image_url: None,
            category: "mains".into(),
            available: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Zero is allowed.
    let freebie = sample_menu_item(client, restaurant.id, "Tap water", dec!(0.00)).await;
    assert_eq!(freebie.price, Decimal::ZERO);

    let err = catalog::update_menu_item(
        client,
        freebie.id,
        MenuItemPatch {
            price: Some(dec!(-0.01)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_menu_item_requires_restaurant() {
    let handle = setup().await;
    let client = &handle.client;

    let err = catalog::create_menu_item(
        client,
        NewMenuItem {
            restaurant_id: Uuid::new_v4(),
            name: "Orphan".into(),
            description: None,
            price: dec!(1.00),
            image_url: None,
            category: "mains".into(),
            available: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::NotFound("restaurant")));
}

#[tokio::test]
async fn test_users_crud_and_unique_email() {
    let handle = setup().await;
    let client = &handle.client;

    let user = users::create(
        client,
        NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        },
    )
    .await
    .unwrap();

    let err = users::create(
        client,
        NewUser {
            name: "Other Ada".into(),
            email: "ada@example.com".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("ada@example.com"));

    assert_eq!(users::list(client).await.unwrap().len(), 1);
    assert_eq!(users::get(client, user.id).await.unwrap().email, "ada@example.com");

    users::delete(client, user.id).await.unwrap();
    assert!(matches!(
        users::get(client, user.id).await.unwrap_err(),
        Error::NotFound("user")
    ));
}
