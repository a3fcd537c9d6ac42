//! Sample data for local development.
//!
//! Wipes the existing rows, then loads two restaurants with menus, a few
//! users, and one confirmed order so every endpoint has something to show.

use platter::migrate::MigrationRunner;
use platter::model::OrderStatus;
use platter::store::catalog::{self, NewMenuItem, NewRestaurant};
use platter::store::orders;
use platter::store::users::{self, NewUser};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::Config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let mut client = crate::connect(&config.database_url).await?;

    MigrationRunner::new(&mut client).migrate().await?;

    println!("🌱 Seeding database...");
    println!();

    // Clear existing data (in reverse FK order to respect constraints)
    println!("🗑️  Clearing existing data...");
    client.execute("DELETE FROM order_items", &[]).await.ok();
    client.execute("DELETE FROM orders", &[]).await.ok();
    client.execute("DELETE FROM menu_items", &[]).await.ok();
    client.execute("DELETE FROM restaurants", &[]).await.ok();
    client.execute("DELETE FROM users", &[]).await.ok();
    println!();

    println!("🏠 Creating restaurants...");
    let pine = catalog::create_restaurant(
        &client,
        NewRestaurant {
            name: "Pine & Vine".into(),
            address: "114 W Main St".into(),
            city: "Carrboro".into(),
            state: "NC".into(),
            zip_code: "27510".into(),
            description: Some("Wood-fired pizza and natural wine".into()),
        },
    )
    .await?;
    let blue_door = catalog::create_restaurant(
        &client,
        NewRestaurant {
            name: "Blue Door Kitchen".into(),
            address: "9 Elm St".into(),
            city: "Durham".into(),
            state: "NC".into(),
            zip_code: "27701".into(),
            description: Some("Korean comfort food".into()),
        },
    )
    .await?;
    println!("  Pine & Vine");
    println!("  Blue Door Kitchen");
    println!();

    println!("🍕 Creating menu items...");
    let margherita = catalog::create_menu_item(
        &client,
        NewMenuItem {
            restaurant_id: pine.id,
            name: "Margherita".into(),
            description: Some("Tomato, mozzarella, basil".into()),
            price: dec!(12.50),
            image_url: None,
            category: "mains".into(),
            available: Some(true),
        },
    )
    .await?;
    let tiramisu = catalog::create_menu_item(
        &client,
        NewMenuItem {
            restaurant_id: pine.id,
            name: "Tiramisu".into(),
            description: None,
            price: dec!(6.50),
            image_url: None,
            category: "desserts".into(),
            available: Some(true),
        },
    )
    .await?;

    let dishes: [(&str, &str, Decimal, uuid::Uuid); 4] = [
        ("Diavola", "mains", dec!(14.00), pine.id),
        ("House red (glass)", "drinks", dec!(7.00), pine.id),
        ("Bibimbap", "mains", dec!(12.00), blue_door.id),
        ("Kimchi pancake", "starters", dec!(8.50), blue_door.id),
    ];
    for (name, category, price, restaurant_id) in &dishes {
        catalog::create_menu_item(
            &client,
            NewMenuItem {
                restaurant_id: *restaurant_id,
                name: (*name).into(),
                description: None,
                price: *price,
                image_url: None,
                category: (*category).into(),
                available: Some(true),
            },
        )
        .await?;
    }
    println!("  Created {} menu items", dishes.len() + 2);
    println!();

    println!("👥 Creating users...");
    let people = [
        ("Alice Chen", "alice@example.com"),
        ("Bob Martinez", "bob@example.com"),
        ("Grace Lee", "grace@example.com"),
    ];
    let mut created_users = Vec::new();
    for (name, email) in people {
        let user = users::create(
            &client,
            NewUser {
                name: name.into(),
                email: email.into(),
            },
        )
        .await?;
        println!("  {name} <{email}>");
        created_users.push(user);
    }
    println!();

    println!("🧾 Creating a sample order...");
    let order = orders::create(&client, pine.id, Some(created_users[0].id)).await?;
    orders::add_item(&mut client, order.id, margherita.id, 2).await?;
    orders::add_item(&mut client, order.id, tiramisu.id, 1).await?;
    orders::update_status(&client, order.id, Some(OrderStatus::Confirmed)).await?;
    let order_total = orders::total(&client, order.id).await?;
    println!("  Order {} confirmed, total ${order_total}", order.id);
    println!();

    println!(
        "🎉 Seeding complete: 2 restaurants, {} menu items, {} users, 1 order",
        dishes.len() + 2,
        people.len()
    );

    Ok(())
}
