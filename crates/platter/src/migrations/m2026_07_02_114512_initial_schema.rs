//! Initial schema: users, menu items, orders, order items.

use crate::Result;
use crate::migrate::MigrationContext;

pub async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        "CREATE TABLE users (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .await?;

    ctx.execute(
        "CREATE TABLE menu_items (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
            image_url TEXT,
            category TEXT NOT NULL,
            available BOOLEAN
        )",
    )
    .await?;

    ctx.execute(
        "CREATE TABLE orders (
            id UUID PRIMARY KEY,
            user_id UUID REFERENCES users (id) ON DELETE SET NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .await?;

    ctx.execute(
        "CREATE TABLE order_items (
            id UUID PRIMARY KEY,
            order_id UUID NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
            menu_item_id UUID NOT NULL REFERENCES menu_items (id) ON DELETE CASCADE,
            quantity INTEGER NOT NULL CHECK (quantity >= 1),
            price NUMERIC(10, 2) NOT NULL CHECK (price >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .await?;

    ctx.execute("CREATE INDEX idx_orders_user_id ON orders (user_id)")
        .await?;
    ctx.execute("CREATE INDEX idx_order_items_order_id ON order_items (order_id)")
        .await?;
    ctx.execute("CREATE INDEX idx_order_items_menu_item_id ON order_items (menu_item_id)")
        .await?;

    Ok(())
}

inventory::submit! {
    crate::Migration {
        version: "2026_07_02_114512-initial_schema",
        name: "initial_schema",
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
