//! Tie menu items and orders to their restaurant.
//!
//! Ran before any production data existed, so the columns can be added
//! NOT NULL without a backfill.

use crate::Result;
use crate::migrate::MigrationContext;

pub async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        "ALTER TABLE menu_items
            ADD COLUMN restaurant_id UUID NOT NULL
            REFERENCES restaurants (id) ON DELETE CASCADE",
    )
    .await?;

    ctx.execute(
        "ALTER TABLE orders
            ADD COLUMN restaurant_id UUID NOT NULL
            REFERENCES restaurants (id) ON DELETE CASCADE",
    )
    .await?;

    ctx.execute("CREATE INDEX idx_menu_items_restaurant_id ON menu_items (restaurant_id)")
        .await?;
    ctx.execute("CREATE INDEX idx_orders_restaurant_id ON orders (restaurant_id)")
        .await?;

    Ok(())
}

inventory::submit! {
    crate::Migration {
        version: "2026_07_21_102341-add_restaurant_refs",
        name: "add_restaurant_refs",
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
