//! Restaurants as first-class records.

use crate::Result;
use crate::migrate::MigrationContext;

pub async fn migrate(ctx: &mut MigrationContext<'_>) -> Result<()> {
    ctx.execute(
        "CREATE TABLE restaurants (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            zip_code TEXT NOT NULL,
            description TEXT
        )",
    )
    .await?;

    Ok(())
}

inventory::submit! {
    crate::Migration {
        version: "2026_07_15_091803-create_restaurants",
        name: "create_restaurants",
        run: |ctx| Box::pin(migrate(ctx)),
    }
}
