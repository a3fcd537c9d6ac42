//! Schema migrations as Rust functions.
//!
//! Each migration lives in its own file under [`crate::migrations`] and
//! registers itself with [`inventory`]. The [`MigrationRunner`] applies
//! pending migrations in version order, each inside its own transaction,
//! and records applied versions in the `_platter_migrations` table.

use std::future::Future;
use std::pin::Pin;

use tokio_postgres::{Client, Transaction};

use crate::Result;

/// Type alias for migration functions.
pub type MigrationFn = for<'a> fn(
    &'a mut MigrationContext<'a>,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// A registered migration.
pub struct Migration {
    /// Version string, e.g. "2026_07_02_114512-initial_schema".
    /// Lexicographic order is application order.
    pub version: &'static str,
    /// Short human-readable name.
    pub name: &'static str,
    /// The migration function.
    pub run: MigrationFn,
}

/// Context passed to migration functions.
///
/// Wraps the transaction the migration runs in, so every statement of one
/// migration commits or rolls back together.
pub struct MigrationContext<'a> {
    tx: &'a Transaction<'a>,
}

impl<'a> MigrationContext<'a> {
    pub fn new(tx: &'a Transaction<'a>) -> Self {
        Self { tx }
    }

    /// Execute a SQL statement, returning the number of rows affected.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        Ok(self.tx.execute(sql, &[]).await?)
    }
}

/// Applies registered migrations to a database.
pub struct MigrationRunner<'a> {
    client: &'a mut Client,
}

/// One registered migration plus whether it has been applied.
pub struct MigrationStatus {
    pub version: &'static str,
    pub name: &'static str,
    pub applied: bool,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(client: &'a mut Client) -> Self {
        Self { client }
    }

    /// Ensure the tracking table exists.
    async fn init(&self) -> Result<()> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS _platter_migrations (
                    version TEXT PRIMARY KEY,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )",
                &[],
            )
            .await?;
        Ok(())
    }

    /// Versions already recorded in the tracking table.
    async fn applied(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query("SELECT version FROM _platter_migrations ORDER BY version", &[])
            .await?;
        rows.iter().map(|row| Ok(row.try_get(0)?)).collect()
    }

    /// Registered migrations not yet applied, in version order.
    fn pending(&self, applied: &[String]) -> Vec<&'static Migration> {
        let mut pending: Vec<&'static Migration> = inventory::iter::<Migration>()
            .filter(|m| !applied.iter().any(|v| v == m.version))
            .collect();
        pending.sort_by_key(|m| m.version);
        pending
    }

    /// Apply all pending migrations. Each runs in its own transaction and
    /// is recorded before the commit, so a failure leaves earlier
    /// migrations applied and the failing one fully rolled back.
    ///
    /// Returns the versions applied by this call.
    pub async fn migrate(&mut self) -> Result<Vec<&'static str>> {
        self.init().await?;
        let applied = self.applied().await?;
        let mut ran = Vec::new();
        for migration in self.pending(&applied) {
            let tx = self.client.transaction().await?;
            let mut ctx = MigrationContext::new(&tx);
            (migration.run)(&mut ctx).await?;
            tx.execute(
                "INSERT INTO _platter_migrations (version) VALUES ($1)",
                &[&migration.version],
            )
            .await?;
            tx.commit().await?;
            tracing::info!(version = migration.version, "applied migration");
            ran.push(migration.version);
        }
        Ok(ran)
    }

    /// Status of every registered migration, in version order.
    pub async fn status(&self) -> Result<Vec<MigrationStatus>> {
        self.init().await?;
        let applied = self.applied().await?;
        let mut registered: Vec<&'static Migration> = inventory::iter::<Migration>().collect();
        registered.sort_by_key(|m| m.version);
        Ok(registered
            .into_iter()
            .map(|m| MigrationStatus {
                version: m.version,
                name: m.name,
                applied: applied.iter().any(|v| v == m.version),
            })
            .collect())
    }
}
