//! Shared request state.

use std::sync::Arc;

use deadpool_postgres::{Object, Pool};
use platter::Error;

use crate::config::Config;

/// State shared by every handler: the connection pool and the static
/// configuration.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: Pool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Check a connection out of the pool for one logical operation.
    pub async fn conn(&self) -> Result<Object, Error> {
        self.pool.get().await.map_err(|e| Error::Pool(e.to_string()))
    }
}
