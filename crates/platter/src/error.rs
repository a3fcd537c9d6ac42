use thiserror::Error;

/// Errors produced by the store and migration layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Postgres error
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// Connection pool error
    #[error("pool error: {0}")]
    Pool(String),

    /// A referenced entity does not exist. The payload names it, e.g.
    /// `NotFound("order")` displays as "order not found".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Input rejected before touching storage.
    #[error("{0}")]
    Validation(String),
}
