use async_trait::async_trait;
use snafu::Snafu;

use super::BoxError;

/// What the population step is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateRequest {
    /// Physical index receiving the documents.
    pub index: String,
    /// Logical name the documents will be served under.
    pub alias: String,
    /// Whether the model mappings must be put on `index` first.
    pub mappings: bool,
    /// Database connection to read from instead of the default one.
    pub database: Option<String>,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Population Launch Error ({}): {}", details, source))]
    Launch { details: String, source: BoxError },
}

/// Fills an index from the backing data store.
#[async_trait]
pub trait Populator: Send + Sync {
    /// Returns the terminal status of the population, `0` meaning success.
    async fn populate(&self, request: &PopulateRequest) -> Result<i32, Error>;
}
