use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use serde_json::Value;
use snafu::Snafu;

use super::BoxError;

/// Physical index name to the set of aliases pointing at it.
pub type AliasMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Index Existence Error on '{}': {}", index, source))]
    IndexExistence { index: String, source: BoxError },

    #[snafu(display("Index Creation Error on '{}': {}", index, source))]
    IndexCreation { index: String, source: BoxError },

    #[snafu(display("Index Deletion Error on '{}': {}", indexes, source))]
    IndexDeletion { indexes: String, source: BoxError },

    #[snafu(display("Alias Retrieval Error: {}", source))]
    AliasRetrieval { source: BoxError },

    #[snafu(display("Alias Update Error on '{}': {}", alias, source))]
    AliasUpdate { alias: String, source: BoxError },

    #[snafu(display("Index Refresh Error on '{}': {}", indexes, source))]
    IndexRefresh { indexes: String, source: BoxError },
}

/// Administrative operations issued against the search cluster.
#[async_trait]
pub trait ClusterAdmin: Send + Sync {
    /// True when an index or an alias called `name` exists.
    async fn index_exists(&self, name: &str) -> Result<bool, Error>;

    /// Creates `name`, `config` being sent verbatim as the creation body.
    async fn create_index(&self, name: &str, config: &Value) -> Result<(), Error>;

    async fn delete_indexes(&self, names: &[String]) -> Result<(), Error>;

    async fn alias_map(&self) -> Result<AliasMap, Error>;

    /// Adds `alias` to `add` and removes it from `remove` in a single atomic
    /// request. Does nothing when both are empty.
    async fn update_aliases(&self, alias: &str, add: &[String], remove: &[String])
        -> Result<(), Error>;

    async fn refresh_indexes(&self, names: &[String]) -> Result<(), Error>;
}
