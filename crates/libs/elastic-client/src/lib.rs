//! Elasticsearch implementation of the cluster administration used to
//! recreate aliased indexes.

use elasticsearch::Elasticsearch;

use crate::settings::ElasticsearchStorageConfig;

pub mod admin;
pub mod errors;
pub mod internal;
pub mod remote;
pub mod settings;

#[derive(Clone, Debug)]
pub struct ElasticSearchClient {
    /// Elasticsearch client
    pub client: Elasticsearch,
    /// Client configuration
    pub config: ElasticsearchStorageConfig,
}
