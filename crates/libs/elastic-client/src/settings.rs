use std::time::Duration;

use index_config::{deserialize_duration, serialize_duration, LayeredConfig};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ElasticsearchStorageConfig {
    pub url: Url,
    /// Timeout in milliseconds on client calls to Elasticsearch.
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub timeout: Duration,
    /// Constraint on the version of Elasticsearch.
    pub version_req: String,
    /// Number of shards copies that must be active before an index creation
    /// is acknowledged.
    pub wait_for_active_shards: u64,
}

impl LayeredConfig<'_> for ElasticsearchStorageConfig {
    const ENV_PREFIX: &'static str = "ELASTICSEARCH";

    fn file_sources() -> Vec<&'static str> {
        vec!["elasticsearch.toml"]
    }

    fn root_key() -> Option<&'static str> {
        Some("elasticsearch")
    }
}
