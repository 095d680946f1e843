use semver::Version;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElasticClientError>;

#[derive(Debug, Error)]
pub enum ElasticClientError {
    #[error("Elasticsearch error: {0}")]
    ElasticSearchError(#[from] elasticsearch::Error),

    #[error("Invalid json format: {msg} {json}")]
    InvalidJson { msg: String, json: Value },

    #[error("Failed to create elasticsearch index '{0}'")]
    IndexCreationFailed(String),

    #[error("Failed to delete elasticsearch indexes '{0}'")]
    IndexDeletionFailed(String),

    #[error("Failed to update elasticsearch alias '{0}'")]
    AliasUpdateFailed(String),

    /// Non success status, `body` holds the JSON document describing the
    /// failure as sent back by Elasticsearch.
    #[error("Elasticsearch exception: status {status}: {body}")]
    ElasticSearchHttpError { status: u16, body: String },

    #[error("No response from elastic search despite the lack of exception")]
    ElasticsearchFailureWithoutException,

    #[error("Invalid version requirement '{req}': {source}")]
    InvalidVersionRequirement { req: String, source: semver::Error },

    #[error("Elasticsearch version {0}, is not supported")]
    UnsupportedElasticSearchVersion(Version),

    #[error("Semver parse error: {0}")]
    SemVerError(#[from] semver::Error),

    #[error("Elasticsearch client builder error: {0}")]
    ElasticClientBuilderError(#[from] elasticsearch::http::transport::BuildError),
}
