use elasticsearch::http::headers::HeaderMap;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::http::Method;
use elasticsearch::Elasticsearch;
use semver::{Version, VersionReq};
use serde_json::Value;
use tracing::info;

use crate::errors::{ElasticClientError, Result};
use crate::settings::ElasticsearchStorageConfig;
use crate::ElasticSearchClient;

impl ElasticSearchClient {
    /// Opens a connection to the node at `config.url`, and checks that its
    /// version satisfies `config.version_req`.
    pub async fn conn(config: ElasticsearchStorageConfig) -> Result<Self> {
        let version_req = VersionReq::parse(&config.version_req).map_err(|source| {
            ElasticClientError::InvalidVersionRequirement {
                req: config.version_req.clone(),
                source,
            }
        })?;

        let pool = SingleNodeConnectionPool::new(config.url.clone());
        let transport = TransportBuilder::new(pool)
            .timeout(config.timeout)
            .build()?;

        let response = transport
            .send::<String, String>(
                Method::Get,
                "/",
                HeaderMap::new(),
                None, /* query_string */
                None, /* body */
                Some(config.timeout),
            )
            .await?;

        if !response.status_code().is_success() {
            return Err(ElasticClientError::ElasticSearchHttpError {
                status: response.status_code().as_u16(),
                body: response.text().await?,
            });
        }

        // Response similar to:
        // { "name": "node", "version": { "number": "7.17.9", ... }, ... }
        let json = response.json::<Value>().await?;
        let version = version_number(&json)?;

        if !version_req.matches(&version) {
            return Err(ElasticClientError::UnsupportedElasticSearchVersion(
                version,
            ));
        }

        info!("connected to elasticsearch {} at {}", version, config.url);
        let client = Elasticsearch::new(transport);
        Ok(ElasticSearchClient { client, config })
    }
}

pub(crate) fn version_number(json: &Value) -> Result<Version> {
    let number = json
        .get("version")
        .ok_or(ElasticClientError::InvalidJson {
            msg: String::from("expected 'version'"),
            json: json.clone(),
        })?
        .get("number")
        .ok_or(ElasticClientError::InvalidJson {
            msg: String::from("expected 'version.number'"),
            json: json.clone(),
        })?
        .as_str()
        .ok_or(ElasticClientError::InvalidJson {
            msg: String::from("expected JSON string"),
            json: json.clone(),
        })?;

    Ok(Version::parse(number)?)
}
