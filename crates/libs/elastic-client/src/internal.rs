use elasticsearch::http::response::Response;
use elasticsearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetAliasParts,
    IndicesRefreshParts,
};
use serde_json::{json, Value};
use tracing::debug;

use index_recreate::ports::cluster::AliasMap;

use crate::errors::{ElasticClientError, Result};

use super::ElasticSearchClient;

impl ElasticSearchClient {
    /// Also true when `name` is an alias.
    pub(crate) async fn index_exists(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(http_error(response).await),
        }
    }

    pub(crate) async fn create_index(&self, index_name: &str, config: &Value) -> Result<()> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index_name))
            .body(config)
            .request_timeout(self.config.timeout)
            .wait_for_active_shards(&self.config.wait_for_active_shards.to_string())
            .send()
            .await?;

        if response.status_code().is_success() {
            // Response similar to:
            // Object({"acknowledged": Bool(true), "index": String("name"), "shards_acknowledged": Bool(true)})
            let json = response.json::<Value>().await?;

            if acknowledged(&json)? {
                Ok(())
            } else {
                Err(ElasticClientError::IndexCreationFailed(
                    index_name.to_string(),
                ))
            }
        } else {
            Err(http_error(response).await)
        }
    }

    pub(crate) async fn delete_indexes(&self, names: &[String]) -> Result<()> {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&names))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        if response.status_code().is_success() {
            let json = response.json::<Value>().await?;

            if acknowledged(&json)? {
                Ok(())
            } else {
                Err(ElasticClientError::IndexDeletionFailed(names.join(",")))
            }
        } else {
            Err(http_error(response).await)
        }
    }

    pub(crate) async fn alias_map(&self) -> Result<AliasMap> {
        let response = self
            .client
            .indices()
            .get_alias(IndicesGetAliasParts::None)
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        if response.status_code().is_success() {
            let json = response.json::<Value>().await?;
            parse_alias_map(json)
        } else {
            Err(http_error(response).await)
        }
    }

    pub(crate) async fn update_alias(
        &self,
        alias: &str,
        indices_to_add: &[String],
        indices_to_remove: &[String],
    ) -> Result<()> {
        let actions = alias_actions(alias, indices_to_add, indices_to_remove);

        if actions.is_empty() {
            return Ok(());
        }

        debug!("updating alias {}: {:?}", alias, actions);
        let response = self
            .client
            .indices()
            .update_aliases()
            .request_timeout(self.config.timeout)
            .body(json!({ "actions": actions }))
            .send()
            .await?;

        if !response.status_code().is_success() {
            return Err(http_error(response).await);
        }

        let json = response.json::<Value>().await?;

        if json["acknowledged"] == true {
            Ok(())
        } else {
            Err(ElasticClientError::AliasUpdateFailed(alias.to_string()))
        }
    }

    pub(crate) async fn refresh_indexes(&self, names: &[String]) -> Result<()> {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&names))
            .request_timeout(self.config.timeout)
            .send()
            .await?;

        // Note We won't analyze the msg of the response.
        if response.status_code().is_success() {
            Ok(())
        } else {
            Err(http_error(response).await)
        }
    }
}

/// Turns a non success response into an error carrying its body.
async fn http_error(response: Response) -> ElasticClientError {
    let status = response.status_code().as_u16();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => {
            ElasticClientError::ElasticSearchHttpError { status, body }
        }
        Ok(_) => ElasticClientError::ElasticsearchFailureWithoutException,
        Err(err) => ElasticClientError::from(err),
    }
}

fn acknowledged(json: &Value) -> Result<bool> {
    json.as_object()
        .ok_or(ElasticClientError::InvalidJson {
            msg: String::from("expected JSON object"),
            json: json.clone(),
        })?
        .get("acknowledged")
        .ok_or(ElasticClientError::InvalidJson {
            msg: String::from("expected 'acknowledged'"),
            json: json.clone(),
        })?
        .as_bool()
        .ok_or(ElasticClientError::InvalidJson {
            msg: String::from("expected JSON bool"),
            json: json.clone(),
        })
}

/// Reads the answer of `GET _alias`.
pub(crate) fn parse_alias_map(json: Value) -> Result<AliasMap> {
    // Response similar to:
    // {
    //   "index1": {
    //      "aliases": {
    //         "alias1": {},
    //         "alias2": {}
    //      }
    //   },
    //   "index2": {
    //      "aliases": {}
    //   }
    // }
    let indices = json.as_object().ok_or(ElasticClientError::InvalidJson {
        msg: String::from("expected JSON object"),
        json: json.clone(),
    })?;

    Ok(indices
        .iter()
        .map(|(index, value)| {
            let aliases = value["aliases"]
                .as_object()
                .map(|aliases| aliases.keys().cloned().collect())
                .unwrap_or_default();
            (index.clone(), aliases)
        })
        .collect())
}

/// Actions of a single `_aliases` request: the add comes first.
pub(crate) fn alias_actions(alias: &str, add: &[String], remove: &[String]) -> Vec<Value> {
    let mut actions = vec![];

    if !add.is_empty() {
        actions.push(json!({
            "add": {
                "alias": alias,
                "indices": add,
            }
        }));
    };

    if !remove.is_empty() {
        actions.push(json!({
            "remove": {
                "alias": alias,
                "indices": remove,
            }
        }));
    };

    actions
}
