use async_trait::async_trait;
use serde_json::Value;

use index_recreate::ports::cluster::{AliasMap, ClusterAdmin, Error};

use crate::ElasticSearchClient;

#[async_trait]
impl ClusterAdmin for ElasticSearchClient {
    async fn index_exists(&self, name: &str) -> Result<bool, Error> {
        self.index_exists(name)
            .await
            .map_err(|err| Error::IndexExistence {
                index: name.to_string(),
                source: Box::new(err),
            })
    }

    async fn create_index(&self, name: &str, config: &Value) -> Result<(), Error> {
        self.create_index(name, config)
            .await
            .map_err(|err| Error::IndexCreation {
                index: name.to_string(),
                source: Box::new(err),
            })
    }

    async fn delete_indexes(&self, names: &[String]) -> Result<(), Error> {
        self.delete_indexes(names)
            .await
            .map_err(|err| Error::IndexDeletion {
                indexes: names.join(","),
                source: Box::new(err),
            })
    }

    async fn alias_map(&self) -> Result<AliasMap, Error> {
        self.alias_map()
            .await
            .map_err(|err| Error::AliasRetrieval {
                source: Box::new(err),
            })
    }

    async fn update_aliases(
        &self,
        alias: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<(), Error> {
        self.update_alias(alias, add, remove)
            .await
            .map_err(|err| Error::AliasUpdate {
                alias: alias.to_string(),
                source: Box::new(err),
            })
    }

    async fn refresh_indexes(&self, names: &[String]) -> Result<(), Error> {
        self.refresh_indexes(names)
            .await
            .map_err(|err| Error::IndexRefresh {
                indexes: names.join(","),
                source: Box::new(err),
            })
    }
}
