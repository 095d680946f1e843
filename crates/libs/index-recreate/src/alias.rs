use tracing::debug;

use crate::ports::cluster::{AliasMap, ClusterAdmin, Error};

/// Finds which physical indexes a logical name currently points to.
pub struct AliasResolver<'a, C: ?Sized> {
    cluster: &'a C,
}

impl<'a, C> AliasResolver<'a, C>
where
    C: ClusterAdmin + ?Sized,
{
    pub fn new(cluster: &'a C) -> Self {
        AliasResolver { cluster }
    }

    /// Every physical index carrying `alias`, sorted by name. An empty result
    /// is not an error, a cluster without any alias is common.
    pub async fn find_indexes_by_alias(&self, alias: &str) -> Result<Vec<String>, Error> {
        let aliases = self.cluster.alias_map().await?;
        let indexes = indexes_with_alias(&aliases, alias);
        debug!("alias '{}' resolves to {:?}", alias, indexes);
        Ok(indexes)
    }
}

pub fn indexes_with_alias(aliases: &AliasMap, alias: &str) -> Vec<String> {
    aliases
        .iter()
        .filter(|(_, index_aliases)| index_aliases.contains(alias))
        .map(|(index, _)| index.clone())
        .collect()
}
