use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::ConfigError;

/// Reads every `<name>.json` file of `dir` as the creation body (settings,
/// mappings) of the index `<name>`.
///
/// A missing directory yields no definition: indexes without a definition
/// are created with the cluster defaults.
pub fn load_index_definitions(dir: &Path) -> Result<BTreeMap<String, Value>, ConfigError> {
    let mut definitions = BTreeMap::new();

    if !dir.is_dir() {
        info!("No index definitions directory at {}", dir.display());
        return Ok(definitions);
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| ConfigError::InvalidIndexName(path.clone()))?
            .to_string();

        let content = std::fs::read_to_string(&path)?;
        let definition = serde_json::from_str(&content).map_err(|source| {
            ConfigError::InvalidIndexDefinition {
                path: path.clone(),
                source,
            }
        })?;

        debug!("Loaded definition of index '{}' from {:?}", name, path);
        definitions.insert(name, definition);
    }

    Ok(definitions)
}
