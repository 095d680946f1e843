use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

/// Source of the creation body (settings, mappings) of each logical index.
pub trait IndexConfigSource: Send + Sync {
    fn index_config(&self, logical: &str) -> Option<Value>;
}

impl IndexConfigSource for BTreeMap<String, Value> {
    fn index_config(&self, logical: &str) -> Option<Value> {
        self.get(logical).cloned()
    }
}

impl IndexConfigSource for HashMap<String, Value> {
    fn index_config(&self, logical: &str) -> Option<Value> {
        self.get(logical).cloned()
    }
}
