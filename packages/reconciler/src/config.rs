use crate::error::ReconcileResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Sort key used for configured fragments that carry no `order`
pub const DEFAULT_ORDER: i64 = 9999;

/// Persisted configuration of one fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ConfigEntry {
    pub fn with_order(order: i64) -> Self {
        Self {
            order: Some(order),
            properties: Map::new(),
        }
    }

    pub fn sort_key(&self) -> i64 {
        self.order.unwrap_or(DEFAULT_ORDER)
    }
}

/// Configuration keyed by identity; the ground truth for a reconcile pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: HashMap<String, ConfigEntry>,
}

impl ConfigMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a configuration payload
    pub fn from_json(json: &str) -> ReconcileResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, identity: impl Into<String>, entry: ConfigEntry) {
        self.entries.insert(identity.into(), entry);
    }

    pub fn get(&self, identity: &str) -> Option<&ConfigEntry> {
        self.entries.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigEntry)> for ConfigMap {
    fn from_iter<I: IntoIterator<Item = (K, ConfigEntry)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(identity, entry)| (identity.into(), entry))
                .collect(),
        }
    }
}
