use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fragment kinds known to the host
///
/// The kind catalog itself (labels, schemas) lives with the host; the engine
/// only needs to know whether a kind name is recognized. An open catalog
/// accepts every kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindCatalog {
    #[serde(default)]
    kinds: BTreeSet<String>,
    #[serde(default)]
    closed: bool,
}

impl KindCatalog {
    /// Catalog that accepts every kind
    pub fn open() -> Self {
        Self::default()
    }

    /// Catalog restricted to the given kinds
    pub fn closed<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds
                .into_iter()
                .map(|kind| kind.into().to_ascii_lowercase())
                .collect(),
            closed: true,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn contains(&self, kind: &str) -> bool {
        !self.closed || self.kinds.contains(&kind.to_ascii_lowercase())
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }
}
