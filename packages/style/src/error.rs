use gbn_markup::NodeId;
use thiserror::Error;

pub type CascadeResult<T> = Result<T, CascadeError>;

#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Document has no element that can act as cascade scope root")]
    NoScopeRoot,

    #[error("Node {node} is not an element")]
    NotAnElement { node: NodeId },

    #[error("Invalid cascade settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl CascadeError {
    pub fn not_an_element(node: NodeId) -> Self {
        Self::NotAnElement { node }
    }
}
