use gbn_markup::{NodeId, ParseError};
use thiserror::Error;

pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Markup error: {0}")]
    Parse(#[from] ParseError),

    #[error("Node {node} is not an element")]
    NotAnElement { node: NodeId },

    #[error("Invalid configuration payload: {0}")]
    Config(#[from] serde_json::Error),
}

impl ReconcileError {
    pub fn not_an_element(node: NodeId) -> Self {
        Self::NotAnElement { node }
    }
}
