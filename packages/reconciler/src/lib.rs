//! # gbn-reconciler
//!
//! Stable identities for builder fragments and the save-time reconcile pass.
//!
//! ```text
//! markup ──parse──▶ Document ──reconcile(config)──▶ Document ──serialize──▶ markup
//!                      │
//!                      └─ StructuralPath ──hash──▶ Identity (gbn-v3-…)
//! ```
//!
//! A fragment's identity is read from its identity attribute when present
//! and otherwise derived from its structural path and written back. Fragments
//! whose identity is missing from the configuration are removed together
//! with their subtrees; configured siblings are reordered by `order`.

pub mod config;
pub mod error;
pub mod identity;
pub mod path;
pub mod reconciler;

pub use config::{ConfigEntry, ConfigMap, DEFAULT_ORDER};
pub use error::{ReconcileError, ReconcileResult};
pub use identity::{rolling_hash, to_base36, Identity, IDENTITY_PREFIX};
pub use path::{compute_identity, structural_path, PathSegment, StructuralPath};
pub use reconciler::{
    reconcile_markup, reconcile_markup_with, FragmentInfo, ReconcileOutput, ReconcileReport,
    Reconciler,
};
