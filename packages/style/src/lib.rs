//! # gbn-style
//!
//! Two halves of fragment styling:
//!
//! - [`CascadeResolver`] publishes theme, page and per-kind defaults as
//!   custom properties on the cascade scope root.
//! - [`InlineStyleReconciler`] merges a fragment's configured styles into
//!   its inline `style`, retracting only the properties it controls.

pub mod applicator;
pub mod cascade;
pub mod declaration;
pub mod error;
pub mod inline;
pub mod settings;
pub mod units;

pub use applicator::{
    acquire, Acquisition, ApplicatorSource, RetryPolicy, Scheduler, StyleApplicator,
    ThreadScheduler,
};
pub use cascade::{CascadeOutcome, CascadeResolver, Delivery};
pub use declaration::StyleDeclaration;
pub use error::{CascadeError, CascadeResult};
pub use inline::{is_controlled, InlineStyleReconciler, CONTROLLED_PROPERTIES};
pub use settings::{CascadeSettings, ColorPalette, CustomColor, PageDefaults, TextDefaults};
pub use units::{is_length_property, normalize_length, normalize_value, DEFAULT_UNIT};
