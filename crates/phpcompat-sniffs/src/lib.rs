//! phpcompat-sniffs: Version classification and compatibility sniffs
//!
//! This crate provides:
//! - `FeatureLifecycle`: per-feature version data parsed from YAML tables
//! - Classifiers deciding whether a feature is deprecated, removed or not
//!   yet available for a tested version range, and the matching messages
//! - `NumericEvaluator`: constant folding of signed literals and simple
//!   arithmetic in a token run
//! - `Sniff` / `SniffRegistry`: the built-in checks

pub mod calculation;
pub mod classifier;
pub mod lifecycle;
pub mod numeric;
pub mod patterns;
pub mod registry;
pub mod tables;

// Sniffs
pub mod constant_scalar_expressions;
pub mod forbidden_negative_bitshift;
pub mod new_classes;
pub mod new_functions;
pub mod removed_extensions;
pub mod removed_functions;

pub use classifier::{
    build_deprecated_removed_message, build_new_feature_message, classify_deprecated_removed,
    classify_new_feature, deprecated_removed_within, not_in_version_within,
    DeprecatedRemovedInfo, FeatureMessage, NewFeatureInfo,
};
pub use lifecycle::{is_version_key, FeatureLifecycle};
pub use numeric::{Number, NumericEvaluator, NumericPolicy};
pub use registry::{Sniff, SniffContext, SniffRegistry};
pub use tables::{FeatureTable, TableError};
