//! Unified error type for the Rivet workspace.
//!
//! Loading, coercion and construction failures all surface as a
//! [`RivetError`]. The binary crate wraps it in `anyhow` at the edge.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RivetError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A settings value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The binding table could not be loaded.
    #[error("failed to load bindings: {message}")]
    BindingLoadFailed {
        /// Description of the failure.
        message: String,
    },

    /// The value table could not be loaded.
    #[error("failed to load values: {message}")]
    ValueLoadFailed {
        /// Description of the failure.
        message: String,
    },

    /// A type name is not registered in the catalog.
    #[error("unknown type: {name}")]
    UnknownType {
        /// The type name that was looked up.
        name: String,
    },

    /// The type has neither a marked constructor nor a zero-parameter one.
    #[error("no usable constructor for {type_name}")]
    NoUsableConstructor {
        /// The concrete type that was being constructed.
        type_name: String,
    },

    /// Invoking the selected constructor failed.
    #[error("construction of {type_name} failed: {message}")]
    ConstructionFailed {
        /// The concrete type that was being constructed.
        type_name: String,
        /// Description of the failure.
        message: String,
    },

    /// Injecting a single field failed.
    #[error("injection of field {type_name}.{field} failed: {message}")]
    FieldInjectionFailed {
        /// The type owning the field.
        type_name: String,
        /// The field name.
        field: String,
        /// Description of the failure.
        message: String,
    },

    /// A type depends on itself, directly or transitively.
    #[error("cyclic dependency detected: {}", chain.join(" -> "))]
    CyclicDependency {
        /// The construction chain, ending with the repeated type.
        chain: Vec<String>,
    },

    /// A raw configuration string could not be coerced.
    #[error("cannot coerce {candidate:?}: {message}")]
    Coercion {
        /// The raw candidate string.
        candidate: String,
        /// Description of the failure.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl RivetError {
    /// Returns `true` for errors that must abort the whole construction
    /// regardless of the configured failure policy.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::CyclicDependency { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RivetError>;
