//! Error taxonomy for module registration, ordering and lifecycle calls.
//!
//! None of these conditions abort the host's frame loop. The manager logs them
//! and keeps going; they are surfaced as values so callers and tests can
//! inspect what happened.

use thiserror::Error;

/// Errors and diagnostics produced by the module manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// A module was registered under a name that was already taken.
    /// The previous module was replaced and dropped.
    #[error("module already registered, replacing: {name}")]
    DuplicateRegistration { name: String },

    /// A declared dependency is not present in the registry.
    #[error("missing dependency: {dependency} required by {module}")]
    MissingDependency { module: String, dependency: String },

    /// Following `module -> dependency` re-entered a module still on the
    /// traversal path. The edge was skipped.
    #[error("circular dependency detected: {module} -> {dependency}")]
    CircularDependency { module: String, dependency: String },

    /// Lookup of a name that is not registered.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// A lifecycle call was attempted on a module that is not initialized.
    #[error("{operation} called on uninitialized module: {name}")]
    UninitializedModuleCall {
        name: String,
        operation: &'static str,
    },

    /// A module's init hook reported failure.
    #[error("module initialization failed: {0}")]
    InitFailed(String),
}

impl ModuleError {
    /// Shorthand for modules reporting an init failure.
    pub fn init_failed(reason: impl Into<String>) -> Self {
        ModuleError::InitFailed(reason.into())
    }
}
