//! Error types for catalog loading and validation.
//!
//! Runtime operations on a [`Configurator`](crate::Configurator) never fail:
//! unreachable toggles and dangling ids degrade to no-ops or fallbacks. Errors
//! only surface where content enters the crate.

use crate::catalog::{ConfigurationId, ModuleId};
use thiserror::Error;

/// Catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The document is not valid catalog JSON
    #[error("Failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    /// No configurations to choose from
    #[error("Configuration catalog is empty")]
    Empty,

    /// An entry declares an id different from the key it is stored under
    #[error("{kind} key \"{key}\" does not match declared id \"{declared}\"")]
    IdMismatch {
        /// Entry kind ("module" or "configuration")
        kind: &'static str,
        /// Catalog key
        key: String,
        /// Id declared inside the entry
        declared: String,
    },

    /// A configuration carries a NaN or infinite coordinate
    #[error("Configuration \"{configuration}\" has a non-finite position for module \"{module}\"")]
    NonFinitePosition {
        /// Offending configuration
        configuration: ConfigurationId,
        /// Module whose position is invalid
        module: ModuleId,
    },

    /// A configuration places a module that the module catalog does not define
    #[error("Configuration \"{configuration}\" places unknown module \"{module}\"")]
    UnknownModule {
        /// Offending configuration
        configuration: ConfigurationId,
        /// Undefined module id
        module: ModuleId,
    },

    /// Two configurations activate exactly the same modules
    #[error("Configurations \"{first}\" and \"{second}\" activate the same module set")]
    DuplicateModuleSet {
        /// Configuration encountered first
        first: ConfigurationId,
        /// Configuration encountered second
        second: ConfigurationId,
    },
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
