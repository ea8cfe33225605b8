// PROJGEN: Template-based project scaffolding
// Copyright (c) 2024 PROJGEN Core Team

//! # PROJGEN Library
//!
//! Creates new projects from template directories. Placeholder tokens such as
//! `%year%` or `%project_name%` are resolved in directory names, file names
//! and, optionally, README content.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

// Core modules
pub mod config;
pub mod core;
pub mod error;
pub mod paths;
pub mod placeholder;
pub mod template;

// Re-exports for convenience
pub use crate::config::{CustomPlaceholder, Settings};
pub use crate::core::{ProjectCreator, RuntimeValues};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::placeholder::{substitute, Substitutor, VariableMapping, VariableResolver};
pub use crate::template::{InstantiationReport, TemplateInstantiator, TreeCopier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{CustomPlaceholder, Settings};
    pub use crate::core::{ProjectCreator, RuntimeValues};
    pub use crate::error::{Error, ErrorKind, Result, ResultExt};
    pub use crate::placeholder::{substitute, VariableMapping, VariableResolver};
    pub use crate::template::{DirectoryMover, InstantiationReport, TemplateInstantiator};
}
