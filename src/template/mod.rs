//! Template system for PROJGEN
//!
//! Verbatim tree copy plus the instantiation walk that resolves names and
//! marker file content.

mod copier;
mod instantiator;

pub use copier::{CopyStats, TreeCopier};
pub use instantiator::{
    DirectoryMover, FsMover, InstantiationReport, TemplateInstantiator, README_MARKER,
};
