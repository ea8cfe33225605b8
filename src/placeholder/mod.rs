//! Placeholder resolution
//!
//! Preset catalog, variable mappings and the sequential text substitutor.

mod mapping;
mod preset;
mod resolver;
mod substitute;

pub use mapping::{canonical_token, VariableMapping, DELIMITER};
pub use preset::{current_username, Generator, PresetVariable, PRESETS};
pub use resolver::VariableResolver;
pub use substitute::{substitute, Substitutor};
