//! Sequential placeholder substitution
//!
//! Each mapping entry is applied in turn as one global, case-insensitive,
//! literal replacement over the text produced by the previous entry. This is
//! not a simultaneous single pass: a value that contains a token processed
//! later is expanded again, while a value that contains a token processed
//! earlier is left untouched.

use crate::error::{Error, Result};
use crate::placeholder::mapping::VariableMapping;
use regex::{NoExpand, Regex, RegexBuilder};

/// Precompiled substitution over a fixed mapping
#[derive(Debug, Clone)]
pub struct Substitutor {
    rules: Vec<(Regex, String)>,
}

impl Substitutor {
    /// Compile one literal, case-insensitive matcher per mapping entry
    pub fn new(mapping: &VariableMapping) -> Result<Self> {
        let rules = mapping
            .iter()
            .map(|(token, value)| {
                RegexBuilder::new(&regex::escape(token))
                    .case_insensitive(true)
                    .build()
                    .map(|re| (re, value.to_string()))
                    .map_err(|e| {
                        Error::invalid_input(format!("cannot match token '{}': {}", token, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Apply every rule in mapping order
    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        self.rules.iter().fold(text.to_string(), |current, (re, value)| {
            if re.is_match(&current) {
                re.replace_all(&current, NoExpand(value)).into_owned()
            } else {
                current
            }
        })
    }

    /// Number of compiled rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the mapping was empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Substitute every token of `mapping` in `text`
pub fn substitute(text: &str, mapping: &VariableMapping) -> Result<String> {
    if text.is_empty() || mapping.is_empty() {
        return Ok(text.to_string());
    }
    Ok(Substitutor::new(mapping)?.apply(text))
}
