//! Built-in placeholder catalog
//!
//! The catalog is a read-only static table. Its declaration order is the
//! substitution order of the preset part of every mapping.

use chrono::{DateTime, Datelike, Local};
use std::env;
use std::fmt;
use uuid::Uuid;

/// Generator producing a preset value from the evaluation instant
pub type Generator = fn(&DateTime<Local>) -> String;

/// A built-in placeholder bound to its generator
#[derive(Clone, Copy)]
pub struct PresetVariable {
    /// Token in canonical `%key%` form
    pub token: &'static str,
    /// Short human-readable description
    pub description: &'static str,
    /// Value generator
    pub generate: Generator,
}

impl PresetVariable {
    const fn new(token: &'static str, description: &'static str, generate: Generator) -> Self {
        Self {
            token,
            description,
            generate,
        }
    }

    /// Evaluate this preset against `now`
    pub fn evaluate(&self, now: &DateTime<Local>) -> String {
        (self.generate)(now)
    }
}

impl fmt::Debug for PresetVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetVariable")
            .field("token", &self.token)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Every built-in placeholder in declaration order
pub static PRESETS: &[PresetVariable] = &[
    // date
    PresetVariable::new("%year%", "four-digit year", |now| now.format("%Y").to_string()),
    PresetVariable::new("%yy%", "two-digit year", |now| now.format("%y").to_string()),
    PresetVariable::new("%month%", "month number", |now| now.format("%m").to_string()),
    PresetVariable::new("%month_name%", "full month name", |now| {
        now.format("%B").to_string()
    }),
    PresetVariable::new("%month_name_short%", "abbreviated month name", |now| {
        now.format("%b").to_string()
    }),
    PresetVariable::new("%day%", "day of month", |now| now.format("%d").to_string()),
    PresetVariable::new("%day_of_week%", "full weekday name", |now| {
        now.format("%A").to_string()
    }),
    PresetVariable::new("%day_of_week_short%", "abbreviated weekday name", |now| {
        now.format("%a").to_string()
    }),
    PresetVariable::new("%day_of_year%", "day of year", |now| now.ordinal().to_string()),
    // combined dates
    PresetVariable::new("%date_iso%", "ISO date", |now| {
        now.format("%Y-%m-%d").to_string()
    }),
    PresetVariable::new("%date_cn%", "locale-formatted date", |now| {
        now.format("%Y年%m月%d日").to_string()
    }),
    PresetVariable::new("%date_compact%", "date without separators", |now| {
        now.format("%Y%m%d").to_string()
    }),
    // time
    PresetVariable::new("%hour_24%", "hour (24-hour clock)", |now| {
        now.format("%H").to_string()
    }),
    PresetVariable::new("%hour_12%", "hour (12-hour clock)", |now| {
        now.format("%I").to_string()
    }),
    PresetVariable::new("%minute%", "minute", |now| now.format("%M").to_string()),
    PresetVariable::new("%second%", "second", |now| now.format("%S").to_string()),
    PresetVariable::new("%am_pm%", "AM/PM marker", |now| now.format("%p").to_string()),
    // combined date and time
    PresetVariable::new("%datetime_iso%", "ISO date-time", |now| {
        now.format("%Y-%m-%dT%H:%M:%S").to_string()
    }),
    PresetVariable::new("%datetime_compact%", "date-time without separators", |now| {
        now.format("%Y%m%d%H%M%S").to_string()
    }),
    // context
    PresetVariable::new("%guid%", "freshly generated UUID", |_| {
        Uuid::new_v4().to_string()
    }),
    PresetVariable::new("%username%", "invoking user", |_| current_username()),
];

/// Name of the user running the process
pub fn current_username() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
