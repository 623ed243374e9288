//! Centralized transition timing options with TOML preset support.
//!
//! Every duration, curve and geometric constant the coordinators use is
//! consolidated here so an animation and the phase change that waits for
//! it always read the same value. Options serialize to/from TOML.

mod page_exit;
mod proxy;
mod reveal;
mod split;

use std::path::Path;

pub use page_exit::PageExitOptions;
pub use proxy::ProxyOptions;
pub use reveal::RevealOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use split::SplitOptions;

use crate::error::SegueError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[split]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Uniform page exit.
    pub page_exit: PageExitOptions,
    /// Split-reveal cover.
    pub split: SplitOptions,
    /// Detail-route shared-element morph.
    pub detail: RevealOptions,
    /// In-page modal shared-element morph.
    pub modal: RevealOptions,
    /// Image passthrough.
    #[schemars(skip)]
    pub proxy: ProxyOptions,
}

impl Options {
    /// Generate JSON Schema describing the tunable options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(text: &str) -> Result<Self, SegueError> {
        toml::from_str(text).map_err(|e| SegueError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SegueError> {
        let content = std::fs::read_to_string(path).map_err(SegueError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SegueError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SegueError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SegueError::Io)?;
        }
        std::fs::write(path, content).map_err(SegueError::Io)
    }
}
