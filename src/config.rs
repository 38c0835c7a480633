//! Navigation configuration: selectors, class names and logging level

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};

/// Selectors and class names describing the navigation markup.
///
/// Every field has a default, so a partial JSON object is enough:
/// `{"open_class": "show"}` keeps everything else as shipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Locates the navigation container (first match wins)
    pub container_selector: String,
    /// Navigation links inside the container
    pub link_selector: String,
    /// Dropdown group roots inside the container
    pub dropdown_selector: String,
    /// Trigger element inside a dropdown root
    pub trigger_selector: String,
    /// Menu element inside a dropdown root
    pub menu_selector: String,
    /// Class added to active links and to the trigger of their dropdown
    pub active_class: String,
    /// Class added to a dropdown root while it is open
    pub open_class: String,
    /// Document served for the site root
    pub index_document: String,
    /// Maximum log level ("off", "error", "warn", "info", "debug", "trace")
    pub log_level: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            container_selector: "#site-nav, nav".to_string(),
            link_selector: "a[href]".to_string(),
            dropdown_selector: ".dropdown".to_string(),
            trigger_selector: ".dropdown-toggle".to_string(),
            menu_selector: ".dropdown-menu".to_string(),
            active_class: "active".to_string(),
            open_class: "open".to_string(),
            index_document: "index.html".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl NavConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> NavResult<Self> {
        let config: NavConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that selectors are present and class names are usable tokens
    pub fn validate(&self) -> NavResult<()> {
        let selectors = [
            ("container_selector", &self.container_selector),
            ("link_selector", &self.link_selector),
            ("dropdown_selector", &self.dropdown_selector),
            ("trigger_selector", &self.trigger_selector),
            ("menu_selector", &self.menu_selector),
        ];
        for (field, value) in selectors {
            if value.trim().is_empty() {
                return Err(NavError::InvalidConfig(format!("{} must not be empty", field)));
            }
        }

        for (field, value) in [("active_class", &self.active_class), ("open_class", &self.open_class)] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(NavError::InvalidConfig(format!(
                    "{} must be a single class token, got '{}'",
                    field, value
                )));
            }
        }

        if self.index_document.trim().is_empty() || self.index_document.contains('/') {
            return Err(NavError::InvalidConfig(format!(
                "index_document must be a bare file name, got '{}'",
                self.index_document
            )));
        }

        Ok(())
    }

    /// Log level as a `log` filter, falling back to `Warn` for unknown names
    pub fn log_level_filter(&self) -> log::LevelFilter {
        log::LevelFilter::from_str(self.log_level.trim()).unwrap_or(log::LevelFilter::Warn)
    }
}
