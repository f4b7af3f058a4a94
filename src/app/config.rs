//! Configuration for rendering

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::render::{html_escape_into, HtmlRenderer};

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for generated CSS class names
    pub class_prefix: String,
    /// HTML emitted for a line with no visible content
    pub blank_line: String,
    /// Wrap HTML output in `<pre class="{prefix}-container">`
    pub wrap_pre: bool,
    /// Maximum number of input bytes to read (0 = unlimited)
    pub max_input_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            class_prefix: "term".to_string(),
            blank_line: "&nbsp;".to_string(),
            wrap_pre: false,
            max_input_bytes: 0,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or return the defaults
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/term-render/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Build the line renderer this configuration describes
    pub fn renderer(&self) -> HtmlRenderer {
        HtmlRenderer {
            class_prefix: self.class_prefix.clone(),
            blank_line: self.blank_line.clone(),
        }
    }

    /// Apply the `wrap_pre` setting to rendered HTML
    pub fn wrap(&self, html: String) -> String {
        if !self.wrap_pre {
            return html;
        }

        let mut out = String::with_capacity(html.len() + 40);
        out.push_str("<pre class=\"");
        html_escape_into(&mut out, &self.class_prefix);
        out.push_str("-container\">");
        out.push_str(&html);
        out.push_str("</pre>");
        out
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("term-render"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
