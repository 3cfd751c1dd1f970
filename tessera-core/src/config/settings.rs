//! Layout settings
//!
//! User-tunable knobs for the pane layout, stored as TOML under the
//! platform config directory. Missing keys fall back to their defaults so
//! older files keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::pane::{DEFAULT_HANDLE_THICKNESS, LayoutRenderer, SplitDirection};
use crate::tracing::{TracingConfig, TracingLevel};

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "tessera";

/// Settings file name.
pub const CONFIG_FILE_NAME: &str = "layout.toml";

/// Settings that shape how workspaces are laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Thickness of drag handles between panes, in pixels.
    pub handle_thickness: f64,
    /// Move focus into the pending pane created by a split.
    pub focus_new_pane: bool,
    /// Direction used by the "split" action when none is given.
    pub initial_direction: SplitDirection,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            handle_thickness: DEFAULT_HANDLE_THICKNESS,
            focus_new_pane: true,
            initial_direction: SplitDirection::Vertical,
            logging: LoggingSettings::default(),
        }
    }
}

/// Logging section of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level.
    pub level: TracingLevel,
    /// Custom `EnvFilter` directive, overrides `level` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl LoggingSettings {
    /// Builds the tracing configuration described by these settings.
    #[must_use]
    pub fn to_tracing_config(&self) -> TracingConfig {
        let config = TracingConfig::new().with_level(self.level);
        match &self.filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}

impl LayoutSettings {
    /// Parses settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not valid settings TOML.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serializes settings to TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if serialization fails.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if it is malformed.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let _span = tracing::debug_span!(
            crate::tracing::span_names::CONFIG_LOAD,
            path = %path.display()
        )
        .entered();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Writes settings to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be written.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let _span = tracing::debug_span!(
            crate::tracing::span_names::CONFIG_SAVE,
            path = %path.display()
        )
        .entered();
        let text = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns `<config dir>/tessera/layout.toml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Loads settings from `path`, falling back to defaults when the file
    /// is missing or unreadable.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default layout settings");
                Self::default()
            }
        }
    }

    /// Builds a layout renderer using these settings.
    #[must_use]
    pub fn layout_renderer(&self) -> LayoutRenderer {
        LayoutRenderer::new(self.handle_thickness)
    }
}
