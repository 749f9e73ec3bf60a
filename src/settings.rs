//! Hub settings loaded from files and environment variables.
//!
//! Sources are layered in the order they are added: later files override
//! earlier ones, and environment variables override every file.

use crate::core::DeliveryPolicy;
use crate::error::{HubError, Result};
use config::{Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings applied to a hub through
/// [`NotificationHubBuilder::with_settings`](crate::core::NotificationHubBuilder::with_settings).
///
/// Every field has a default, so a settings file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    /// Diagnostic name used in logs and metrics
    pub name: String,
    /// Failure policy for notification rounds (`isolate` or `fail_fast`)
    pub delivery: DeliveryPolicy,
    /// Log each successful delivery at debug level
    pub trace_deliveries: bool,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            name: "hub".to_string(),
            delivery: DeliveryPolicy::default(),
            trace_deliveries: false,
        }
    }
}

impl HubSettings {
    /// Start a layered settings load.
    pub fn loader() -> SettingsLoader {
        SettingsLoader::new()
    }

    /// Load settings from a single file.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Settings`] if the file is missing, has an
    /// unsupported extension, or does not deserialize.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        SettingsLoader::new().with_file(path).load()
    }
}

/// Layered loader for [`HubSettings`].
///
/// # Examples
///
/// ```rust,no_run
/// use observer_hub::settings::HubSettings;
///
/// # fn example() -> observer_hub::error::Result<()> {
/// // HUB_DELIVERY=fail_fast overrides the file value
/// let settings = HubSettings::loader()
///     .with_file("config/hub.yaml")
///     .with_env_overrides("HUB", "__")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsLoader {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
}

impl SettingsLoader {
    /// Create a loader with no sources. Loading it yields the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a YAML, TOML or JSON file; format is picked from the extension.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Read overrides from environment variables.
    ///
    /// `PREFIX_KEY` sets a top-level key; `separator` splits nested keys.
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Merge all sources and deserialize.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Settings`] if any file is missing or unsupported,
    /// or if the merged values do not deserialize into [`HubSettings`].
    pub fn load(self) -> Result<HubSettings> {
        let mut builder = config::Config::builder();

        for path in &self.file_paths {
            validate_extension(path)?;
            if !path.exists() {
                return Err(HubError::Settings(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        if let (Some(prefix), Some(separator)) = (&self.env_prefix, &self.env_separator) {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(separator)
                    .try_parsing(true),
            );
        }

        let merged = builder
            .build()
            .map_err(|e| HubError::Settings(format!("Failed to build settings: {}", e)))?;

        let settings: HubSettings = merged
            .try_deserialize()
            .map_err(|e| HubError::Settings(format!("Failed to deserialize settings: {}", e)))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            name = %settings.name,
            delivery = ?settings.delivery,
            files = self.file_paths.len(),
            "hub settings loaded"
        );

        Ok(settings)
    }
}

fn validate_extension(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            HubError::Settings(format!(
                "Unable to determine file format for: {}",
                path.display()
            ))
        })?;

    match extension {
        "yaml" | "yml" | "toml" | "json" => Ok(()),
        _ => Err(HubError::Settings(format!(
            "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
            extension
        ))),
    }
}
