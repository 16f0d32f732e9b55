//! Display and template settings, read from a TOML file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{CostingInput, LaborEntry};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "KostoPro";
const APP_NAME: &str = "KostoPro";
const SETTINGS_FILENAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Symbol printed in front of money amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Decimal places used when displaying figures.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(default)]
    pub template: TemplateDefaults,
}

/// Starting values for a fresh costing sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefaults {
    #[serde(default = "default_initial_weight")]
    pub initial_weight: f64,
    #[serde(default)]
    pub vat_percent: f64,
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
    #[serde(default = "default_hours")]
    pub hours: f64,
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self {
            initial_weight: default_initial_weight(),
            vat_percent: 0.0,
            hourly_rate: default_hourly_rate(),
            hours: default_hours(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            decimals: default_decimals(),
            template: TemplateDefaults::default(),
        }
    }
}

impl Settings {
    /// Loads from an explicit path, which must exist.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Err(SettingsError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Explicit path if given, otherwise the platform config file when it
    /// exists, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match settings_file() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            None => {
                debug!("config directory unavailable, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// A sheet pre-filled the way the calculator opens: one worker at the
    /// configured rate and nothing else.
    pub fn template_input(&self) -> CostingInput {
        CostingInput {
            initial_weight: self.template.initial_weight,
            vat_percent: self.template.vat_percent,
            labor_entries: vec![LaborEntry::new(
                self.template.hourly_rate,
                self.template.hours,
            )],
            ..CostingInput::default()
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.decimals > 6 {
            return Err(SettingsError::Invalid(format!(
                "decimals must be at most 6, got {}",
                self.decimals
            )));
        }
        let template = [
            ("template.initial_weight", self.template.initial_weight),
            ("template.vat_percent", self.template.vat_percent),
            ("template.hourly_rate", self.template.hourly_rate),
            ("template.hours", self.template.hours),
        ];
        if let Some((name, value)) = template
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(SettingsError::Invalid(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
        Ok(())
    }
}

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_decimals() -> usize {
    2
}

fn default_initial_weight() -> f64 {
    1000.0
}

fn default_hourly_rate() -> f64 {
    4.5
}

fn default_hours() -> f64 {
    1.0
}
