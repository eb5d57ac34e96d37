//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe host-provided settings (logging, reminder presentation).
//! - Parse and validate JSON configuration documents.
//!
//! # Invariants
//! - Missing fields take `Default` values.
//! - `log_level` is one of `trace|debug|info|warn|error` after validation.

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sound asset attached to reminder alerts unless configured otherwise.
pub const DEFAULT_REMINDER_SOUND: &str = "due-notification.caf";

/// Top-level configuration consumed by core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<String>,
    pub reminder: ReminderSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            reminder: ReminderSettings::default(),
        }
    }
}

/// Presentation settings for reminder alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    /// User-chosen title template. `@` is replaced by the category name.
    /// Falls back to the localized default title when unset.
    pub title_template: Option<String>,
    pub sound: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            title_template: None,
            sound: DEFAULT_REMINDER_SOUND.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config document: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl CoreConfig {
    /// Parses a JSON document and validates the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Normalizes `log_level` and rejects unusable values.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.log_level = normalize_level(self.log_level.as_str())
            .map_err(ConfigError::Invalid)?
            .to_string();

        if self.reminder.sound.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "reminder.sound must not be blank".to_string(),
            ));
        }
        if let Some(template) = self.reminder.title_template.as_deref() {
            if template.trim().is_empty() {
                self.reminder.title_template = None;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_REMINDER_SOUND};

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config.log_dir, None);
        assert_eq!(config.reminder.sound, DEFAULT_REMINDER_SOUND);
        assert_eq!(config.reminder.title_template, None);
    }

    #[test]
    fn parses_nested_reminder_settings() {
        let config = CoreConfig::from_json_str(
            r#"{
                "log_level": "WARNING",
                "log_dir": "/var/log/tasknest",
                "reminder": { "title_template": "@ is calling", "sound": "chime.caf" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/tasknest"));
        assert_eq!(config.reminder.title_template.as_deref(), Some("@ is calling"));
        assert_eq!(config.reminder.sound, "chime.caf");
    }

    #[test]
    fn blank_title_template_falls_back_to_default() {
        let config =
            CoreConfig::from_json_str(r#"{ "reminder": { "title_template": "  " } }"#).unwrap();
        assert_eq!(config.reminder.title_template, None);
    }

    #[test]
    fn rejects_unknown_level_and_blank_sound() {
        let err = CoreConfig::from_json_str(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_json_str(r#"{ "reminder": { "sound": "" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = CoreConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
