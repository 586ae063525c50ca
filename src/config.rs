use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ui::stepper::{FooterConfig, StepDescriptor, StepperOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub wizard: WizardConfig,
    /// Steps shown by the wizard, in order
    #[serde(default = "default_steps")]
    pub steps: Vec<StepDescriptor>,
    pub ui: UiConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Step shown first when the wizard owns its own state
    #[serde(default = "default_step")]
    pub default_step: usize,
    #[serde(default = "default_true")]
    pub show_default_actions: bool,
    #[serde(default = "default_next_label")]
    pub next_label: String,
    #[serde(default = "default_prev_label")]
    pub prev_label: String,
    #[serde(default = "default_finish_label")]
    pub finish_label: String,
    /// Keep the current step in the application and feed changes back
    #[serde(default)]
    pub controlled: bool,
    /// Simulated latency of the next-step validation hook
    #[serde(default = "default_validation_delay")]
    pub validation_delay_ms: u64,
}

fn default_step() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_next_label() -> String {
    "Next".to_string()
}

fn default_prev_label() -> String {
    "Previous".to_string()
}

fn default_finish_label() -> String {
    "Finish".to_string()
}

fn default_validation_delay() -> u64 {
    400
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            default_step: default_step(),
            show_default_actions: default_true(),
            next_label: default_next_label(),
            prev_label: default_prev_label(),
            finish_label: default_finish_label(),
            controlled: false,
            validation_delay_ms: default_validation_delay(),
        }
    }
}

fn default_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new("Welcome").with_description("What this wizard sets up"),
        StepDescriptor::new("Profile")
            .with_description("Tell us who you are")
            .with_icon("@"),
        StepDescriptor::new("Terms").with_description("Review and accept"),
        StepDescriptor::new("Done").with_description("Review your choices"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory for runtime files such as logs
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_true")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wizard: WizardConfig::default(),
            steps: default_steps(),
            ui: UiConfig { tick_rate_ms: 50 },
            paths: PathsConfig {
                state: ".stepwise".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".stepwise/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the wizard runs without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        // User config in ~/.config/stepwise/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stepwise").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with STEPWISE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("STEPWISE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .stepwise/config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::project_config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(config_path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    /// Stepper options described by the `[wizard]` section. Controlled mode and
    /// hooks are wired by the caller since they need runtime callbacks.
    pub fn stepper_options(&self) -> StepperOptions {
        if self.wizard.default_step == 0 {
            tracing::warn!("wizard.default_step is 1-indexed; starting at step 1");
        }
        StepperOptions {
            default_step: self.wizard.default_step.max(1),
            footer: FooterConfig {
                show_default_actions: self.wizard.show_default_actions,
                next_label: self.wizard.next_label.clone(),
                prev_label: self.wizard.prev_label.clone(),
                finish_label: self.wizard.finish_label.clone(),
            },
            ..StepperOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.wizard.default_step, 1);
        assert!(config.wizard.show_default_actions);
        assert_eq!(config.wizard.next_label, "Next");
        assert_eq!(config.wizard.prev_label, "Previous");
        assert_eq!(config.steps.len(), 4);
        assert!(!config.wizard.controlled);
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wizard.toml");
        std::fs::write(
            &path,
            r#"
[wizard]
next_label = "Continue"
default_step = 2

[[steps]]
title = "Connect"
description = "Pick a server"

[[steps]]
title = "Sync"
icon = "~"
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.wizard.next_label, "Continue");
        assert_eq!(config.wizard.prev_label, "Previous");
        assert_eq!(config.wizard.default_step, 2);
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.steps[0].description.as_deref(), Some("Pick a server"));
        assert_eq!(config.steps[1].icon.as_deref(), Some("~"));
    }

    #[test]
    fn test_save_round_trips_through_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.wizard.finish_label = "Done!".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.wizard.finish_label, "Done!");
        assert_eq!(loaded.steps, config.steps);
    }

    #[test]
    fn test_stepper_options_from_wizard_section() {
        let mut config = Config::default();
        config.wizard.default_step = 0;
        config.wizard.show_default_actions = false;
        config.wizard.prev_label = "Back".to_string();

        let options = config.stepper_options();
        assert_eq!(options.default_step, 1);
        assert!(!options.footer.show_default_actions);
        assert_eq!(options.footer.prev_label, "Back");
        assert!(options.controlled.is_none());
    }

    #[test]
    fn test_logs_path_under_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();
        assert!(config.logs_path().starts_with(temp_dir.path()));
        assert!(config.logs_path().ends_with("logs"));
    }
}
