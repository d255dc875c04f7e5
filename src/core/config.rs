use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error while loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level generator configuration.
///
/// Every field has a default, so an empty file (or no file) reproduces the
/// reference run of 100 users into `data/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Optional RNG seed for deterministic output.
    pub seed: Option<u64>,
    /// Number of users simulated per run.
    pub users: usize,
    /// Output file locations and write policy.
    pub output: OutputConfig,
    /// Session shape.
    pub session: SessionConfig,
    /// Action selection table.
    pub actions: ActionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            users: 100,
            output: OutputConfig::default(),
            session: SessionConfig::default(),
            actions: ActionConfig::default(),
        }
    }
}

impl Config {
    /// Loads a config file from TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output.dir must not be empty".to_string()));
        }
        for (field, name) in [
            ("output.state_file", &self.output.state_file),
            ("output.json_file", &self.output.json_file),
            ("output.csv_file", &self.output.csv_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Output sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the state file and both outputs.
    pub dir: PathBuf,
    pub state_file: String,
    pub json_file: String,
    pub csv_file: String,
    /// Update policy for the CSV file. The JSON file is always replaced.
    pub csv_mode: CsvMode,
    /// Stage every artifact and rename them into place once all writes succeed.
    pub atomic: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            state_file: "state.json".to_string(),
            json_file: "sessions.json".to_string(),
            csv_file: "sessions.csv".to_string(),
            csv_mode: CsvMode::Append,
            atomic: true,
        }
    }
}

impl OutputConfig {
    pub fn dir_path(&self) -> PathBuf {
        self.dir.clone()
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir_path().join(&self.state_file)
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir_path().join(&self.json_file)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir_path().join(&self.csv_file)
    }
}

/// How a run updates an existing CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvMode {
    /// Add rows after the existing ones; the header is only written once.
    Append,
    /// Rewrite the file with a header and this run's rows.
    Replace,
}

/// Longest session accepted by [`SessionConfig`]: one week.
pub const MAX_SESSION_MINUTES: i64 = 7 * 24 * 60;

/// Shape of a single simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time from LOGIN to LOGOUT.
    pub duration_minutes: i64,
    /// Inclusive bounds on the number of actions between LOGIN and LOGOUT.
    pub min_actions: u32,
    pub max_actions: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 15,
            min_actions: 1,
            max_actions: 20,
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_minutes <= 0 || self.duration_minutes > MAX_SESSION_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "session.duration_minutes must be between 1 and {MAX_SESSION_MINUTES}, got {}",
                self.duration_minutes
            )));
        }
        if self.min_actions == 0 {
            return Err(ConfigError::Invalid(
                "session.min_actions must be at least 1".to_string(),
            ));
        }
        if self.min_actions > self.max_actions {
            return Err(ConfigError::Invalid(format!(
                "session.min_actions ({}) exceeds session.max_actions ({})",
                self.min_actions, self.max_actions
            )));
        }
        Ok(())
    }
}

/// Action selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Scale weights to sum to 1. When false the raw reference weights
    /// (summing to 1.75) are walked cumulatively, as the original tool did.
    pub normalize_weights: bool,
    /// Per-action weight overrides keyed by action name (e.g. `CHECKOUT`).
    pub weights: BTreeMap<String, f64>,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            normalize_weights: true,
            weights: BTreeMap::new(),
        }
    }
}
