use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{calendar::WeekStart, currency::LocaleConfig, errors::Result};

const HOME_ENV: &str = "BUDGET_CALENDAR_HOME";
const APP_DIR_NAME: &str = "budget_calendar";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_ROLLOVER_POLL_SECS: u64 = 60 * 60;

/// How mutation entry points treat input that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Coerce to zero, drop out-of-range references, log a warning.
    #[default]
    BestEffort,
    /// Reject with an [`EngineError`](crate::errors::EngineError).
    Strict,
}

impl InputPolicy {
    pub fn is_strict(self) -> bool {
        self == InputPolicy::Strict
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub week_start: WeekStart,
    pub rollover_poll_secs: u64,
    pub input_policy: InputPolicy,
    pub currency: String,
    pub locale: LocaleConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            rollover_poll_secs: DEFAULT_ROLLOVER_POLL_SECS,
            input_policy: InputPolicy::BestEffort,
            currency: "USD".into(),
            locale: LocaleConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Poll interval for month rollover checks; never shorter than one second.
    pub fn rollover_poll_interval(&self) -> Duration {
        Duration::from_secs(self.rollover_poll_secs.max(1))
    }
}

/// Loads and stores [`EngineConfig`] as JSON under the application directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `$BUDGET_CALENDAR_HOME`, falling back to the platform config directory.
    pub fn new() -> Result<Self> {
        Self::with_base_dir(base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Opens an explicit config file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the stored configuration, or defaults when none has been saved.
    pub fn load(&self) -> Result<EngineConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            Ok(EngineConfig::default())
        }
    }

    pub fn save(&self, config: &EngineConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn base_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
