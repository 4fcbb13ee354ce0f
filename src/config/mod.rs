use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{LedgerError, Result};
use crate::utils::{app_home_dir, ensure_dir};

pub const DEFAULT_STORAGE_KEY: &str = "finance-storage";
pub const DEFAULT_SESSION_KEY: &str = "finance-session";
pub const DEFAULT_RECENT_LIMIT: usize = 5;

const CONFIG_FILE: &str = "config.json";
const DATA_DIR: &str = "data";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Key the ledger document is stored under.
    pub storage_key: String,
    pub session_key: String,
    /// Directory backing the file store; `<home>/data` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Rows shown by the dashboard's recent list.
    pub recent_limit: usize,
    pub seed_sample_data: bool,
    pub currency_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            session_key: DEFAULT_SESSION_KEY.into(),
            data_dir: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            seed_sample_data: false,
            currency_symbol: "$".into(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(LedgerError::Config("storage_key must not be empty".into()));
        }
        if self.session_key.trim().is_empty() {
            return Err(LedgerError::Config("session_key must not be empty".into()));
        }
        if self.storage_key == self.session_key {
            return Err(LedgerError::Config(
                "storage_key and session_key must differ".into(),
            ));
        }
        Ok(())
    }

    /// Renders an amount with the configured currency symbol, e.g. `$1,234.50`.
    pub fn format_amount(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (index, digit) in whole.chars().enumerate() {
            if index > 0 && (whole.len() - index) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }
        format!("{sign}{}{grouped}.{cents}", self.currency_symbol)
    }
}

/// Loads and saves [`Config`] as `<home>/config.json`.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Manager rooted at `$FINANCE_CORE_HOME` or `~/.finance_core`.
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_home_dir())
    }

    pub fn with_base_dir(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        ensure_dir(&base)?;
        let path = base.join(CONFIG_FILE);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| LedgerError::Config(format!("{}: {}", self.path.display(), err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Directory the file store should use for `config`.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| self.base.join(DATA_DIR))
    }
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

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
