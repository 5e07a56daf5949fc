use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use crate::utils::zone::Zone;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,

    /// Account whose records every command works on.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,

    /// Busy timeout of the SQLite connection, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,
    /// How far back the dashboard views fetch records.
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// `local`, `utc` or a fixed offset such as `+02:00`.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_store_timeout_ms() -> u64 {
    5000
}
fn default_period_days() -> u32 {
    7
}
fn default_history_days() -> u32 {
    90
}
fn default_timezone() -> String {
    "local".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            owner_id: None,
            display_name: None,
            email: None,
            store_timeout_ms: default_store_timeout_ms(),
            default_period_days: default_period_days(),
            history_days: default_history_days(),
            timezone: default_timezone(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("timekeeper")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timekeeper.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timekeeper.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let cfg: Config = serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("cannot parse configuration: {e}")))?;
        cfg.zone()?;
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }

    pub fn zone(&self) -> AppResult<Zone> {
        Zone::parse(&self.timezone)
    }

    /// Owner every store call is scoped to.
    pub fn require_owner(&self) -> AppResult<&str> {
        self.owner_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingOwner)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Initialize configuration and database paths.
    ///
    /// A relative `custom_db` is placed inside the config directory. In test
    /// mode the config file is left untouched.
    pub fn init_all(
        custom_db: Option<&str>,
        owner: Option<&str>,
        is_test: bool,
    ) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let mut config = if is_test {
            Self::default()
        } else {
            Self::load()?
        };
        config.database = db_path.to_string_lossy().to_string();
        if let Some(owner) = owner {
            config.owner_id = Some(owner.to_string());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }
}
