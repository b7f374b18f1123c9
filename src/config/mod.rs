use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_church_name")]
    pub church_name: String,
    #[serde(default = "default_push_gateway_url")]
    pub push_gateway_url: String,
    #[serde(default = "default_push_sound")]
    pub push_sound: String,
    #[serde(default = "default_push_channel_id")]
    pub push_channel_id: String,
    #[serde(default = "default_push_timeout_secs")]
    pub push_timeout_secs: u64,
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
    #[serde(default = "default_mail_sender")]
    pub mail_sender: String,
    /// Day ordering for general activities: "fixed" or "today"
    #[serde(default = "default_schedule_order")]
    pub default_schedule_order: String,
}

fn default_church_name() -> String {
    "Iglesia".to_string()
}
fn default_push_gateway_url() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}
fn default_push_sound() -> String {
    "default".to_string()
}
fn default_push_channel_id() -> String {
    "default".to_string()
}
fn default_push_timeout_secs() -> u64 {
    10
}
fn default_kdf_iterations() -> u32 {
    100_000
}
fn default_mail_sender() -> String {
    "no-reply@iglesia.local".to_string()
}
fn default_schedule_order() -> String {
    "fixed".to_string()
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            church_name: default_church_name(),
            push_gateway_url: default_push_gateway_url(),
            push_sound: default_push_sound(),
            push_channel_id: default_push_channel_id(),
            push_timeout_secs: default_push_timeout_secs(),
            kdf_iterations: default_kdf_iterations(),
            mail_sender: default_mail_sender(),
            default_schedule_order: default_schedule_order(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rchurch")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rchurch")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rchurch.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rchurch.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Serialize and write this configuration to the standard config file.
    pub fn save(&self) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// `--db` value to a path: `~` expanded, relative names live in the config dir.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_name {
            Some(name) => Self::resolve_db_path(&name),
            None => dir.join("rchurch.sqlite"),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
