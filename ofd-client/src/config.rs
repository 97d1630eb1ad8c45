use std::path::{Path, PathBuf};
use std::time::Duration;

use ofd_core::{Credentials, DEFAULT_TOKEN_FILE, DeviceIdentity, OFD_BASE_URL};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file: {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config field is empty: {0}")]
    EmptyField(&'static str),
}

pub(crate) type Result<T> = std::result::Result<T, ConfigError>;

/// Содержимое `config.json`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Config {
    /// ["login", "password"]
    pub(crate) auth: Credentials,

    /// Реквизиты кассы
    pub(crate) kkt: DeviceIdentity,

    #[serde(default = "default_base_url")]
    pub(crate) base_url: String,

    #[serde(default)]
    pub(crate) token_file: Option<PathBuf>,

    /// Без таймаута, если не задан
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    OFD_BASE_URL.to_string()
}

impl Config {
    /// Файл кэша: флаг CLI > конфиг > authtoken.json
    pub(crate) fn token_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.token_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE))
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.login.trim().is_empty() {
            return Err(ConfigError::EmptyField("auth.login"));
        }
        if self.kkt.tax_id.trim().is_empty() {
            return Err(ConfigError::EmptyField("kkt.INN"));
        }
        if self.kkt.registration_number.trim().is_empty() {
            return Err(ConfigError::EmptyField("kkt.KKTRegNumber"));
        }
        Ok(())
    }
}

/// Загружает и проверяет конфиг
pub(crate) fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref().to_path_buf();

    let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;

    let cfg: Config = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        source: e,
    })?;

    cfg.validate()?;
    Ok(cfg)
}
