use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::token::{Token, TokenSet};

const CONFIG_PATH_ENV_VAR: &str = "ROTA_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        locations.push([dir.as_str(), "rota", "config.toml"].iter().collect());
    } else if let Some(dir) = dirs::home_dir() {
        locations.push(dir.join(".config").join("rota").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".rota.toml"));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ConfigFile {
    tick_rate: u64,
    tokens: Option<Vec<Token>>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            tick_rate: 500,
            tokens: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tick_rate: Duration,
    pub tokens: TokenSet,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_rate: Duration::from_millis(500),
            tokens: TokenSet::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;

        let tokens = match file.tokens {
            Some(tokens) if tokens.is_empty() => {
                return Err(Error::new(
                    ErrorKind::ConfigParse,
                    "at least one token must be defined",
                ))
            }
            Some(tokens) => TokenSet::new(tokens)?,
            None => TokenSet::default(),
        };

        Ok(Config {
            tick_rate: Duration::from_millis(file.tick_rate),
            tokens,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_msg(&format!("{}", path.display())))?;

        Config::from_toml(&content).map_err(|e| {
            let msg = format!(
                "{}: {}",
                path.display(),
                e.message.clone().unwrap_or_default()
            );
            e.with_msg(&msg)
        })
    }
}

/// Loads the configuration from `path` if given, otherwise from the first
/// existing default location. Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("Using config file {}", location.display());
            Config::load(&location)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
