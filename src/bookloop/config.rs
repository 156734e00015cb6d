use crate::error::{BookloopError, Result};
use crate::store::fs::{DEFAULT_BOOKS_FILE, DEFAULT_PROFIT_FILE, DEFAULT_USERS_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Share of the sale price credited to the platform on each purchase.
pub const DEFAULT_COMMISSION_RATE: f64 = 0.10;
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 4;

/// Configuration for bookloop, stored in `<data-dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookloopConfig {
    #[serde(default = "default_books_file")]
    pub books_file: String,

    #[serde(default = "default_users_file")]
    pub users_file: String,

    #[serde(default = "default_profit_file")]
    pub profit_file: String,

    /// Fraction of the price kept as commission (0.10 = 10%)
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

fn default_books_file() -> String {
    DEFAULT_BOOKS_FILE.to_string()
}

fn default_users_file() -> String {
    DEFAULT_USERS_FILE.to_string()
}

fn default_profit_file() -> String {
    DEFAULT_PROFIT_FILE.to_string()
}

fn default_commission_rate() -> f64 {
    DEFAULT_COMMISSION_RATE
}

fn default_min_password_length() -> usize {
    DEFAULT_MIN_PASSWORD_LENGTH
}

impl Default for BookloopConfig {
    fn default() -> Self {
        Self {
            books_file: default_books_file(),
            users_file: default_users_file(),
            profit_file: default_profit_file(),
            commission_rate: DEFAULT_COMMISSION_RATE,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl BookloopConfig {
    pub const KEYS: [&'static str; 5] = [
        "books-file",
        "users-file",
        "profit-file",
        "commission-rate",
        "min-password-length",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(BookloopError::Io)?;
        let config: BookloopConfig =
            serde_json::from_str(&content).map_err(BookloopError::Serialization)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(BookloopError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(BookloopError::Serialization)?;
        fs::write(config_path, content).map_err(BookloopError::Io)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.commission_rate) {
            return Err(BookloopError::Validation(format!(
                "commission rate must be between 0 and 1, got {}",
                self.commission_rate
            )));
        }
        for name in [&self.books_file, &self.users_file, &self.profit_file] {
            if name.trim().is_empty() {
                return Err(BookloopError::Validation(
                    "file names cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "books-file" => Some(self.books_file.clone()),
            "users-file" => Some(self.users_file.clone()),
            "profit-file" => Some(self.profit_file.clone()),
            "commission-rate" => Some(self.commission_rate.to_string()),
            "min-password-length" => Some(self.min_password_length.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |what: &str| BookloopError::Validation(format!("{}: {}", what, value));
        match key {
            "books-file" => self.books_file = value.to_string(),
            "users-file" => self.users_file = value.to_string(),
            "profit-file" => self.profit_file = value.to_string(),
            "commission-rate" => {
                self.commission_rate = value
                    .parse()
                    .map_err(|_| invalid("commission rate must be a number"))?
            }
            "min-password-length" => {
                self.min_password_length = value
                    .parse()
                    .map_err(|_| invalid("minimum password length must be a whole number"))?
            }
            _ => {
                return Err(BookloopError::Validation(format!(
                    "Unknown config key: {}",
                    key
                )))
            }
        }
        self.validate()
    }
}
