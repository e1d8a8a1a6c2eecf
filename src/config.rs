// src/config.rs
use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid number, got \"{value}\"")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub operator_id: i64,
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Reads settings from the environment. Call `dotenvy::dotenv()` first to
    /// pick up a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            max_connections: parsed_or("DB_MAX_CONNECTIONS", 5)?,
            operator_id: parsed_or("OPERATOR_ID", 1)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_when_unset() {
        assert_eq!(parsed_or("HAULBOOK_TEST_UNSET_VAR", 7u32).unwrap(), 7);
    }

    #[test]
    fn rejects_unparseable_numbers() {
        env::set_var("HAULBOOK_TEST_BAD_NUMBER", "lots");
        let err = parsed_or("HAULBOOK_TEST_BAD_NUMBER", 5u32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "HAULBOOK_TEST_BAD_NUMBER must be a valid number, got \"lots\""
        );
    }
}
