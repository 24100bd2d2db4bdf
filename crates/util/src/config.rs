use std::{env, fmt};

use super::{database_url, is_truthy, DATABASE_URL_VAR};

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns the canonical name used for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Seeder configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub database_url: String,
    pub environment: Environment,
    pub verify: bool,
}

impl SeedConfig {
    /// Constructs the configuration by reading and validating environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;
        let database_url = database_url().ok_or(ConfigError::MissingDatabaseUrl)?;
        let verify = !env::var("SEED_SKIP_VERIFY")
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            environment,
            verify,
        })
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    MissingDatabaseUrl,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::MissingDatabaseUrl => write!(f, "{DATABASE_URL_VAR} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
pub(crate) static ENV_GUARD: std::sync::LazyLock<std::sync::Mutex<()>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(()));

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        env::remove_var("APP_ENV");
        env::remove_var(DATABASE_URL_VAR);
        env::remove_var("SEED_SKIP_VERIFY");
    }

    #[test]
    fn loads_defaults_in_development() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var(DATABASE_URL_VAR, "sqlite://seed.db");

        let config = SeedConfig::from_env().expect("config should load with defaults");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database_url, "sqlite://seed.db");
        assert!(config.verify);

        clear_env();
    }

    #[test]
    fn requires_database_url() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();

        let err = SeedConfig::from_env().expect_err("missing url should error");
        assert!(matches!(err, ConfigError::MissingDatabaseUrl));
        assert_eq!(err.to_string(), "DATABASE_URL must be set");
    }

    #[test]
    fn rejects_invalid_environment() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var("APP_ENV", "invalid");
        env::set_var(DATABASE_URL_VAR, "sqlite://seed.db");

        let err = SeedConfig::from_env().expect_err("invalid env should error");
        assert!(matches!(err, ConfigError::InvalidEnvironment(value) if value == "invalid"));

        clear_env();
    }

    #[test]
    fn parses_production_environment_and_skip_flag() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var("APP_ENV", "prod");
        env::set_var(DATABASE_URL_VAR, "sqlite:///var/lib/jobboard.db");
        env::set_var("SEED_SKIP_VERIFY", "true");

        let config = SeedConfig::from_env().expect("config should load");
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.verify);

        clear_env();
    }
}
