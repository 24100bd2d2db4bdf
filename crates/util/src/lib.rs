pub mod config;

use std::env;

pub use config::{ConfigError, Environment, SeedConfig};

/// Environment variable holding the sqlx connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Loads environment variables from `.env` when available.
///
/// Missing files are ignored so the function is safe in deployments where
/// dotenv files are not shipped.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

/// Returns the database connection string configured for the seeder.
///
/// The value is read from [`DATABASE_URL_VAR`]; there is no default because
/// seeding wipes every collection it touches.
pub fn database_url() -> Option<String> {
    env::var(DATABASE_URL_VAR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Interprets common truthy spellings used in environment flags.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_GUARD;

    #[test]
    fn returns_none_when_database_url_missing() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::remove_var(DATABASE_URL_VAR);
        assert!(database_url().is_none());
    }

    #[test]
    fn blank_database_url_counts_as_missing() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::set_var(DATABASE_URL_VAR, "   ");
        assert!(database_url().is_none());
        env::remove_var(DATABASE_URL_VAR);
    }

    #[test]
    fn trims_database_url() {
        let _lock = ENV_GUARD.lock().expect("env guard poisoned");
        env::set_var(DATABASE_URL_VAR, " sqlite://seed.db ");
        assert_eq!(database_url().as_deref(), Some("sqlite://seed.db"));
        env::remove_var(DATABASE_URL_VAR);
    }

    #[test]
    fn truthy_flags() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" yes "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy(""));
    }
}
