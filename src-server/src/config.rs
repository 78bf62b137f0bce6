//! Environment configuration
//!
//! Every setting has a default; unset or invalid values fall back to it with
//! a log line.

use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Deployment profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Requests act as the fallback user
    Development,
    /// Mutating requests require an authenticated user
    Production,
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(format!("unknown profile '{}'", other)),
        }
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Development => write!(f, "development"),
            Profile::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub bind_address: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// User name the development profile acts as
    pub fallback_user: String,
    /// Sample items to insert into an empty store at startup
    pub seed_sample_items: u32,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            profile: try_load("APP_PROFILE", Profile::Development),
            bind_address: try_load("BIND_ADDRESS", "0.0.0.0".to_string()),
            port: try_load("RUST_PORT", 5000),
            database_path: PathBuf::from(try_load(
                "DATABASE_PATH",
                "open_game_list.db".to_string(),
            )),
            fallback_user: try_load("FALLBACK_USER", "Admin".to_string()),
            seed_sample_items: try_load("SEED_SAMPLE_ITEMS", 0),
            log_dir: log_dir(),
        }
    }

    /// Development settings over the given database, without seeding
    pub fn development(database_path: impl Into<PathBuf>) -> Self {
        Self {
            profile: Profile::Development,
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            database_path: database_path.into(),
            fallback_user: "Admin".to_string(),
            seed_sample_items: 0,
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Log directory, readable before the logger (and the rest of the config)
/// is set up
pub fn log_dir() -> PathBuf {
    PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()))
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parsing() {
        assert_eq!("Production".parse::<Profile>(), Ok(Profile::Production));
        assert_eq!("dev".parse::<Profile>(), Ok(Profile::Development));
        assert!("staging".parse::<Profile>().is_err());
    }

    #[test]
    fn test_try_load_falls_back() {
        env::set_var("OGL_TEST_PORT_INVALID", "not-a-port");
        assert_eq!(try_load::<u16>("OGL_TEST_PORT_INVALID", 5000), 5000);

        env::set_var("OGL_TEST_PORT_VALID", "8080");
        assert_eq!(try_load::<u16>("OGL_TEST_PORT_VALID", 5000), 8080);

        assert_eq!(try_load::<u32>("OGL_TEST_UNSET_KEY", 7), 7);
    }
}
