use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

/// Digest of "ChangeMe!2025". A placeholder so a fresh checkout boots, not
/// a security guarantee; set ADMIN_PASS_HASH in any real deployment.
const DEFAULT_PASS_HASH: &str = "$2a$10$8r1GxXH6Q1m1Qk2o/b0m3uI2qUX1k4nJ5F1eYpA0seI6ex1x5gM7G";

pub struct Config {
    pub port: u16,
    pub admin_user: String,
    pub admin_pass_hash: String,
    pub session_secret: String,
    pub database_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3000"),
            admin_user: try_load("ADMIN_USER", "admin"),
            admin_pass_hash: load_secret("ADMIN_PASS_HASH", DEFAULT_PASS_HASH),
            session_secret: load_secret("SESSION_SECRET", "dev-secret-change-this"),
            database_path: try_load("DATABASE_PATH", "data/app.db"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn load_secret(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{key} not set, falling back to the built-in development default");
        default.to_string()
    })
}
