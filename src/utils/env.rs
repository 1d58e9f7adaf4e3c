// src/utils/env.rs

use log::{debug, warn};
use std::env;
use std::str::FromStr;

/// Loads a `.env` file from the working directory if one exists.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found, using process environment"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }
}

/// Parses an environment variable, falling back to `default` when unset or malformed.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring malformed value for {}: '{}'", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parses an optional environment variable; empty values count as unset.
pub fn env_opt<T: FromStr>(key: &str) -> Option<T> {
    env::var(key)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| raw.trim().parse::<T>().ok())
}

/// Reads a comma separated list, trimming entries and dropping empty ones.
pub fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_parses_and_falls_back() {
        env::set_var("ENV_TEST_BATCH_SIZE", "250");
        assert_eq!(env_or("ENV_TEST_BATCH_SIZE", 10usize), 250);
        env::set_var("ENV_TEST_BATCH_SIZE", "lots");
        assert_eq!(env_or("ENV_TEST_BATCH_SIZE", 10usize), 10);
        env::remove_var("ENV_TEST_BATCH_SIZE");
        assert_eq!(env_or("ENV_TEST_BATCH_SIZE", 10usize), 10);
    }

    #[test]
    fn test_env_list() {
        env::set_var("ENV_TEST_DOMAINS", " a.com, ,b.org ");
        assert_eq!(env_list("ENV_TEST_DOMAINS", &["x"]), vec!["a.com", "b.org"]);
        env::remove_var("ENV_TEST_DOMAINS");
        assert_eq!(env_list("ENV_TEST_DOMAINS", &["x"]), vec!["x"]);
    }

    #[test]
    fn test_env_opt_empty_is_none() {
        env::set_var("ENV_TEST_ROW_LIMIT", "");
        assert_eq!(env_opt::<usize>("ENV_TEST_ROW_LIMIT"), None);
        env::set_var("ENV_TEST_ROW_LIMIT", "15");
        assert_eq!(env_opt::<usize>("ENV_TEST_ROW_LIMIT"), Some(15));
        env::remove_var("ENV_TEST_ROW_LIMIT");
    }
}
