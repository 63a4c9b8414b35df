use std::{env, str::FromStr};

use log::warn;

/// Reads `name` from the environment and parses it into `T`. Missing values silently fall back to `default`;
/// unparseable values fall back to `default` with a warning.
pub fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ {s} is not a valid value for {name}. {e}. Using the default instead.");
            default
        }),
        Err(_) => default,
    }
}
