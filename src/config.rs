use chrono_tz::Tz;

use crate::error::ConfigError;

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "suggestions";
/// daily at 00:00 (seconds-resolution cron)
const DEFAULT_SCHEDULE: &str = "0 0 0 * * *";
const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    /// cron expression for the purge job
    pub schedule: String,
    /// timezone the schedule is evaluated in. The cutoff itself is always UTC wall-clock.
    pub timezone: Tz,
    pub purge_on_startup: bool,
    /// run each delete batch in a transaction. Needs a replica set or sharded cluster.
    pub atomic_batches: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            schedule: DEFAULT_SCHEDULE.to_string(),
            timezone: DEFAULT_TIMEZONE,
            purge_on_startup: false,
            atomic_batches: true,
        }
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value, reason: "expected a boolean".to_string() }),
    }
}

impl Config {
    /// reads the process environment. call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(uri) = lookup("MONGODB_URI") { config.mongodb_uri = uri; }
        if let Some(database) = lookup("MONGODB_DATABASE") { config.database = database; }
        if let Some(schedule) = lookup("PURGE_SCHEDULE") { config.schedule = schedule; }

        if let Some(tz) = lookup("PURGE_TIMEZONE") {
            config.timezone = tz.parse::<Tz>().map_err(|reason| ConfigError::Invalid {
                key: "PURGE_TIMEZONE",
                value: tz.clone(),
                reason: reason.to_string(),
            })?;
        }

        if let Some(value) = lookup("PURGE_ON_STARTUP") {
            config.purge_on_startup = parse_bool("PURGE_ON_STARTUP", value)?;
        }
        if let Some(value) = lookup("MONGODB_ATOMIC_BATCHES") {
            config.atomic_batches = parse_bool("MONGODB_ATOMIC_BATCHES", value)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.timezone, chrono_tz::America::New_York);
        assert_eq!(config.schedule, "0 0 0 * * *");
        assert!(config.atomic_batches);
        assert!(!config.purge_on_startup);
    }

    #[test]
    fn overrides_from_environment() {
        let config = config_from(&[
            ("MONGODB_URI", "mongodb://db:27017/?replicaSet=rs0"),
            ("MONGODB_DATABASE", "app"),
            ("PURGE_SCHEDULE", "0 30 3 * * *"),
            ("PURGE_TIMEZONE", "Europe/Berlin"),
            ("PURGE_ON_STARTUP", "yes"),
            ("MONGODB_ATOMIC_BATCHES", "false"),
        ]).unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://db:27017/?replicaSet=rs0");
        assert_eq!(config.database, "app");
        assert_eq!(config.schedule, "0 30 3 * * *");
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert!(config.purge_on_startup);
        assert!(!config.atomic_batches);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = config_from(&[("PURGE_TIMEZONE", "Mars/Olympus")]).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PURGE_TIMEZONE", .. }));
    }

    #[test]
    fn rejects_non_boolean_flag() {
        let err = config_from(&[("PURGE_ON_STARTUP", "sometimes")]).unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "PURGE_ON_STARTUP", .. }));
    }
}
