use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration for kasa binaries, loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KasaConfig {
    /// Collateral ratio (percent) a kasa must hold in normal mode (default: 110)
    pub minimum_collateral_ratio: u64,

    /// Collateral ratio (percent) a kasa must hold in recovery mode (default: 150)
    pub critical_collateral_ratio: u64,

    /// Fixed-point decimals carried by the collateral price (default: 0)
    pub price_decimals: u8,

    /// System mode assumed when a snapshot does not state one (default: false)
    pub recovery_mode: bool,

    /// Kasa snapshot evaluated by the keeper (default: kasas.json)
    pub snapshot_path: PathBuf,

    /// Keeper evaluation period in milliseconds (default: 5000)
    pub keeper_interval_ms: u64,
}

impl KasaConfig {
    /// Load configuration from environment variables, reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keeper_interval_ms = parse_or(&lookup, "KASA_KEEPER_INTERVAL_MS", 5_000u64)?;
        if keeper_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "KASA_KEEPER_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            minimum_collateral_ratio: parse_or(&lookup, "KASA_MINIMUM_COLLATERAL_RATIO", 110)?,
            critical_collateral_ratio: parse_or(&lookup, "KASA_CRITICAL_COLLATERAL_RATIO", 150)?,
            price_decimals: parse_or(&lookup, "KASA_PRICE_DECIMALS", 0)?,
            recovery_mode: parse_flag(&lookup, "KASA_RECOVERY_MODE", false)?,
            snapshot_path: lookup("KASA_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("kasas.json")),
            keeper_interval_ms,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<KasaConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        KasaConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.minimum_collateral_ratio, 110);
        assert_eq!(config.critical_collateral_ratio, 150);
        assert_eq!(config.price_decimals, 0);
        assert!(!config.recovery_mode);
        assert_eq!(config.snapshot_path, PathBuf::from("kasas.json"));
        assert_eq!(config.keeper_interval_ms, 5_000);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("KASA_MINIMUM_COLLATERAL_RATIO", "120"),
            ("KASA_CRITICAL_COLLATERAL_RATIO", " 175 "),
            ("KASA_PRICE_DECIMALS", "8"),
            ("KASA_RECOVERY_MODE", "TRUE"),
            ("KASA_SNAPSHOT_PATH", "/var/lib/kasa/snapshot.json"),
            ("KASA_KEEPER_INTERVAL_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.minimum_collateral_ratio, 120);
        assert_eq!(config.critical_collateral_ratio, 175);
        assert_eq!(config.price_decimals, 8);
        assert!(config.recovery_mode);
        assert_eq!(config.snapshot_path, PathBuf::from("/var/lib/kasa/snapshot.json"));
        assert_eq!(config.keeper_interval_ms, 250);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(
            load(&[("KASA_MINIMUM_COLLATERAL_RATIO", "abc")]),
            Err(ConfigError::Invalid {
                key: "KASA_MINIMUM_COLLATERAL_RATIO",
                value: "abc".to_string(),
            })
        );
        assert!(load(&[("KASA_PRICE_DECIMALS", "300")]).is_err());
        assert!(load(&[("KASA_RECOVERY_MODE", "maybe")]).is_err());
        assert!(load(&[("KASA_KEEPER_INTERVAL_MS", "0")]).is_err());
    }
}
