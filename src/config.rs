//! Configuration loader — merges defaults, config.toml, and env vars.

use std::path::Path;

use common::config::AppConfig;
use common::{Error, Result};

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &AppConfig) -> Result<()> {
    let mut issues: Vec<String> = Vec::new();

    if config.service_key.trim().is_empty() {
        issues.push("service_key is required (DATA_GO_KR_SERVICE_KEY or config.toml)".into());
    }
    if config.api.forecast_url.trim().is_empty() {
        issues.push("api.forecast_url must not be empty".into());
    }
    if config.api.air_quality_url.trim().is_empty() {
        issues.push("api.air_quality_url must not be empty".into());
    }
    if config.api.timeout_secs == 0 {
        issues.push("api.timeout_secs must be > 0".into());
    }
    if config.api.forecast_rows == 0 {
        issues.push("api.forecast_rows must be > 0".into());
    }
    if config.api.air_quality_rows == 0 {
        issues.push("api.air_quality_rows must be > 0".into());
    }
    if config.timing.refresh_interval_secs == 0 {
        issues.push("timing.refresh_interval_secs must be > 0".into());
    }
    if config.timing.heartbeat_interval_secs == 0 {
        issues.push("timing.heartbeat_interval_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig> {
    // 1. Load .env from the working directory or parents.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Overlay config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {e}")))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {e}")))?;
    }

    // 4. Environment variables take highest priority.
    if let Ok(key) = std::env::var("DATA_GO_KR_SERVICE_KEY") {
        config.service_key = key;
    }
    if let Ok(url) = std::env::var("PHOTOCAST_FORECAST_URL") {
        config.api.forecast_url = url;
    }
    if let Ok(url) = std::env::var("PHOTOCAST_AIR_QUALITY_URL") {
        config.api.air_quality_url = url;
    }
    if let Ok(raw) = std::env::var("PHOTOCAST_TIMEOUT_SECS") {
        config.api.timeout_secs = parse_positive_u64(&raw, "PHOTOCAST_TIMEOUT_SECS")?;
    }
    if let Ok(raw) = std::env::var("PHOTOCAST_REFRESH_SECS") {
        config.timing.refresh_interval_secs = parse_positive_u64(&raw, "PHOTOCAST_REFRESH_SECS")?;
    }
    if let Ok(raw) = std::env::var("PHOTOCAST_HEARTBEAT_SECS") {
        config.timing.heartbeat_interval_secs =
            parse_positive_u64(&raw, "PHOTOCAST_HEARTBEAT_SECS")?;
    }

    // 5. Validate the merged result.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.service_key = "some-key".into();
        config
    }

    #[test]
    fn defaults_with_a_service_key_validate() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn missing_service_key_is_rejected() {
        let config = AppConfig::default();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("service_key"));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let mut config = valid_config();
        config.timing.refresh_interval_secs = 0;
        config.api.timeout_secs = 0;
        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("refresh_interval_secs"));
        assert!(message.contains("timeout_secs"));
    }

    #[test]
    fn positive_parser_rejects_zero_and_junk() {
        assert!(parse_positive_u64("0", "X").is_err());
        assert!(parse_positive_u64("ten", "X").is_err());
        assert_eq!(parse_positive_u64(" 300 ", "X").unwrap(), 300);
    }
}
