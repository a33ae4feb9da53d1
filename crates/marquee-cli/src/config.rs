//! Configuration loading and resolution.
//!
//! Each setting resolves as: explicit flag, then environment variable, then
//! the engine default.

use std::time::Duration;

use marquee::{EngineConfig, Throttle};

pub const BASE_URL_ENV: &str = "MARQUEE_BASE_URL";
pub const HOST_ENV: &str = "MARQUEE_HOST";
pub const USER_AGENT_ENV: &str = "MARQUEE_USER_AGENT";

/// A `--header` flag that is not `Name: value`.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Invalid header {0:?}: expected \"Name: value\"")]
pub struct HeaderParseError(pub String);

/// Settings collected from the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub user_agent: Option<String>,
    pub headers: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub min_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

/// Resolve one setting from flag, then the named environment variable.
pub fn resolve(explicit: Option<&str>, env_key: &str) -> Option<String> {
    pick(explicit, std::env::var(env_key).ok())
}

fn pick(explicit: Option<&str>, env_value: Option<String>) -> Option<String> {
    if let Some(value) = explicit {
        return Some(value.to_string());
    }
    env_value.filter(|v| !v.trim().is_empty())
}

/// Split `Name: value` into its parts.
pub fn parse_header(raw: &str) -> Result<(String, String), HeaderParseError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| HeaderParseError(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(HeaderParseError(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Build the engine configuration from defaults, environment and flags.
pub fn build_config(overrides: &Overrides) -> Result<EngineConfig, HeaderParseError> {
    let mut config = EngineConfig::default();

    if let Some(base_url) = resolve(overrides.base_url.as_deref(), BASE_URL_ENV) {
        config.base_url = base_url;
    }
    if let Some(host) = resolve(overrides.host.as_deref(), HOST_ENV) {
        config.host = host;
    }
    if let Some(ua) = resolve(overrides.user_agent.as_deref(), USER_AGENT_ENV) {
        config.headers.insert("User-Agent".to_string(), ua);
    }
    apply_flags(&mut config, overrides)?;
    Ok(config)
}

fn apply_flags(config: &mut EngineConfig, overrides: &Overrides) -> Result<(), HeaderParseError> {
    for raw in &overrides.headers {
        let (name, value) = parse_header(raw)?;
        // Header names are case-insensitive; drop any default spelled differently.
        config.headers.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        config.headers.insert(name, value);
    }
    if let Some(secs) = overrides.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(concurrency) = overrides.concurrency {
        config.concurrency = concurrency;
    }

    let min = overrides
        .min_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(config.throttle.min);
    let max = overrides
        .max_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(config.throttle.max);
    config.throttle = Throttle::new(min, max.max(min));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_prefers_explicit() {
        assert_eq!(
            pick(Some("flag"), Some("env".to_string())).as_deref(),
            Some("flag")
        );
        assert_eq!(pick(None, Some("env".to_string())).as_deref(), Some("env"));
        assert_eq!(pick(None, Some("  ".to_string())), None);
        assert_eq!(pick(None, None), None);
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept-Language: de-DE").unwrap(),
            ("Accept-Language".to_string(), "de-DE".to_string())
        );
        assert_eq!(
            parse_header("X-Url: http://a:b").unwrap(),
            ("X-Url".to_string(), "http://a:b".to_string())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let mut config = EngineConfig::default();
        let overrides = Overrides {
            headers: vec!["user-agent: custom/1.0".to_string()],
            timeout_secs: Some(3),
            concurrency: Some(4),
            min_delay_ms: Some(0),
            max_delay_ms: Some(0),
            ..Default::default()
        };
        apply_flags(&mut config, &overrides).unwrap();

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.throttle, Throttle::none());
        assert_eq!(
            config.headers.get("user-agent").map(String::as_str),
            Some("custom/1.0")
        );
        assert!(!config.headers.contains_key("User-Agent"));
    }

    #[test]
    fn test_max_delay_never_below_min() {
        let mut config = EngineConfig::default();
        let overrides = Overrides {
            min_delay_ms: Some(5000),
            ..Default::default()
        };
        apply_flags(&mut config, &overrides).unwrap();
        assert_eq!(config.throttle.min, Duration::from_millis(5000));
        assert_eq!(config.throttle.max, Duration::from_millis(5000));
    }

    #[test]
    fn test_defaults_untouched_without_flags() {
        let mut config = EngineConfig::default();
        apply_flags(&mut config, &Overrides::default()).unwrap();
        assert_eq!(config.throttle, Throttle::default());
        assert_eq!(config.concurrency, 15);
    }
}
