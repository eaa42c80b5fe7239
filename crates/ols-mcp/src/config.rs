//! Backend configuration sourced from the environment.

use crate::error::ConfigError;
use std::time::Duration;
use url::Url;

pub const ENV_API_URL: &str = "OLS_API_URL";
pub const ENV_API_TOKEN: &str = "OLS_API_TOKEN";
pub const ENV_TIMEOUT: &str = "OLS_TIMEOUT";
pub const ENV_VERIFY_SSL: &str = "OLS_VERIFY_SSL";

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Where and how to reach the LightSpeed backend.
///
/// Loaded once at startup; immutable afterwards.
#[derive(Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_seconds: f64,
    pub verify_tls: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
        }
    }
}

// Hand-written so the token never lands in logs.
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl BackendConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `OLS_API_URL` is not an absolute http(s) URL or if
    /// `OLS_TIMEOUT` is not a positive number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`BackendConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_base_url(&base_url)?;

        let auth_token = lookup(ENV_API_TOKEN).filter(|t| !t.is_empty());

        let timeout_seconds = match lookup(ENV_TIMEOUT) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let verify_tls = lookup(ENV_VERIFY_SSL).is_none_or(|v| v.trim().eq_ignore_ascii_case("true"));

        Ok(Self {
            base_url,
            auth_token,
            timeout_seconds,
            verify_tls,
        })
    }

    /// The request timeout as a `Duration`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if `timeout_seconds` is not positive or does not
    /// fit in a `Duration`.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        checked_timeout(self.timeout_seconds)
            .ok_or_else(|| ConfigError::InvalidTimeout(self.timeout_seconds.to_string()))
    }

    /// `base_url` with trailing slashes stripped, plus `/v1/query`.
    #[must_use]
    pub fn query_url(&self) -> String {
        format!("{}/v1/query", self.base_url.trim_end_matches('/'))
    }
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if checked_timeout(secs).is_some() => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

// Rejects NaN, non-positive values, and anything too large for a `Duration`.
fn checked_timeout(secs: f64) -> Option<Duration> {
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = BackendConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(cfg, BackendConfig::default());
        assert_eq!(cfg.query_url(), "http://localhost:8080/v1/query");
        assert_eq!(cfg.timeout(), Ok(Duration::from_secs(30)));
    }

    #[test]
    fn reads_every_variable() {
        let cfg = BackendConfig::from_lookup(lookup_from(&[
            (ENV_API_URL, "https://ols.example.com/api///"),
            (ENV_API_TOKEN, "sekrit"),
            (ENV_TIMEOUT, "2.5"),
            (ENV_VERIFY_SSL, "false"),
        ]))
        .expect("config");

        assert_eq!(cfg.query_url(), "https://ols.example.com/api/v1/query");
        assert_eq!(cfg.auth_token.as_deref(), Some("sekrit"));
        assert_eq!(cfg.timeout(), Ok(Duration::from_millis(2500)));
        assert!(!cfg.verify_tls);
    }

    #[test]
    fn verify_ssl_is_case_insensitive_and_strict() {
        for (raw, expected) in [("TRUE", true), ("True", true), ("yes", false), ("1", false)] {
            let cfg = BackendConfig::from_lookup(lookup_from(&[(ENV_VERIFY_SSL, raw)]))
                .expect("config");
            assert_eq!(cfg.verify_tls, expected, "OLS_VERIFY_SSL={raw}");
        }
    }

    #[test]
    fn empty_token_counts_as_unset() {
        let cfg = BackendConfig::from_lookup(lookup_from(&[(ENV_API_TOKEN, "")])).expect("config");
        assert_eq!(cfg.auth_token, None);
    }

    #[test]
    fn rejects_bad_timeout_and_url() {
        for raw in ["abc", "0", "-1", "inf", "NaN", "1e20"] {
            let err = BackendConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT, raw)])).unwrap_err();
            assert_eq!(err, ConfigError::InvalidTimeout(raw.to_string()));
        }

        let err = BackendConfig::from_lookup(lookup_from(&[(ENV_API_URL, "localhost:8080")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }), "{err}");

        let err = BackendConfig::from_lookup(lookup_from(&[(ENV_API_URL, "ftp://ols")]))
            .unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"), "{err}");
    }

    #[test]
    fn out_of_range_timeout_is_an_error_not_a_panic() {
        let cfg = BackendConfig {
            timeout_seconds: 1e20,
            ..BackendConfig::default()
        };
        assert_eq!(
            cfg.timeout(),
            Err(ConfigError::InvalidTimeout(1e20_f64.to_string()))
        );
    }

    #[test]
    fn debug_output_redacts_token() {
        let cfg = BackendConfig {
            auth_token: Some("sekrit".to_string()),
            ..BackendConfig::default()
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("sekrit"));
        assert!(dbg.contains("<redacted>"));
    }
}
