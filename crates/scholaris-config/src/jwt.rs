//! JWT configuration.
//!
//! Built once at startup and handed to the token codec. Verification code
//! never reads the environment itself.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: signing secret for access tokens (required)
//! - `JWT_REFRESH_SECRET`: signing secret for refresh tokens (required, must differ)
//! - `JWT_EXPIRES_IN`: access token lifetime (default: `24h`)
//! - `JWT_REFRESH_EXPIRES_IN`: refresh token lifetime (default: `7d`)
//! - `JWT_LEEWAY_SECS`: clock-skew tolerance on expiry checks (default: `0`)

use std::env;
use std::time::Duration;

use crate::ConfigError;
use crate::duration::parse_duration;

/// Fixed `iss` claim for every token this service signs.
pub const TOKEN_ISSUER: &str = "scholaris-api";
/// Fixed `aud` claim for every token this service signs.
pub const TOKEN_AUDIENCE: &str = "scholaris-clients";

const DEFAULT_ACCESS_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_REFRESH_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Longest lifetime accepted for either token kind (ten years).
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry: Duration,
    pub refresh_token_expiry: Duration,
    pub issuer: String,
    pub audience: String,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    /// Builds a config with default lifetimes and the fixed issuer/audience.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            access_token_expiry: DEFAULT_ACCESS_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_EXPIRY,
            issuer: TOKEN_ISSUER.to_string(),
            audience: TOKEN_AUDIENCE.to_string(),
            leeway_secs: 0,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let refresh_secret = lookup("JWT_REFRESH_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_REFRESH_SECRET"))?;

        if access_secret == refresh_secret {
            return Err(ConfigError::SharedSecret);
        }

        let access_token_expiry =
            read_lifetime(&lookup, "JWT_EXPIRES_IN", DEFAULT_ACCESS_EXPIRY)?;
        let refresh_token_expiry =
            read_lifetime(&lookup, "JWT_REFRESH_EXPIRES_IN", DEFAULT_REFRESH_EXPIRY)?;

        let leeway_secs = lookup("JWT_LEEWAY_SECS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Ok(Self {
            access_token_expiry,
            refresh_token_expiry,
            leeway_secs,
            ..Self::new(access_secret, refresh_secret)
        })
    }
}

fn read_lifetime<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let lifetime = parse_duration(&raw).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })?;

    if lifetime > MAX_TOKEN_LIFETIME {
        return Err(ConfigError::Invalid {
            key,
            reason: format!(
                "{}s exceeds the maximum of {}s",
                lifetime.as_secs(),
                MAX_TOKEN_LIFETIME.as_secs()
            ),
        });
    }

    Ok(lifetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "access-secret"),
            ("JWT_REFRESH_SECRET", "refresh-secret"),
        ]))
        .unwrap();

        assert_eq!(config.access_token_expiry, Duration::from_secs(86_400));
        assert_eq!(config.refresh_token_expiry, Duration::from_secs(604_800));
        assert_eq!(config.issuer, TOKEN_ISSUER);
        assert_eq!(config.audience, TOKEN_AUDIENCE);
        assert_eq!(config.leeway_secs, 0);
    }

    #[test]
    fn test_custom_lifetimes() {
        let config = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "access-secret"),
            ("JWT_REFRESH_SECRET", "refresh-secret"),
            ("JWT_EXPIRES_IN", "15m"),
            ("JWT_REFRESH_EXPIRES_IN", "30d"),
        ]))
        .unwrap();

        assert_eq!(config.access_token_expiry, Duration::from_secs(900));
        assert_eq!(config.refresh_token_expiry, Duration::from_secs(30 * 86_400));
    }

    #[test]
    fn test_missing_refresh_secret() {
        let err = JwtConfig::from_vars(vars(&[("JWT_SECRET", "access-secret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_REFRESH_SECRET")));
    }

    #[test]
    fn test_shared_secret_rejected() {
        let err = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "same"),
            ("JWT_REFRESH_SECRET", "same"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::SharedSecret));
    }

    #[test]
    fn test_bad_lifetime() {
        let err = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "a"),
            ("JWT_REFRESH_SECRET", "b"),
            ("JWT_EXPIRES_IN", "forever"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                ..
            }
        ));
    }

    #[test]
    fn test_oversized_lifetime_rejected() {
        for raw in ["100000000000000", "3651d", "99999999999999999w"] {
            let err = JwtConfig::from_vars(vars(&[
                ("JWT_SECRET", "a"),
                ("JWT_REFRESH_SECRET", "b"),
                ("JWT_REFRESH_EXPIRES_IN", raw),
            ]))
            .unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::Invalid {
                        key: "JWT_REFRESH_EXPIRES_IN",
                        ..
                    }
                ),
                "expected {:?} to be rejected",
                raw
            );
        }

        let config = JwtConfig::from_vars(vars(&[
            ("JWT_SECRET", "a"),
            ("JWT_REFRESH_SECRET", "b"),
            ("JWT_EXPIRES_IN", "3650d"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_expiry, MAX_TOKEN_LIFETIME);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = JwtConfig::new("top-secret-access", "top-secret-refresh");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("top-secret"));
    }
}
