//! Configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` builds a [`ServerConfig`] once at startup. The identity backend
//! section is kept as a `Result` so a missing backend degrades the site to
//! "nobody is signed in" instead of refusing to boot.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Variables that must all be present for the identity backend to start.
pub const IDENTITY_VARS: [&str; 6] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_MESSAGING_SENDER_ID",
    "FIREBASE_APP_ID",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("identity backend configuration incomplete (missing: {})", .missing.join(", "))]
    MissingIdentity { missing: Vec<&'static str> },
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

// =============================================================================
// IDENTITY BACKEND
// =============================================================================

/// Identity backend project settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    /// REST base URL, without a trailing slash.
    pub toolkit_url: String,
}

impl IdentityConfig {
    /// Load from the `FIREBASE_*` variables plus optional `IDENTITY_TOOLKIT_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentity`] naming every absent or blank variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values: Vec<Option<String>> = IDENTITY_VARS
            .iter()
            .map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
            .collect();

        let missing: Vec<&'static str> = IDENTITY_VARS
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingIdentity { missing });
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();
        let toolkit_url = lookup("IDENTITY_TOOLKIT_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IDENTITY_TOOLKIT_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            api_key: next(),
            auth_domain: next(),
            project_id: next(),
            storage_bucket: next(),
            messaging_sender_id: next(),
            app_id: next(),
            toolkit_url,
        })
    }
}

// =============================================================================
// SERVER
// =============================================================================

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub website_dir: PathBuf,
    pub cookie_secure: bool,
    /// Raw admin addresses from `ADMIN_EMAILS` and `ADMIN_EMAIL`.
    pub admin_emails: Vec<String>,
    pub identity: Result<IdentityConfig, ConfigError>,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw.clone() })?,
        };

        let website_dir = lookup("WEBSITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("website"));

        let cookie_secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(false);

        let mut admin_emails = split_list(lookup("ADMIN_EMAILS").as_deref());
        admin_emails.extend(split_list(lookup("ADMIN_EMAIL").as_deref()));

        Ok(Self { port, website_dir, cookie_secure, admin_emails, identity: IdentityConfig::from_lookup(&lookup) })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
