//! Configuration management
//!
//! Settings are stored in the `app_settings` table. Environment variables
//! take precedence over stored values, and every setting has a default.

use anyhow::{bail, Result};
use std::env;

use crate::db::Database;

pub const SETTING_AI_API_KEY: &str = "ai_api_key";
pub const SETTING_AI_API_URL: &str = "ai_api_url";
pub const SETTING_AI_API_ENDPOINT: &str = "ai_api_endpoint";
pub const SETTING_AI_MODEL: &str = "ai_model";
pub const SETTING_REGISTRY_URL: &str = "registry_url";
pub const SETTING_POSTAL_URL: &str = "postal_url";
pub const SETTING_GEOCODER_URL: &str = "geocoder_url";

pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com";
pub const DEFAULT_AI_API_ENDPOINT: &str = "/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REGISTRY_URL: &str = "https://brasilapi.com.br";
pub const DEFAULT_POSTAL_URL: &str = "https://viacep.com.br";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// A configurable value: its settings key, overriding environment variable,
/// and default.
#[derive(Debug, Clone, Copy)]
pub struct SettingSpec {
    pub key: &'static str,
    pub env: &'static str,
    pub default: Option<&'static str>,
    /// Masked when shown.
    pub secret: bool,
}

pub static SETTINGS: [SettingSpec; 7] = [
    SettingSpec {
        key: SETTING_AI_API_KEY,
        env: "AI_API_KEY",
        default: None,
        secret: true,
    },
    SettingSpec {
        key: SETTING_AI_API_URL,
        env: "AI_API_URL",
        default: Some(DEFAULT_AI_API_URL),
        secret: false,
    },
    SettingSpec {
        key: SETTING_AI_API_ENDPOINT,
        env: "AI_API_ENDPOINT",
        default: Some(DEFAULT_AI_API_ENDPOINT),
        secret: false,
    },
    SettingSpec {
        key: SETTING_AI_MODEL,
        env: "AI_MODEL",
        default: Some(DEFAULT_AI_MODEL),
        secret: false,
    },
    SettingSpec {
        key: SETTING_REGISTRY_URL,
        env: "PARTNERHUB_REGISTRY_URL",
        default: Some(DEFAULT_REGISTRY_URL),
        secret: false,
    },
    SettingSpec {
        key: SETTING_POSTAL_URL,
        env: "PARTNERHUB_POSTAL_URL",
        default: Some(DEFAULT_POSTAL_URL),
        secret: false,
    },
    SettingSpec {
        key: SETTING_GEOCODER_URL,
        env: "PARTNERHUB_GEOCODER_URL",
        default: Some(DEFAULT_GEOCODER_URL),
        secret: false,
    },
];

pub fn setting_spec(key: &str) -> Option<&'static SettingSpec> {
    SETTINGS.iter().find(|s| s.key == key)
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Env,
    Stored,
    Default,
    Unset,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Stored => "stored",
            Self::Default => "default",
            Self::Unset => "unset",
        }
    }
}

/// Settings for the AI summary provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub api_endpoint: Option<String>,
    pub model: Option<String>,
}

impl AiConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn effective_api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_AI_API_URL)
    }

    pub fn effective_api_endpoint(&self) -> &str {
        self.api_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_AI_API_ENDPOINT)
    }

    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_AI_MODEL)
    }
}

/// Base URLs of the lookup services
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub registry_url: String,
    pub postal_url: String,
    pub geocoder_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            postal_url: DEFAULT_POSTAL_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub ai: AiConfig,
    pub lookup: LookupConfig,
}

impl Config {
    /// Load configuration from environment variables and database settings.
    /// Environment variables take precedence over database settings.
    pub fn load(db: &Database) -> Result<Self> {
        Self::load_with(db, |name| env::var(name).ok())
    }

    fn load_with(db: &Database, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let explicit = |key: &str| -> Result<Option<String>> {
            Ok(resolve(db, key, &env)?
                .filter(|(_, source)| *source != Source::Default)
                .map(|(v, _)| v))
        };
        let with_default = |key: &str, default: &str| -> Result<String> {
            Ok(resolve(db, key, &env)?
                .map(|(v, _)| v)
                .unwrap_or_else(|| default.to_string()))
        };

        Ok(Self {
            ai: AiConfig {
                api_key: explicit(SETTING_AI_API_KEY)?,
                api_url: explicit(SETTING_AI_API_URL)?,
                api_endpoint: explicit(SETTING_AI_API_ENDPOINT)?,
                model: explicit(SETTING_AI_MODEL)?,
            },
            lookup: LookupConfig {
                registry_url: with_default(SETTING_REGISTRY_URL, DEFAULT_REGISTRY_URL)?,
                postal_url: with_default(SETTING_POSTAL_URL, DEFAULT_POSTAL_URL)?,
                geocoder_url: with_default(SETTING_GEOCODER_URL, DEFAULT_GEOCODER_URL)?,
            },
        })
    }

    /// Store a setting. Unknown keys are rejected.
    pub fn set(db: &Database, key: &str, value: &str) -> Result<()> {
        if setting_spec(key).is_none() {
            bail!(
                "Unknown setting '{}'. Known settings: {}",
                key,
                known_keys().join(", ")
            );
        }
        let value = value.trim();
        if value.is_empty() {
            db.delete_setting(key)?;
        } else {
            db.set_setting(key, value)?;
        }
        Ok(())
    }

    /// Every setting with its resolved value and origin.
    pub fn describe(db: &Database) -> Result<Vec<(&'static SettingSpec, Option<String>, Source)>> {
        Self::describe_with(db, |name| env::var(name).ok())
    }

    fn describe_with(
        db: &Database,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Vec<(&'static SettingSpec, Option<String>, Source)>> {
        SETTINGS
            .iter()
            .map(|spec| {
                Ok(match resolve(db, spec.key, &env)? {
                    Some((value, source)) => (spec, Some(value), source),
                    None => (spec, None, Source::Unset),
                })
            })
            .collect()
    }

    /// Clear all stored configuration from the database
    pub fn clear(db: &Database) -> Result<()> {
        for spec in &SETTINGS {
            db.delete_setting(spec.key)?;
        }
        Ok(())
    }
}

pub fn known_keys() -> Vec<&'static str> {
    SETTINGS.iter().map(|s| s.key).collect()
}

/// Show only the last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn resolve(
    db: &Database,
    key: &str,
    env: &impl Fn(&str) -> Option<String>,
) -> Result<Option<(String, Source)>> {
    let Some(spec) = setting_spec(key) else {
        bail!("Unknown setting '{}'", key);
    };

    if let Some(value) = env(spec.env).filter(|v| !v.trim().is_empty()) {
        return Ok(Some((value, Source::Env)));
    }
    if let Some(value) = db.get_setting(key)? {
        return Ok(Some((value, Source::Stored)));
    }
    Ok(spec.default.map(|d| (d.to_string(), Source::Default)))
}
