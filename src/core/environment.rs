use crate::constants::{ENV_NODE, ENV_VERCEL};
use crate::error::CspError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Deployment environment a policy is derived for.
///
/// Exactly one variant is selected per process. Anything that is neither a
/// preview deployment nor a production build is treated as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Preview,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Preview,
        Environment::Production,
    ];

    /// Classifies the hosting platform's variables. Comparisons are exact,
    /// and a preview deployment wins over a production build.
    pub fn from_vars(vercel_env: Option<&str>, node_env: Option<&str>) -> Self {
        if vercel_env == Some("preview") {
            Environment::Preview
        } else if node_env == Some("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let vercel_env = lookup(ENV_VERCEL);
        let node_env = lookup(ENV_NODE);
        Self::from_vars(vercel_env.as_deref(), node_env.as_deref())
    }

    /// Reads `VERCEL_ENV` and `NODE_ENV` from the process environment.
    pub fn detect() -> Self {
        let environment = Self::detect_with(|key| std::env::var(key).ok());
        log::debug!("Detected deployment environment: {}", environment);
        environment
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Preview => "preview",
            Environment::Production => "production",
        }
    }

    #[inline]
    pub const fn is_preview(&self) -> bool {
        matches!(self, Environment::Preview)
    }

    #[inline]
    pub const fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    #[inline]
    pub const fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "preview" => Ok(Environment::Preview),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(CspError::ConfigError(format!(
                "Unknown environment '{}', expected development, preview or production",
                other
            ))),
        }
    }
}
