#[cfg(feature = "cli")]
pub mod cli;

use crate::core::fallback::FallbackSettings;
use crate::core::{FallbackPolicy, StatusRange};
use crate::utils::error::{Result, UsersError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub fallback: FallbackConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Deliberately misspelled so the demo exercises the fallback.
    pub primary_path: String,
    pub fallback_path: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            primary_path: "/userss".to_string(),
            fallback_path: "/users".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FallbackMode {
    #[default]
    StatusRange,
    AnyFailure,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub mode: FallbackMode,
    pub min_status: u16,
    pub max_status: u16,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        let range = StatusRange::default();
        Self {
            mode: FallbackMode::default(),
            min_status: range.min,
            max_status: range.max,
        }
    }
}

impl FallbackConfig {
    pub fn policy(&self) -> FallbackPolicy {
        match self.mode {
            FallbackMode::StatusRange => {
                FallbackPolicy::StatusRange(StatusRange::new(self.min_status, self.max_status))
            }
            FallbackMode::AnyFailure => FallbackPolicy::AnyFailure,
            FallbackMode::Disabled => FallbackPolicy::Disabled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub verbose: bool,
}

impl ServiceConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(UsersError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| UsersError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USERS_BASE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| UsersError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| UsersError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: format!("Invalid socket address: {}", e),
            })
    }

    pub fn fallback_settings(&self) -> FallbackSettings {
        FallbackSettings {
            base_url: self.upstream.base_url.clone(),
            primary_path: self.upstream.primary_path.clone(),
            fallback_path: self.upstream.fallback_path.clone(),
            policy: self.fallback.policy(),
        }
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        validation::validate_url("upstream.base_url", &self.upstream.base_url)?;
        validation::validate_resource_path("upstream.primary_path", &self.upstream.primary_path)?;
        validation::validate_resource_path(
            "upstream.fallback_path",
            &self.upstream.fallback_path,
        )?;

        if self.upstream.primary_path == self.upstream.fallback_path {
            return Err(UsersError::InvalidConfigValueError {
                field: "upstream.fallback_path".to_string(),
                value: self.upstream.fallback_path.clone(),
                reason: "Fallback path must differ from the primary path".to_string(),
            });
        }

        if self.fallback.mode == FallbackMode::StatusRange {
            validation::validate_range("fallback.min_status", self.fallback.min_status, 100, 599)?;
            validation::validate_range("fallback.max_status", self.fallback.max_status, 100, 599)?;
            validation::validate_ordered(
                "fallback.min_status",
                self.fallback.min_status,
                self.fallback.max_status,
            )?;
        }

        Ok(())
    }
}
