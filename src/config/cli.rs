use crate::config::{FallbackMode, LogFormat, ServiceConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "users-fallback")]
#[command(about = "Serves /v1/users from an upstream API, falling back to a known-good resource")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub primary_path: Option<String>,

    #[arg(long)]
    pub fallback_path: Option<String>,

    #[arg(long, value_enum)]
    pub fallback_mode: Option<FallbackMode>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// Loads the configuration file (or defaults) and applies command line overrides.
    pub fn load_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.upstream.base_url = base_url.clone();
        }
        if let Some(primary_path) = &self.primary_path {
            config.upstream.primary_path = primary_path.clone();
        }
        if let Some(fallback_path) = &self.fallback_path {
            config.upstream.fallback_path = fallback_path.clone();
        }
        if let Some(mode) = self.fallback_mode {
            config.fallback.mode = mode;
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FallbackPolicy;

    #[test]
    fn test_overrides_replace_file_values() {
        let args = CliArgs::parse_from([
            "users-fallback",
            "--bind",
            "0.0.0.0:3000",
            "--primary-path",
            "/users",
            "--fallback-path",
            "/people",
            "--fallback-mode",
            "any-failure",
            "--log-json",
        ]);

        let config = args.load_config().unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.upstream.primary_path, "/users");
        assert_eq!(config.upstream.fallback_path, "/people");
        assert_eq!(config.fallback.policy(), FallbackPolicy::AnyFailure);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let args = CliArgs::parse_from(["users-fallback"]);
        let config = args.load_config().unwrap();

        assert_eq!(config.upstream.primary_path, "/userss");
        assert!(!config.logging.verbose);
    }
}
