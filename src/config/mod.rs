pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DashError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
use crate::utils::validation::{
    validate_data_source, validate_non_empty_string, validate_one_of, validate_range,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_SOURCE: &str = "public/data/seo-data.json";
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];

/// 所有設定來源共用的檢查
pub fn validate_provider(config: &dyn ConfigProvider) -> Result<()> {
    if config.data_source().trim().is_empty() {
        return Err(DashError::MissingConfigError {
            field: "data_source".to_string(),
        });
    }
    validate_data_source("data_source", config.data_source())?;
    validate_non_empty_string("default_domain", config.default_domain())?;
    validate_range("frame_interval_ms", config.frame_interval_ms(), 1, 1000)?;
    validate_one_of("output_format", config.output_format(), &OUTPUT_FORMATS)?;
    if let Some(path) = config.output_path() {
        crate::utils::validation::validate_path("output_path", path)?;
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "seo-dashboard")]
#[command(about = "Animated SEO metrics dashboard for a single domain")]
pub struct CliConfig {
    /// Dataset location: http(s) URL or local JSON file
    #[arg(long = "data", default_value = DEFAULT_DATA_SOURCE)]
    pub data_source: String,

    /// Domain shown when no site parameter is given
    #[arg(long = "domain", default_value = crate::core::dashboard::DEFAULT_DOMAIN)]
    pub default_domain: String,

    /// Site to show (URL or bare host)
    #[arg(long)]
    pub site: Option<String>,

    /// Full page URL; its `site` query parameter selects the domain
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FRAME_INTERVAL_MS)]
    pub frame_interval_ms: u64,

    /// Output format: text or json
    #[arg(long = "format", default_value = "text")]
    pub output_format: String,

    /// Also write the final report to this file
    #[arg(long = "output")]
    pub output_path: Option<String>,

    /// Print a progress line on every frame
    #[arg(long)]
    pub live: bool,

    /// Load settings from a TOML file instead of flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log frame and memory statistics")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn data_source(&self) -> &str {
        &self.data_source
    }

    fn default_domain(&self) -> &str {
        &self.default_domain
    }

    fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn output_format(&self) -> &str {
        &self.output_format
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["seo-dashboard"]);
        assert_eq!(config.data_source(), DEFAULT_DATA_SOURCE);
        assert_eq!(config.default_domain(), "example.com");
        assert_eq!(config.frame_interval_ms(), 16);
        assert_eq!(config.output_format(), "text");
        assert!(config.site().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags_and_validation() {
        let config = CliConfig::parse_from([
            "seo-dashboard",
            "--data",
            "https://cdn.example.com/data/seo-data.json",
            "--site",
            "www.example.com",
            "--format",
            "json",
            "--frame-interval-ms",
            "8",
        ]);
        assert_eq!(config.site(), Some("www.example.com"));
        assert!(config.validate().is_ok());

        let bad = CliConfig::parse_from(["seo-dashboard", "--format", "xml"]);
        assert!(bad.validate().is_err());

        let bad_interval = CliConfig::parse_from(["seo-dashboard", "--frame-interval-ms", "0"]);
        assert!(bad_interval.validate().is_err());
    }
}
