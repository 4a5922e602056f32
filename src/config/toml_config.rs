use crate::config::{
    validate_provider, DEFAULT_OUTPUT_PATH, DEFAULT_STATIONS_SOURCE, DEFAULT_TIMEOUT_SECONDS,
    DEFAULT_TRIPS_SOURCE,
};
use crate::core::catalog::DEFAULT_STATION_PATH;
use crate::core::time_filter::ANY_TIME;
use crate::core::{ConfigProvider, RouteSource};
use crate::utils::error::{Result, TrafficError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_stations")]
    pub stations: String,
    #[serde(default = "default_trips")]
    pub trips: String,
    #[serde(default = "default_station_path")]
    pub station_path: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub routes: Vec<RouteSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_times")]
    pub times: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_formats")]
    pub output_formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    /// `compact` (default) or `json`
    pub log_format: Option<String>,
}

fn default_stations() -> String {
    DEFAULT_STATIONS_SOURCE.to_string()
}

fn default_trips() -> String {
    DEFAULT_TRIPS_SOURCE.to_string()
}

fn default_station_path() -> String {
    DEFAULT_STATION_PATH.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_times() -> Vec<i32> {
    vec![ANY_TIME]
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string()]
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            stations: default_stations(),
            trips: default_trips(),
            station_path: default_station_path(),
            timeout_seconds: default_timeout(),
            routes: Vec::new(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            times: default_times(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_formats(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrafficError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRIPS_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrafficError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> &str {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .unwrap_or("compact")
    }
}

impl ConfigProvider for TomlConfig {
    fn stations_source(&self) -> &str {
        &self.sources.stations
    }

    fn trips_source(&self) -> &str {
        &self.sources.trips
    }

    fn station_path(&self) -> &str {
        &self.sources.station_path
    }

    fn route_sources(&self) -> &[RouteSource] {
        &self.sources.routes
    }

    fn time_selections(&self) -> &[i32] {
        &self.filter.times
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.sources.timeout_seconds
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            if format != "compact" && format != "json" {
                return Err(TrafficError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "bluebikes"
description = "Boston and Cambridge station traffic"
version = "1.0.0"

[sources]
stations = "https://gbfs.example.com/station_information.json"
trips = "assets/bluebikes_traffic.csv"
timeout_seconds = 10

[[sources.routes]]
id = "cambridge_bike_lanes"
location = "assets/cambridge_route.geojson"

[filter]
times = [-1, 480, 1020]

[load]
output_path = "./traffic"
output_formats = ["json"]

[monitoring]
enabled = true
log_format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "bluebikes");
        assert_eq!(
            config.stations_source(),
            "https://gbfs.example.com/station_information.json"
        );
        assert_eq!(config.station_path(), "/data/stations");
        assert_eq!(config.route_sources().len(), 1);
        assert_eq!(config.time_selections(), &[-1, 480, 1020]);
        assert_eq!(config.request_timeout_seconds(), 10);
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_format(), "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[pipeline]
name = "minimal"
version = "0.1"
"#,
        )
        .unwrap();

        assert_eq!(config.trips_source(), "assets/bluebikes_traffic.csv");
        assert_eq!(config.time_selections(), &[-1]);
        assert_eq!(config.output_path(), "./output");
        assert!(!config.monitoring_enabled());
        assert_eq!(config.log_format(), "compact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_BLUEBIKES_TRIPS", "https://data.example.com/trips.csv");

        let toml_content = r#"
[pipeline]
name = "env"
version = "1.0"

[sources]
trips = "${TEST_BLUEBIKES_TRIPS}"
stations = "${TEST_BLUEBIKES_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.trips_source(), "https://data.example.com/trips.csv");
        assert_eq!(config.stations_source(), "${TEST_BLUEBIKES_UNSET_VAR}");

        std::env::remove_var("TEST_BLUEBIKES_TRIPS");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "bad"
version = "1.0"

[filter]
times = [480, 2000]
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[pipeline]
name = "bad-format"
version = "1.0"

[monitoring]
enabled = false
log_format = "xml"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[pipeline]\nname = \"file-test\"\nversion = \"1.0\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[pipeline\nname=").unwrap_err();
        assert!(matches!(err, TrafficError::ConfigValidationError { .. }));
    }
}
