use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrafficError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJsonError(#[from] geojson::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("{what} is not loaded")]
    StateUnavailable { what: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl TrafficError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrafficError::ApiError(_) => ErrorCategory::Network,
            TrafficError::CsvError(_)
            | TrafficError::SerializationError(_)
            | TrafficError::GeoJsonError(_)
            | TrafficError::ProcessingError { .. } => ErrorCategory::Data,
            TrafficError::ZipError(_) | TrafficError::IoError(_) => ErrorCategory::Storage,
            TrafficError::ConfigError { .. }
            | TrafficError::InvalidConfigValueError { .. }
            | TrafficError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            TrafficError::StateUnavailable { .. } => ErrorCategory::State,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::State => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrafficError::ApiError(_) => "Check the source URL and your network connection",
            TrafficError::CsvError(_) => {
                "Make sure the trip file has start_station_id, end_station_id, started_at and ended_at columns"
            }
            TrafficError::SerializationError(_) => {
                "Make sure the station catalog is valid JSON and the station path points at an array"
            }
            TrafficError::GeoJsonError(_) => "Make sure the route source is a valid GeoJSON document",
            TrafficError::ZipError(_) | TrafficError::IoError(_) => {
                "Check that the paths exist and the output directory is writable"
            }
            TrafficError::ConfigError { .. }
            | TrafficError::InvalidConfigValueError { .. }
            | TrafficError::ConfigValidationError { .. } => {
                "Review the command-line flags or the TOML configuration file"
            }
            TrafficError::ProcessingError { .. } => "Inspect the input data for malformed rows",
            TrafficError::StateUnavailable { .. } => {
                "An earlier load failed; fix the failing source and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download input data: {}", self),
            ErrorCategory::Data => format!("Input data could not be read: {}", self),
            ErrorCategory::Storage => format!("File operation failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::State => format!("Traffic data unavailable: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrafficError>;
