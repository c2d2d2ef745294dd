use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Dataset request to {url} returned HTTP {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::ApiError(_) | DashError::HttpStatusError { .. } => ErrorCategory::Network,
            DashError::SerializationError(_) => ErrorCategory::Data,
            DashError::IoError(_) => ErrorCategory::Io,
            DashError::ConfigError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 資料載入失敗時儀表板仍以預設值呈現
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 是否屬於資料集載入失敗 (網路、HTTP 狀態、解析、檔案讀取)
    pub fn is_data_load(&self) -> bool {
        matches!(
            self,
            DashError::ApiError(_)
                | DashError::HttpStatusError { .. }
                | DashError::SerializationError(_)
                | DashError::IoError(_)
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashError::ApiError(_) => "Could not reach the dataset server".to_string(),
            DashError::HttpStatusError { status, .. } => {
                format!("The dataset server answered with HTTP {}", status)
            }
            DashError::IoError(e) => format!("File access failed: {}", e),
            DashError::SerializationError(_) => "The dataset is not valid JSON".to_string(),
            DashError::ConfigError { message } => format!("Configuration problem: {}", message),
            DashError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            DashError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            DashError::MissingConfigError { field } => {
                format!("Setting '{}' is required", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the dataset URL is reachable, then reload",
            ErrorCategory::Data => "Make sure seo-data.json is a JSON object keyed by domain",
            ErrorCategory::Configuration => "Review the command line flags or the TOML file",
            ErrorCategory::Io => "Check that the path exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
