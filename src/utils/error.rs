use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

pub const INVALID_INPUT_MESSAGE: &str = "Invalid or empty input file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MonitorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::HttpError(_) => ErrorCategory::Network,
            MonitorError::IoError(_) => ErrorCategory::Io,
            MonitorError::SerializationError(_) | MonitorError::InvalidInput { .. } => {
                ErrorCategory::Input
            }
            MonitorError::ConfigError { .. }
            | MonitorError::MissingConfigError { .. }
            | MonitorError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            MonitorError::HttpError(_) => ErrorSeverity::Medium,
            MonitorError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MonitorError::HttpError(e) => format!("Could not set up the HTTP client: {}", e),
            MonitorError::IoError(e) => format!("File system error: {}", e),
            MonitorError::SerializationError(e) => format!("Could not write the report: {}", e),
            MonitorError::InvalidInput { .. } => INVALID_INPUT_MESSAGE.to_string(),
            MonitorError::ConfigError { message } => message.clone(),
            MonitorError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            MonitorError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Setting '{}' has an invalid value '{}': {}", field, value, reason),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the INTERVAL environment variable"
            }
            ErrorCategory::Input => {
                "Provide a YAML or JSON file containing a non-empty list of endpoints \
                 with a url field"
            }
            ErrorCategory::Network => "Check the TLS and network setup of this machine",
            ErrorCategory::Io => "Make sure the file exists and is readable",
        }
    }

    /// Lines printed when the endpoint list cannot be loaded at startup.
    pub fn startup_diagnostic(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self {
            MonitorError::InvalidInput { .. } => {}
            MonitorError::IoError(e) => {
                lines.push(format!("Error when reading the input file: {}", e));
            }
            other => lines.push(format!("Error when reading the input file: {}", other)),
        }
        lines.push(INVALID_INPUT_MESSAGE.to_string());
        lines
    }

    /// 依嚴重程度決定程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
