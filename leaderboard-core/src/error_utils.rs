use crate::error::*;
use tracing::{error, info};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl CoreError {
    /// True for failures of the upstream HTTP call: a non-2xx status, an
    /// unparseable body, or a transport error.
    pub fn is_http_error(&self) -> bool {
        matches!(self, CoreError::SocialDataApi(_) | CoreError::Network(_))
    }

    /// True for failures reading or writing a run artifact.
    pub fn is_io_error(&self) -> bool {
        matches!(self, CoreError::Store(_))
    }
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::SocialDataApi(e) => {
                error!("SocialData API error details: {:?}", e);
            }
            CoreError::Store(e) => {
                error!("Artifact store error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::SocialDataApi(e) => e.user_friendly_message(),
            CoreError::Store(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::MalformedRecord { index, .. } => format!(
                "The API returned a post without an id at position {}. The run was aborted.",
                index
            ),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::SocialDataApi(_) => "SOCIALDATA_API".to_string(),
            CoreError::Store(_) => "STORE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::MalformedRecord { .. } => "MALFORMED_RECORD".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
        }
    }
}

impl ErrorExt for SocialDataApiError {
    fn log_error(&self) -> &Self {
        error!("SocialDataApiError: {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            SocialDataApiError::Unauthorized => {
                "The API key was rejected. Please check the API_KEY environment variable."
                    .to_string()
            }
            SocialDataApiError::Forbidden { resource } => format!(
                "Access denied to {}. The API key may not have access to this community.",
                resource
            ),
            SocialDataApiError::NotFound { resource } => {
                format!("'{}' was not found. Please check the community id.", resource)
            }
            SocialDataApiError::RateLimitExceeded { retry_after } => match retry_after {
                Some(seconds) => format!(
                    "Too many requests. Please wait {} seconds before running again.",
                    seconds
                ),
                None => "Too many requests. Please wait before running again.".to_string(),
            },
            SocialDataApiError::RequestTimeout => {
                "Request to the API timed out. Please try again.".to_string()
            }
            SocialDataApiError::InvalidResponse { .. } => {
                "The API returned a response that could not be understood.".to_string()
            }
            _ => "SocialData API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            SocialDataApiError::Unauthorized => "SOCIALDATA_UNAUTHORIZED".to_string(),
            SocialDataApiError::Forbidden { .. } => "SOCIALDATA_FORBIDDEN".to_string(),
            SocialDataApiError::NotFound { .. } => "SOCIALDATA_NOT_FOUND".to_string(),
            SocialDataApiError::RateLimitExceeded { .. } => "SOCIALDATA_RATE_LIMIT".to_string(),
            SocialDataApiError::ServerError { .. } => "SOCIALDATA_SERVER_ERROR".to_string(),
            SocialDataApiError::RequestFailed { .. } => "SOCIALDATA_REQUEST_FAILED".to_string(),
            SocialDataApiError::InvalidResponse { .. } => {
                "SOCIALDATA_INVALID_RESPONSE".to_string()
            }
            SocialDataApiError::RequestTimeout => "SOCIALDATA_TIMEOUT".to_string(),
        }
    }
}

impl ErrorExt for StoreError {
    fn log_error(&self) -> &Self {
        error!("StoreError: {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            StoreError::Read { path, .. } => format!("Could not read {}.", path.display()),
            StoreError::Write { path, .. } => format!(
                "Could not write {}. Please check disk space and permissions.",
                path.display()
            ),
            StoreError::Decode { path, .. } => format!(
                "{} is not valid JSON. It may have been corrupted by an interrupted run.",
                path.display()
            ),
            StoreError::Encode { path, .. } => {
                format!("Could not encode data for {}.", path.display())
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            StoreError::Read { .. } => "STORE_READ_FAILED".to_string(),
            StoreError::Write { .. } => "STORE_WRITE_FAILED".to_string(),
            StoreError::Decode { .. } => "STORE_DECODE_FAILED".to_string(),
            StoreError::Encode { .. } => "STORE_ENCODE_FAILED".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::MissingEnvironmentVariable { var_name } => format!(
                "Environment variable '{}' is required but not set.",
                var_name
            ),
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::Read { path, .. } => format!(
                "Could not read configuration file {}. Please check file permissions.",
                path.display()
            ),
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::MissingEnvironmentVariable { .. } => "CONFIG_MISSING_ENV_VAR".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Read { .. } => "CONFIG_READ_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs a fatal error at the process boundary together with its code and a
/// message an operator can act on.
#[derive(Debug, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
    }
}
