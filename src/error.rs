use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Invalid directive value: {0}")]
    InvalidDirectiveValue(String),

    #[error("Invalid report URI: {0}")]
    InvalidReportUri(String),

    #[error("Invalid route pattern: {0}")]
    InvalidRoutePattern(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Header processing error: {0}")]
    HeaderError(String),

    #[error("Policy validation error: {0}")]
    ValidationError(String),

    #[error("Report processing error: {0}")]
    ReportError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDirectiveValue(_)
            | Self::InvalidReportUri(_)
            | Self::InvalidRoutePattern(_)
            | Self::ValidationError(_)
            | Self::ReportError(_)
            | Self::ConfigError(_) => StatusCode::BAD_REQUEST,

            Self::SerializationError(_) | Self::HeaderError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<serde_json::Error> for CspError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
