use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::report::RenderError;
use crate::statistics::{CurrencyTableError, StatisticsError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Load(LoadError),
    Currency(CurrencyTableError),
    Statistics(StatisticsError),
    Render(RenderError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Load(err) => write!(f, "load error: {}", err),
            AppError::Currency(err) => write!(f, "currency table error: {}", err),
            AppError::Statistics(err) => write!(f, "statistics error: {}", err),
            AppError::Render(err) => write!(f, "report error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Load(err) => Some(err),
            AppError::Currency(err) => Some(err),
            AppError::Statistics(err) => Some(err),
            AppError::Render(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Load(_) => StatusCode::BAD_REQUEST,
            AppError::Statistics(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Currency(_)
            | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<LoadError> for AppError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<CurrencyTableError> for AppError {
    fn from(value: CurrencyTableError) -> Self {
        Self::Currency(value)
    }
}

impl From<StatisticsError> for AppError {
    fn from(value: StatisticsError) -> Self {
        Self::Statistics(value)
    }
}

impl From<RenderError> for AppError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        let load = AppError::from(LoadError::Io(std::io::Error::other("truncated")));
        assert_eq!(load.status_code(), StatusCode::BAD_REQUEST);

        let statistics = AppError::from(StatisticsError::EmptyInput);
        assert_eq!(statistics.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let currency = AppError::from(CurrencyTableError::DuplicateCode("USD".to_string()));
        assert_eq!(currency.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn wraps_source_message() {
        let error = AppError::from(StatisticsError::EmptyInput);
        assert_eq!(
            error.to_string(),
            "statistics error: no vacancy records were supplied"
        );
    }
}
