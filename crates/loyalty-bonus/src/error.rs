use crate::bonus::{BonusError, RuleConfigError};
use crate::config::ConfigError;
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
    Rules(RuleConfigError),
    Bonus(BonusError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Rules(err) => write!(f, "rule set error: {}", err),
            AppError::Bonus(err) => write!(f, "bonus error: {}", err),
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
            AppError::Rules(err) => Some(err),
            AppError::Bonus(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Bonus(BonusError::InvalidTimestamp { .. }) => StatusCode::BAD_REQUEST,
            AppError::Bonus(BonusError::Overflow { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Bonus(BonusError::Config(_))
            | AppError::Rules(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

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

impl From<RuleConfigError> for AppError {
    fn from(value: RuleConfigError) -> Self {
        Self::Rules(value)
    }
}

impl From<BonusError> for AppError {
    fn from(value: BonusError) -> Self {
        Self::Bonus(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_errors_map_to_bad_request() {
        let err = AppError::from(BonusError::InvalidTimestamp {
            value: "not-a-date".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn overflowing_bonuses_map_to_unprocessable_entity() {
        let err = AppError::from(BonusError::Overflow {
            step: "VIP x1.5".to_string(),
        });
        assert!(err.to_string().contains("VIP x1.5"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn rule_errors_map_to_internal_error() {
        let from_bonus = AppError::from(BonusError::Config(RuleConfigError::Unavailable(
            "offline".to_string(),
        )));
        assert_eq!(
            from_bonus.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let direct = AppError::from(RuleConfigError::Unavailable("offline".to_string()));
        assert!(direct.to_string().contains("offline"));
        assert_eq!(
            direct.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
