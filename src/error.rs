use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for Tripcast
#[derive(Debug, thiserror::Error)]
pub enum TripcastError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(String),
}

/// JSON body returned to clients for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    error_id: String,
}

impl TripcastError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Convert the error into an HTTP response.
    ///
    /// # Security
    ///
    /// Server-side failures (configuration, internal, upstream, database) only
    /// expose their details when `dev_mode` is `true`. The full message is
    /// always logged together with the generated error id.
    pub fn into_response_with_dev_mode(self, dev_mode: bool) -> Response {
        let status = self.status_code();

        let error_msg = if dev_mode {
            self.to_string()
        } else {
            self.safe_message()
        };

        let error_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            status = status.as_u16(),
            error_id = %error_id,
            error = %self,
            "Request failed"
        );

        let body = Json(ErrorResponse {
            error: error_msg,
            error_id,
        });

        (status, body).into_response()
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Configuration(_) | Self::Internal(_) | Self::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            #[cfg(feature = "database")]
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Client-facing message for production responses.
    ///
    /// 4xx messages are passed through; 5xx messages are replaced with a
    /// generic description.
    fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::Forbidden(msg) => format!("Forbidden: {}", msg),
            Self::TooManyRequests(msg) => format!("Too many requests: {}", msg),
            Self::RequestTimeout => "Request timeout".to_string(),

            Self::Configuration(_) | Self::Internal(_) | Self::Anyhow(_) => {
                "Internal server error".to_string()
            }
            Self::ServiceUnavailable(_) => "Service unavailable".to_string(),

            #[cfg(feature = "database")]
            Self::Database(_) => "Database error".to_string(),
        }
    }
}

impl IntoResponse for TripcastError {
    fn into_response(self) -> Response {
        self.into_response_with_dev_mode(false)
    }
}

/// Result type alias for Tripcast operations
pub type Result<T> = std::result::Result<T, TripcastError>;

impl From<serde_json::Error> for TripcastError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            TripcastError::BadRequest(format!("JSON error: {}", err))
        } else {
            TripcastError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

impl From<reqwest::Error> for TripcastError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TripcastError::RequestTimeout
        } else if err.is_connect() {
            TripcastError::ServiceUnavailable(format!("Connection error: {}", err))
        } else if err.is_status() {
            match err.status().map(|s| s.as_u16()) {
                Some(401) | Some(403) => {
                    TripcastError::Configuration("Affiliate partner rejected credentials".to_string())
                }
                Some(404) => TripcastError::NotFound("Upstream resource not found".to_string()),
                Some(429) => {
                    TripcastError::TooManyRequests("Upstream rate limit exceeded".to_string())
                }
                Some(503) => {
                    TripcastError::ServiceUnavailable("Upstream service unavailable".to_string())
                }
                _ => TripcastError::Internal(format!("Upstream error: {}", err)),
            }
        } else {
            TripcastError::Internal(format!("Request error: {}", err))
        }
    }
}

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for TripcastError {
    fn from(err: sea_orm::DbErr) -> Self {
        match &err {
            sea_orm::DbErr::RecordNotFound(msg) => TripcastError::NotFound(if msg.is_empty() {
                "Record not found".to_string()
            } else {
                msg.clone()
            }),
            sea_orm::DbErr::Query(inner) => TripcastError::Database(format!("Query error: {}", inner)),
            sea_orm::DbErr::Conn(inner) => {
                TripcastError::Database(format!("Connection error: {}", inner))
            }
            _ => TripcastError::Database(format!("Database error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = TripcastError::not_found("User not found");
        assert!(matches!(err, TripcastError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: User not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_forbidden_error() {
        let err = TripcastError::forbidden("Trip limit reached");
        assert_eq!(err.to_string(), "Forbidden: Trip limit reached");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_configuration_error_is_server_side() {
        let err = TripcastError::configuration("missing affiliate token");
        assert_eq!(err.to_string(), "Configuration error: missing affiliate token");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.safe_message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = TripcastError::bad_request("unknown source type");
        assert_eq!(err.safe_message(), "Bad request: unknown source type");

        let err = TripcastError::RequestTimeout;
        assert_eq!(err.safe_message(), "Request timeout");
    }

    #[test]
    fn test_service_unavailable_hides_details() {
        let err = TripcastError::service_unavailable("travelpayouts down");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.safe_message(), "Service unavailable");
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_db_err_conversion() {
        use sea_orm::{DbErr, RuntimeErr};

        let err: TripcastError = DbErr::RecordNotFound("trip t1".to_string()).into();
        assert!(matches!(err, TripcastError::NotFound(ref msg) if msg == "trip t1"));

        let err: TripcastError = DbErr::RecordNotFound(String::new()).into();
        assert_eq!(err.to_string(), "Not found: Record not found");

        let err: TripcastError =
            DbErr::Query(RuntimeErr::Internal("no such table: trips".to_string())).into();
        assert!(matches!(err, TripcastError::Database(ref msg) if msg.starts_with("Query error")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.safe_message(), "Database error");

        let err: TripcastError = DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, TripcastError::Database(_)));
    }

    #[test]
    fn test_anyhow_error() {
        let err: TripcastError = anyhow::anyhow!("Something unexpected").into();
        assert!(matches!(err, TripcastError::Anyhow(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            error: "Not found: account".to_string(),
            error_id: "id-123".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Not found: account\""));
        assert!(json.contains("\"error_id\":\"id-123\""));
    }

    #[test]
    fn test_into_response_status() {
        let response = TripcastError::forbidden("limit").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = TripcastError::internal("boom").into_response_with_dev_mode(true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_serde_json_syntax_error() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ invalid json }");
        let err: TripcastError = result.unwrap_err().into();

        assert!(matches!(err, TripcastError::BadRequest(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_database_error_status_code() {
        let err = TripcastError::Database("Connection failed".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
