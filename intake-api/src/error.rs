use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use intake_core::{IntakeError, StoreError};
use intake_types::ErrorResponse;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No questions found for questionnaire {0}")]
    NoQuestions(i64),

    #[error("Error loading questionnaire details: {0}")]
    QuestionnaireLoad(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::NoQuestions(_) => "no_questions_found",
            AppError::QuestionnaireLoad(_) => "questionnaire_load_failed",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::AuthenticationFailed => "authentication_failed",
            AppError::Forbidden(_) => "forbidden",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Message shown to clients; internal detail stays in the logs
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::NoQuestions(_) => "No questions found for this questionnaire".to_string(),
            AppError::QuestionnaireLoad(_) => "Error loading questionnaire details".to_string(),
            AppError::InvalidRequest(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message) => message.clone(),
            AppError::AuthenticationFailed => self.to_string(),
            AppError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }

    /// Maps a core failure raised while loading a questionnaire. Lookup
    /// failures get the load-specific message instead of the generic one.
    pub fn loading(error: IntakeError) -> Self {
        match error {
            IntakeError::Store(e) => AppError::QuestionnaireLoad(e.to_string()),
            other => other.into(),
        }
    }
}

impl From<IntakeError> for AppError {
    fn from(error: IntakeError) -> Self {
        match error {
            IntakeError::QuestionnaireNotFound(id) => {
                AppError::NotFound(format!("Questionnaire {}", id))
            }
            IntakeError::NoQuestions(id) => AppError::NoQuestions(id),
            IntakeError::UserNotFound(id) => AppError::NotFound(format!("User {}", id)),
            IntakeError::PasswordHash(message) => AppError::Internal(message),
            IntakeError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::Internal(error.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::NoQuestions(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::QuestionnaireLoad(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.error_type().to_string(),
            message: self.public_message(),
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;
