use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Questionnaire {0} not found")]
    QuestionnaireNotFound(i64),

    #[error("No questions found for questionnaire {0}")]
    NoQuestions(i64),

    #[error("User {0} not found")]
    UserNotFound(i64),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type IntakeResult<T> = Result<T, IntakeError>;
