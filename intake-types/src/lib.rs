use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod admin;
pub mod auth;
pub mod questionnaire;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use admin::{
    AnsweredQuestion, CompletionListResponse, CompletionSummary, QuestionnaireAnswers,
    UserAnswersResponse,
};
pub use auth::{LoginRequest, LoginResponse, UserInfo, UserRole};
pub use questionnaire::{
    DraftValue, QuestionType, QuestionView, QuestionnaireFormResponse, QuestionnaireListResponse,
    QuestionnaireSummary, SubmitAnswersRequest, SubmitAnswersResponse,
};

// Shared models for the intake api and its clients

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
