use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============ Admin reporting ============

/// Per-user completion row: number of distinct questionnaires answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompletionSummary {
    pub user_id: i64,
    pub username: String,
    pub completed_count: u32,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompletionListResponse {
    pub users: Vec<CompletionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer_text: String,
}

/// One questionnaire's answers, in the order they were read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireAnswers {
    pub questionnaire_name: String,
    pub answers: Vec<AnsweredQuestion>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserAnswersResponse {
    pub user_id: i64,
    pub questionnaires: Vec<QuestionnaireAnswers>,
}
