use intake_types::{QuestionType, QuestionView, QuestionnaireSummary, UserInfo, UserRole};

/// Stored account. `password_hash` is an Argon2id PHC string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}

impl User {
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    pub id: i64,
    pub name: String,
}

impl Questionnaire {
    /// Name shown to users; blank names fall back to `Questionnaire {id}`.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Questionnaire {}", self.id)
        } else {
            self.name.clone()
        }
    }

    pub fn summary(&self) -> QuestionnaireSummary {
        QuestionnaireSummary {
            id: self.id,
            name: self.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub allow_multiple_answers: bool,
}

impl Question {
    /// Whether answers are collected as a selection of options.
    ///
    /// A single-choice question flagged for multiple answers behaves as multi-choice.
    pub fn accepts_multiple(&self) -> bool {
        match self.question_type {
            QuestionType::MultiChoice => true,
            QuestionType::SingleChoice => self.allow_multiple_answers,
            QuestionType::FreeText => false,
        }
    }

    /// Input shape the question is rendered with
    pub fn input_type(&self) -> QuestionType {
        if self.accepts_multiple() {
            QuestionType::MultiChoice
        } else {
            self.question_type
        }
    }

    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id,
            question: self.question.clone(),
            question_type: self.input_type(),
            options: self.options.clone(),
            allow_multiple_answers: self.accepts_multiple(),
        }
    }
}

/// Link placing a question in a questionnaire; lower priority renders first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionnaireQuestion {
    pub questionnaire_id: i64,
    pub question_id: i64,
    pub priority: i64,
}

/// Current answer for a (user, questionnaire, question) key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub user_id: i64,
    pub questionnaire_id: i64,
    pub question_id: i64,
    pub answer_text: String,
}

/// Answer row projected for completion counting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOwner {
    pub user_id: i64,
    pub username: Option<String>,
    pub questionnaire_id: i64,
}

/// Answer row joined with its question prompt and questionnaire name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailedAnswer {
    pub question: String,
    pub questionnaire_name: Option<String>,
    pub answer_text: Option<String>,
}
