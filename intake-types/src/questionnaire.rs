use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Questionnaire entry for the catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireListResponse {
    pub questionnaires: Vec<QuestionnaireSummary>,
}

/// Input shape of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exactly one of the options
    SingleChoice,
    /// Any subset of the options
    MultiChoice,
    /// Free text input
    FreeText,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultiChoice => "multi_choice",
            QuestionType::FreeText => "free_text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single_choice" => Some(QuestionType::SingleChoice),
            "multi_choice" => Some(QuestionType::MultiChoice),
            "free_text" => Some(QuestionType::FreeText),
            _ => None,
        }
    }
}

/// A question as rendered in a questionnaire form
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionView {
    pub id: i64,
    /// The prompt text
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Options in display order (empty for free text)
    pub options: Vec<String>,
    pub allow_multiple_answers: bool,
}

/// Draft answer for one question: a single value, or a selection of options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum DraftValue {
    Single(String),
    Multiple(Vec<String>),
}

/// A loaded questionnaire: ordered questions plus the user's prefilled draft
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireFormResponse {
    pub id: i64,
    pub name: String,
    pub questions: Vec<QuestionView>,
    /// Keyed by question id; unanswered questions are absent
    pub responses: BTreeMap<i64, DraftValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitAnswersRequest {
    pub responses: BTreeMap<i64, DraftValue>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitAnswersResponse {
    pub questionnaire_id: i64,
    pub saved: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_value_accepts_string_or_list() {
        let request: SubmitAnswersRequest =
            serde_json::from_str(r#"{"responses": {"1": "Yes", "2": ["X", "Z"]}}"#).unwrap();

        assert_eq!(
            request.responses.get(&1),
            Some(&DraftValue::Single("Yes".to_string()))
        );
        assert_eq!(
            request.responses.get(&2),
            Some(&DraftValue::Multiple(vec!["X".to_string(), "Z".to_string()]))
        );
    }

    #[test]
    fn test_question_type_wire_name() {
        let view = QuestionView {
            id: 3,
            question: "Anything else?".to_string(),
            question_type: QuestionType::FreeText,
            options: vec![],
            allow_multiple_answers: false,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "free_text");
        assert_eq!(QuestionType::parse("multi_choice"), Some(QuestionType::MultiChoice));
        assert_eq!(QuestionType::parse("mcq"), None);
    }
}
