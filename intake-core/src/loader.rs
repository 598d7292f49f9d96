use crate::draft::ResponseDraft;
use crate::error::{IntakeError, IntakeResult};
use crate::model::{Question, Questionnaire};
use crate::storage::IntakeStore;
use intake_types::QuestionnaireFormResponse;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// A questionnaire ready to be filled in by one user
#[derive(Debug, Clone)]
pub struct LoadedQuestionnaire {
    pub questionnaire: Questionnaire,
    /// In ascending link priority
    pub questions: Vec<Question>,
    /// Prefilled from the user's stored answers
    pub draft: ResponseDraft,
}

impl LoadedQuestionnaire {
    pub fn display_name(&self) -> String {
        self.questionnaire.display_name()
    }

    pub fn to_response(&self) -> QuestionnaireFormResponse {
        QuestionnaireFormResponse {
            id: self.questionnaire.id,
            name: self.display_name(),
            questions: self.questions.iter().map(Question::view).collect(),
            responses: self.draft.to_values(),
        }
    }
}

/// Fetches a questionnaire, its questions in priority order, and the user's
/// prior answers as the initial draft. Any failed lookup aborts the load.
pub async fn load_questionnaire<S>(
    store: &S,
    questionnaire_id: i64,
    user_id: i64,
) -> IntakeResult<LoadedQuestionnaire>
where
    S: IntakeStore + ?Sized,
{
    let questionnaire = store
        .get_questionnaire(questionnaire_id)
        .await?
        .ok_or(IntakeError::QuestionnaireNotFound(questionnaire_id))?;

    let links = store.list_questionnaire_questions(questionnaire_id).await?;
    let question_ids: Vec<i64> = links.iter().map(|link| link.question_id).collect();

    let fetched = if question_ids.is_empty() {
        Vec::new()
    } else {
        store.get_questions(&question_ids).await?
    };
    let questions = order_by_links(fetched, &question_ids);

    if questions.is_empty() {
        warn!(questionnaire_id, "Questionnaire has no questions");
        return Err(IntakeError::NoQuestions(questionnaire_id));
    }

    let answers = store.get_answers(user_id, questionnaire_id).await?;

    let mut draft = ResponseDraft::new();
    for answer in &answers {
        match questions.iter().find(|q| q.id == answer.question_id) {
            Some(question) => draft.prefill(question, &answer.answer_text),
            None => debug!(
                questionnaire_id,
                question_id = answer.question_id,
                "Ignoring answer for a question no longer in the questionnaire"
            ),
        }
    }

    info!(
        questionnaire_id,
        user_id,
        question_count = questions.len(),
        prefilled = draft.len(),
        "Loaded questionnaire"
    );

    Ok(LoadedQuestionnaire {
        questionnaire,
        questions,
        draft,
    })
}

/// Reorders fetched questions to the link order. Ids with no fetched question
/// are skipped, as are repeated ids.
fn order_by_links(fetched: Vec<Question>, ordered_ids: &[i64]) -> Vec<Question> {
    let mut by_id: HashMap<i64, Question> = fetched.into_iter().map(|q| (q.id, q)).collect();

    ordered_ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .collect()
}
