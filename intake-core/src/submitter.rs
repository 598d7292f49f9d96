use crate::draft::ResponseDraft;
use crate::error::IntakeResult;
use crate::model::Answer;
use crate::storage::IntakeStore;
use tracing::info;

/// One answer record per set question in the draft
pub fn build_answers(draft: &ResponseDraft, user_id: i64, questionnaire_id: i64) -> Vec<Answer> {
    draft
        .iter()
        .map(|(question_id, answer)| Answer {
            user_id,
            questionnaire_id,
            question_id,
            answer_text: answer.to_answer_text(),
        })
        .collect()
}

/// Persists the draft as a single upsert batch and returns the number of
/// answers written. Unset questions are left untouched in the store.
pub async fn submit_responses<S>(
    store: &S,
    user_id: i64,
    questionnaire_id: i64,
    draft: &ResponseDraft,
) -> IntakeResult<usize>
where
    S: IntakeStore + ?Sized,
{
    let answers = build_answers(draft, user_id, questionnaire_id);
    let count = answers.len();

    if count == 0 {
        info!(user_id, questionnaire_id, "Nothing to submit");
        return Ok(0);
    }

    store.upsert_answers(answers).await?;

    info!(
        user_id,
        questionnaire_id,
        answer_count = count,
        "Submitted answers"
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftAnswer;
    use crate::loader::load_questionnaire;
    use crate::model::{Question, Questionnaire};
    use crate::storage::InMemoryStore;
    use intake_types::QuestionType;

    fn onboarding_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_questionnaire(Questionnaire {
                id: 1,
                name: "Onboarding".to_string(),
            })
            .unwrap();
        store
            .insert_question(Question {
                id: 1,
                question: "Are you new?".to_string(),
                question_type: QuestionType::SingleChoice,
                options: vec!["Yes".to_string(), "No".to_string()],
                allow_multiple_answers: false,
            })
            .unwrap();
        store
            .insert_question(Question {
                id: 2,
                question: "Which apply?".to_string(),
                question_type: QuestionType::MultiChoice,
                options: vec!["X".to_string(), "Y".to_string(), "Z".to_string()],
                allow_multiple_answers: true,
            })
            .unwrap();
        store
            .insert_question(Question {
                id: 3,
                question: "Anything else?".to_string(),
                question_type: QuestionType::FreeText,
                options: vec![],
                allow_multiple_answers: false,
            })
            .unwrap();
        store.link_question(1, 1, 1).unwrap();
        store.link_question(1, 2, 2).unwrap();
        store.link_question(1, 3, 3).unwrap();
        store
    }

    #[test]
    fn test_build_answers_skips_unset_and_joins_selection() {
        let mut draft = ResponseDraft::new();
        draft.set(1, "Yes");
        draft.toggle(2, "X");
        draft.toggle(2, "Z");

        let answers = build_answers(&draft, 4, 1);

        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].question_id, 1);
        assert_eq!(answers[0].answer_text, "Yes");
        assert_eq!(answers[1].question_id, 2);
        assert_eq!(answers[1].answer_text, "X, Z");
        assert!(answers.iter().all(|a| a.user_id == 4 && a.questionnaire_id == 1));
    }

    #[tokio::test]
    async fn test_onboarding_submit_then_reload() {
        let store = onboarding_store();

        let mut draft = ResponseDraft::new();
        draft.set(1, "Yes");
        draft.toggle(2, "X");
        draft.toggle(2, "Z");

        let saved = submit_responses(&store, 4, 1, &draft).await.unwrap();
        assert_eq!(saved, 2);

        let stored = store.get_answers(4, 1).await.unwrap();
        let texts: Vec<(i64, &str)> = stored
            .iter()
            .map(|a| (a.question_id, a.answer_text.as_str()))
            .collect();
        assert_eq!(texts, vec![(1, "Yes"), (2, "X, Z")]);

        let reloaded = load_questionnaire(&store, 1, 4).await.unwrap();
        assert_eq!(
            reloaded.draft.get(1),
            Some(&DraftAnswer::Single("Yes".to_string()))
        );
        let selection = reloaded.draft.get(2).unwrap();
        assert!(selection.contains("X") && selection.contains("Z"));
        assert!(!selection.contains("Y"));
        assert!(reloaded.draft.get(3).is_none());
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_instead_of_duplicating() {
        let store = onboarding_store();

        let mut draft = ResponseDraft::new();
        draft.set(3, "first");
        submit_responses(&store, 4, 1, &draft).await.unwrap();
        submit_responses(&store, 4, 1, &draft).await.unwrap();
        assert_eq!(store.answer_count().unwrap(), 1);

        draft.set(3, "second");
        submit_responses(&store, 4, 1, &draft).await.unwrap();

        let stored = store.get_answers(4, 1).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].answer_text, "second");
    }

    #[tokio::test]
    async fn test_partial_submission_keeps_unrelated_answers() {
        let store = onboarding_store();

        let mut first = ResponseDraft::new();
        first.set(1, "No");
        first.set(3, "hello");
        submit_responses(&store, 4, 1, &first).await.unwrap();

        let mut second = ResponseDraft::new();
        second.set(1, "Yes");
        submit_responses(&store, 4, 1, &second).await.unwrap();

        let reloaded = load_questionnaire(&store, 1, 4).await.unwrap();
        assert_eq!(
            reloaded.draft.get(1),
            Some(&DraftAnswer::Single("Yes".to_string()))
        );
        assert_eq!(
            reloaded.draft.get(3),
            Some(&DraftAnswer::Single("hello".to_string()))
        );
    }

    #[tokio::test]
    async fn test_empty_draft_writes_nothing() {
        let store = onboarding_store();
        let saved = submit_responses(&store, 4, 1, &ResponseDraft::new())
            .await
            .unwrap();
        assert_eq!(saved, 0);
        assert_eq!(store.answer_count().unwrap(), 0);
    }
}
