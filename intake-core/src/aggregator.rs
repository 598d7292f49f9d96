//! Admin reporting over submitted answers.

use crate::error::{IntakeError, IntakeResult};
use crate::model::{AnswerOwner, DetailedAnswer};
use crate::storage::IntakeStore;
use intake_types::{AnsweredQuestion, CompletionSummary, QuestionnaireAnswers, UserAnswersResponse};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

pub const UNKNOWN_USERNAME: &str = "Unknown";
pub const UNKNOWN_QUESTIONNAIRE: &str = "Unknown Questionnaire";
pub const NO_ANSWER: &str = "(No answer)";

/// Distinct questionnaires answered per user, ordered by user id.
/// Users with no answers never appear.
pub fn summarize_completions(rows: &[AnswerOwner]) -> Vec<CompletionSummary> {
    let mut per_user: BTreeMap<i64, (Option<&str>, HashSet<i64>)> = BTreeMap::new();

    for row in rows {
        let (username, questionnaires) = per_user
            .entry(row.user_id)
            .or_insert_with(|| (None, HashSet::new()));
        if username.is_none() {
            *username = row.username.as_deref();
        }
        questionnaires.insert(row.questionnaire_id);
    }

    per_user
        .into_iter()
        .map(|(user_id, (username, questionnaires))| CompletionSummary {
            user_id,
            username: username.unwrap_or(UNKNOWN_USERNAME).to_string(),
            completed_count: questionnaires.len() as u32,
        })
        .collect()
}

pub async fn completion_counts<S>(store: &S) -> IntakeResult<Vec<CompletionSummary>>
where
    S: IntakeStore + ?Sized,
{
    let rows = store.list_all_answers_with_user().await?;
    let summaries = summarize_completions(&rows);

    info!(
        answer_rows = rows.len(),
        users = summaries.len(),
        "Computed completion counts"
    );
    Ok(summaries)
}

/// Groups answers by questionnaire name, keeping the order in which each
/// questionnaire and each answer was first encountered.
pub fn group_user_answers(answers: Vec<DetailedAnswer>) -> Vec<QuestionnaireAnswers> {
    let mut groups: Vec<QuestionnaireAnswers> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for answer in answers {
        let name = answer
            .questionnaire_name
            .unwrap_or_else(|| UNKNOWN_QUESTIONNAIRE.to_string());
        let answer_text = match answer.answer_text {
            Some(text) if !text.is_empty() => text,
            _ => NO_ANSWER.to_string(),
        };

        let index = *index_by_name.entry(name.clone()).or_insert_with(|| {
            groups.push(QuestionnaireAnswers {
                questionnaire_name: name,
                answers: Vec::new(),
            });
            groups.len() - 1
        });

        groups[index].answers.push(AnsweredQuestion {
            question: answer.question,
            answer_text,
        });
    }

    groups
}

pub async fn user_answers<S>(store: &S, user_id: i64) -> IntakeResult<UserAnswersResponse>
where
    S: IntakeStore + ?Sized,
{
    if store.get_user(user_id).await?.is_none() {
        return Err(IntakeError::UserNotFound(user_id));
    }

    let answers = store.get_user_answers_detailed(user_id).await?;
    let questionnaires = group_user_answers(answers);

    info!(
        user_id,
        questionnaires = questionnaires.len(),
        "Loaded user answers"
    );
    Ok(UserAnswersResponse {
        user_id,
        questionnaires,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, User};
    use crate::storage::InMemoryStore;
    use intake_types::UserRole;

    fn owner(user_id: i64, username: Option<&str>, questionnaire_id: i64) -> AnswerOwner {
        AnswerOwner {
            user_id,
            username: username.map(str::to_string),
            questionnaire_id,
        }
    }

    fn detailed(question: &str, questionnaire: Option<&str>, text: Option<&str>) -> DetailedAnswer {
        DetailedAnswer {
            question: question.to_string(),
            questionnaire_name: questionnaire.map(str::to_string),
            answer_text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_counts_distinct_questionnaires_per_user() {
        let rows = vec![
            owner(2, Some("bob"), 1),
            owner(1, Some("alice"), 1),
            owner(1, Some("alice"), 1),
            owner(1, Some("alice"), 2),
            owner(2, Some("bob"), 1),
        ];

        let summaries = summarize_completions(&rows);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].user_id, 1);
        assert_eq!(summaries[0].username, "alice");
        assert_eq!(summaries[0].completed_count, 2);
        assert_eq!(summaries[1].user_id, 2);
        assert_eq!(summaries[1].completed_count, 1);
    }

    #[test]
    fn test_missing_username_shows_unknown() {
        let summaries = summarize_completions(&[owner(7, None, 3)]);
        assert_eq!(summaries[0].username, UNKNOWN_USERNAME);
        assert!(summarize_completions(&[]).is_empty());
    }

    #[test]
    fn test_grouping_keeps_encounter_order() {
        let groups = group_user_answers(vec![
            detailed("Q1", Some("Onboarding"), Some("Yes")),
            detailed("Q5", Some("Health"), Some("")),
            detailed("Q2", Some("Onboarding"), Some("X, Z")),
            detailed("Q9", None, None),
        ]);

        let names: Vec<&str> = groups.iter().map(|g| g.questionnaire_name.as_str()).collect();
        assert_eq!(names, vec!["Onboarding", "Health", UNKNOWN_QUESTIONNAIRE]);

        let onboarding: Vec<(&str, &str)> = groups[0]
            .answers
            .iter()
            .map(|a| (a.question.as_str(), a.answer_text.as_str()))
            .collect();
        assert_eq!(onboarding, vec![("Q1", "Yes"), ("Q2", "X, Z")]);
        assert_eq!(groups[1].answers[0].answer_text, NO_ANSWER);
        assert_eq!(groups[2].answers[0].answer_text, NO_ANSWER);
    }

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            password_hash: String::new(),
            role: UserRole::Standard,
        }
    }

    fn answer(user_id: i64, questionnaire_id: i64, question_id: i64) -> Answer {
        Answer {
            user_id,
            questionnaire_id,
            question_id,
            answer_text: "ok".to_string(),
        }
    }

    #[tokio::test]
    async fn test_completion_counts_from_store() {
        let store = InMemoryStore::new();
        store.insert_user(user(1, "alice")).unwrap();
        store.insert_user(user(2, "bob")).unwrap();
        store.insert_user(user(3, "carol")).unwrap();
        store
            .upsert_answers(vec![
                answer(1, 10, 1),
                answer(1, 10, 2),
                answer(1, 20, 3),
                answer(2, 10, 1),
            ])
            .await
            .unwrap();

        let summaries = completion_counts(&store).await.unwrap();
        let counts: Vec<(&str, u32)> = summaries
            .iter()
            .map(|s| (s.username.as_str(), s.completed_count))
            .collect();
        assert_eq!(counts, vec![("alice", 2), ("bob", 1)]);
    }

    #[tokio::test]
    async fn test_user_answers_for_unknown_user() {
        let store = InMemoryStore::new();
        let result = user_answers(&store, 404).await;
        assert!(matches!(result, Err(IntakeError::UserNotFound(404))));
    }

    #[tokio::test]
    async fn test_user_answers_for_user_without_answers() {
        let store = InMemoryStore::new();
        store.insert_user(user(1, "alice")).unwrap();

        let response = user_answers(&store, 1).await.unwrap();
        assert_eq!(response.user_id, 1);
        assert!(response.questionnaires.is_empty());
    }
}
