use crate::error::StoreError;
use crate::model::{
    Answer, AnswerOwner, DetailedAnswer, Question, Questionnaire, QuestionnaireQuestion, User,
};
use crate::storage::IntakeStore;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    questionnaires: BTreeMap<i64, Questionnaire>,
    questions: BTreeMap<i64, Question>,
    links: Vec<QuestionnaireQuestion>,
    // insertion order is the read order
    answers: Vec<Answer>,
}

/// Process-local store, useful for tests and embedding.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::OperationFailed(format!("Lock error: {}", e)))
    }

    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.tables()?.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), StoreError> {
        self.tables()?
            .questionnaires
            .insert(questionnaire.id, questionnaire);
        Ok(())
    }

    pub fn insert_question(&self, question: Question) -> Result<(), StoreError> {
        self.tables()?.questions.insert(question.id, question);
        Ok(())
    }

    pub fn link_question(
        &self,
        questionnaire_id: i64,
        question_id: i64,
        priority: i64,
    ) -> Result<(), StoreError> {
        self.tables()?.links.push(QuestionnaireQuestion {
            questionnaire_id,
            question_id,
            priority,
        });
        Ok(())
    }

    /// Number of stored answer rows
    pub fn answer_count(&self) -> Result<usize, StoreError> {
        Ok(self.tables()?.answers.len())
    }
}

#[async_trait::async_trait]
impl IntakeStore for InMemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.get(&user_id).cloned())
    }

    async fn get_questionnaire(&self, id: i64) -> Result<Option<Questionnaire>, StoreError> {
        Ok(self.tables()?.questionnaires.get(&id).cloned())
    }

    async fn list_questionnaires(&self) -> Result<Vec<Questionnaire>, StoreError> {
        Ok(self.tables()?.questionnaires.values().cloned().collect())
    }

    async fn list_questionnaire_questions(
        &self,
        questionnaire_id: i64,
    ) -> Result<Vec<QuestionnaireQuestion>, StoreError> {
        let mut links: Vec<QuestionnaireQuestion> = self
            .tables()?
            .links
            .iter()
            .filter(|link| link.questionnaire_id == questionnaire_id)
            .copied()
            .collect();
        links.sort_by_key(|link| link.priority);
        Ok(links)
    }

    async fn get_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        Ok(self
            .tables()?
            .questions
            .values()
            .filter(|question| ids.contains(&question.id))
            .cloned()
            .collect())
    }

    async fn get_answers(
        &self,
        user_id: i64,
        questionnaire_id: i64,
    ) -> Result<Vec<Answer>, StoreError> {
        Ok(self
            .tables()?
            .answers
            .iter()
            .filter(|a| a.user_id == user_id && a.questionnaire_id == questionnaire_id)
            .cloned()
            .collect())
    }

    async fn upsert_answers(&self, answers: Vec<Answer>) -> Result<(), StoreError> {
        let mut tables = self.tables()?;

        for answer in answers {
            let existing = tables.answers.iter().position(|a| {
                a.user_id == answer.user_id
                    && a.questionnaire_id == answer.questionnaire_id
                    && a.question_id == answer.question_id
            });

            match existing {
                Some(index) => tables.answers[index].answer_text = answer.answer_text,
                None => tables.answers.push(answer),
            }
        }

        Ok(())
    }

    async fn list_all_answers_with_user(&self) -> Result<Vec<AnswerOwner>, StoreError> {
        let tables = self.tables()?;

        let mut rows: Vec<AnswerOwner> = tables
            .answers
            .iter()
            .map(|a| AnswerOwner {
                user_id: a.user_id,
                username: tables.users.get(&a.user_id).map(|u| u.username.clone()),
                questionnaire_id: a.questionnaire_id,
            })
            .collect();
        rows.sort_by_key(|row| row.user_id);
        Ok(rows)
    }

    async fn get_user_answers_detailed(
        &self,
        user_id: i64,
    ) -> Result<Vec<DetailedAnswer>, StoreError> {
        let tables = self.tables()?;

        Ok(tables
            .answers
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| DetailedAnswer {
                question: tables
                    .questions
                    .get(&a.question_id)
                    .map(|q| q.question.clone())
                    .unwrap_or_default(),
                questionnaire_name: tables
                    .questionnaires
                    .get(&a.questionnaire_id)
                    .map(|q| q.name.clone()),
                answer_text: Some(a.answer_text.clone()),
            })
            .collect())
    }
}
