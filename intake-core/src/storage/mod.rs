use crate::error::StoreError;
use crate::model::{
    Answer, AnswerOwner, DetailedAnswer, Question, Questionnaire, QuestionnaireQuestion, User,
};
use async_trait::async_trait;

mod memory;

pub use memory::InMemoryStore;

/// Relational backend holding users, questionnaires, questions and answers.
#[async_trait]
pub trait IntakeStore: Send + Sync {
    /// Exact, case-sensitive username lookup
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    async fn get_questionnaire(&self, id: i64) -> Result<Option<Questionnaire>, StoreError>;
    async fn list_questionnaires(&self) -> Result<Vec<Questionnaire>, StoreError>;

    /// Links of one questionnaire, ascending by priority
    async fn list_questionnaire_questions(
        &self,
        questionnaire_id: i64,
    ) -> Result<Vec<QuestionnaireQuestion>, StoreError>;
    /// Questions with the given ids, in no particular order
    async fn get_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError>;

    async fn get_answers(
        &self,
        user_id: i64,
        questionnaire_id: i64,
    ) -> Result<Vec<Answer>, StoreError>;
    /// Inserts or overwrites every answer keyed by (user, questionnaire, question).
    /// The batch is applied as a unit.
    async fn upsert_answers(&self, answers: Vec<Answer>) -> Result<(), StoreError>;

    /// Every answer row with its owner's username, ordered by user id
    async fn list_all_answers_with_user(&self) -> Result<Vec<AnswerOwner>, StoreError>;
    async fn get_user_answers_detailed(
        &self,
        user_id: i64,
    ) -> Result<Vec<DetailedAnswer>, StoreError>;
}
