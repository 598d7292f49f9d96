pub mod aggregator;
pub mod catalog;
pub mod credentials;
pub mod draft;
pub mod error;
pub mod loader;
pub mod model;
pub mod storage;
pub mod submitter;

pub use aggregator::{completion_counts, user_answers};
pub use catalog::list_questionnaires;
pub use credentials::{check_credentials, hash_password, verify_password};
pub use draft::{DraftAnswer, ResponseDraft, OPTION_SEPARATOR};
pub use error::{IntakeError, IntakeResult, StoreError};
pub use loader::{load_questionnaire, LoadedQuestionnaire};
pub use model::{
    Answer, AnswerOwner, DetailedAnswer, Question, Questionnaire, QuestionnaireQuestion, User,
};
pub use storage::{InMemoryStore, IntakeStore};
pub use submitter::{build_answers, submit_responses};
