use crate::error::IntakeResult;
use crate::model::Questionnaire;
use crate::storage::IntakeStore;
use intake_types::QuestionnaireSummary;
use tracing::debug;

/// Every questionnaire, ordered by id
pub async fn list_questionnaires<S>(store: &S) -> IntakeResult<Vec<QuestionnaireSummary>>
where
    S: IntakeStore + ?Sized,
{
    let mut questionnaires = store.list_questionnaires().await?;
    questionnaires.sort_by_key(|q| q.id);

    debug!(count = questionnaires.len(), "Listed questionnaires");
    Ok(questionnaires.iter().map(Questionnaire::summary).collect())
}
