use crate::error::{AppError, AppResult};
use crate::middleware::current_user;
use crate::models::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use intake_core::{list_questionnaires, load_questionnaire, submit_responses, ResponseDraft};
use intake_types::{QuestionnaireListResponse, SubmitAnswersRequest, SubmitAnswersResponse};

pub async fn list(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let questionnaires = list_questionnaires(data.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(QuestionnaireListResponse { questionnaires }))
}

/// Questionnaire form with the caller's saved answers prefilled
pub async fn get_form(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let questionnaire_id = path.into_inner();
    let user = current_user(&req)?;

    let loaded = load_questionnaire(data.store.as_ref(), questionnaire_id, user.id)
        .await
        .map_err(AppError::loading)?;

    Ok(HttpResponse::Ok().json(loaded.to_response()))
}

pub async fn submit_answers(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    request: web::Json<SubmitAnswersRequest>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let questionnaire_id = path.into_inner();
    let user = current_user(&req)?;

    if data.store.get_questionnaire(questionnaire_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Questionnaire {}", questionnaire_id)));
    }

    let draft = ResponseDraft::from(request.into_inner().responses);
    let saved = submit_responses(data.store.as_ref(), user.id, questionnaire_id, &draft).await?;

    Ok(HttpResponse::Ok().json(SubmitAnswersResponse {
        questionnaire_id,
        saved: saved as u32,
    }))
}
