use crate::error::AppResult;
use crate::models::AppState;
use actix_web::{web, HttpResponse};
use intake_core::{completion_counts, user_answers};
use intake_types::CompletionListResponse;

pub async fn list_completions(data: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = completion_counts(data.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(CompletionListResponse { users }))
}

pub async fn get_user_answers(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let response = user_answers(data.store.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
