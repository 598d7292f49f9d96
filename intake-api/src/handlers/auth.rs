use crate::auth::{generate_token, Claims};
use crate::error::{AppError, AppResult};
use crate::middleware::current_user;
use crate::models::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use intake_core::check_credentials;
use intake_types::{LoginRequest, LoginResponse};
use tracing::{info, warn};

pub async fn login(
    data: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let request = request.into_inner();

    let user = match check_credentials(data.store.as_ref(), &request.username, &request.password)
        .await?
    {
        Some(user) => user,
        None => {
            warn!(username = %request.username, "Login rejected");
            return Err(AppError::AuthenticationFailed);
        }
    };

    let jwt_secret = data
        .config
        .jwt_secret()
        .ok_or_else(|| AppError::Internal("JWT secret not configured".to_string()))?;

    let claims = Claims::new(&user, data.config.token_ttl_hours());
    let token = generate_token(&claims, jwt_secret)?;

    info!(user_id = user.id, role = user.role.as_str(), "User logged in");
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: user.info(),
    }))
}

/// Session user carried by the bearer token
pub async fn me(req: HttpRequest) -> AppResult<HttpResponse> {
    let user = current_user(&req)?;
    Ok(HttpResponse::Ok().json(user))
}
