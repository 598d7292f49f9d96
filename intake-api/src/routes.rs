//! Route table shared by the server and the integration tests.

use crate::error::AppError;
use crate::handlers::{admin, auth, health, questionnaires};
use crate::middleware::RequireAdmin;
use actix_web::web;

/// Registers every `/api` route. Authentication is applied app-wide by
/// [`crate::middleware::AuthenticationMiddleware`]; the admin scope adds a
/// role check on top.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/auth/login", web::post().to(auth::login))
            .route("/auth/me", web::get().to(auth::me))
            .service(
                web::scope("/questionnaires")
                    .route("", web::get().to(questionnaires::list))
                    .route("/{id}", web::get().to(questionnaires::get_form))
                    .route(
                        "/{id}/answers",
                        web::put().to(questionnaires::submit_answers),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(RequireAdmin)
                    .route("/completions", web::get().to(admin::list_completions))
                    .route(
                        "/users/{id}/answers",
                        web::get().to(admin::get_user_answers),
                    ),
            ),
    );
}
