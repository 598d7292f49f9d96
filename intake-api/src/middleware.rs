use crate::auth::validate_token;
use actix_cors::Cors;
use crate::error::AppError;
use crate::models::AppState;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use intake_types::UserInfo;

const PUBLIC_PATHS: &[&str] = &["/api/health", "/api/auth/login"];

type MiddlewareFuture<B> =
    LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>;

/// Answers the request with the error's JSON body. Returned as `Ok` so outer
/// middleware such as CORS still decorate the response.
fn reject<B: 'static>(req: ServiceRequest, error: AppError) -> MiddlewareFuture<B> {
    let response = req
        .into_response(error.error_response())
        .map_into_right_body();
    Box::pin(async move { Ok(response) })
}

fn forward<S, B>(service: &S, req: ServiceRequest) -> MiddlewareFuture<B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    let fut = service.call(req);
    Box::pin(async move { fut.await.map(|res| res.map_into_left_body()) })
}

/// Validates the bearer token and attaches the session user to the request
pub struct AuthenticationMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthenticationMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthenticationMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddlewareService { service }))
    }
}

pub struct AuthenticationMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = MiddlewareFuture<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_string();
        let is_public = PUBLIC_PATHS.contains(&path.as_str());
        tracing::debug!(
            method = %req.method(),
            path = %path,
            auth_required = !is_public,
            "Incoming request"
        );

        if is_public {
            return forward(&self.service, req);
        }

        let jwt_secret = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.config.jwt_secret().map(str::to_string));

        let jwt_secret = match jwt_secret {
            Some(secret) => secret,
            None => {
                return reject(
                    req,
                    AppError::Internal("JWT secret not configured".to_string()),
                );
            }
        };

        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let auth_header = match auth_header {
            Some(h) => h,
            None => {
                tracing::warn!(path = %path, "Auth failed: missing Authorization header");
                return reject(
                    req,
                    AppError::Unauthorized("Missing Authorization header".to_string()),
                );
            }
        };

        let token = match auth_header.strip_prefix("Bearer ") {
            Some(t) => t.to_string(),
            None => {
                tracing::warn!(path = %path, "Auth failed: invalid Authorization header format");
                return reject(
                    req,
                    AppError::Unauthorized(
                        "Invalid Authorization header format. Expected 'Bearer <token>'"
                            .to_string(),
                    ),
                );
            }
        };

        let user_info = match validate_token(&token, &jwt_secret).and_then(|c| c.user_info()) {
            Ok(info) => info,
            Err(_) => {
                tracing::warn!(path = %path, "Auth failed: invalid or expired token");
                return reject(
                    req,
                    AppError::Unauthorized("Invalid or expired token".to_string()),
                );
            }
        };

        tracing::debug!(user_id = user_info.id, "Auth successful");
        req.extensions_mut().insert(user_info);

        forward(&self.service, req)
    }
}

/// Rejects authenticated users that do not hold the admin role
pub struct RequireAdmin;

impl<S, B> Transform<S, ServiceRequest> for RequireAdmin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAdminService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAdminService { service }))
    }
}

pub struct RequireAdminService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireAdminService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = MiddlewareFuture<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let role = req.extensions().get::<UserInfo>().map(|u| (u.id, u.role));

        match role {
            Some((_, role)) if role.is_admin() => forward(&self.service, req),
            Some((user_id, _)) => {
                tracing::warn!(user_id, path = %req.path(), "Admin route denied");
                reject(req, AppError::Forbidden("Admin role required".to_string()))
            }
            None => reject(
                req,
                AppError::Unauthorized("Authentication required".to_string()),
            ),
        }
    }
}

/// Session user attached by [`AuthenticationMiddleware`]
pub fn current_user(req: &HttpRequest) -> Result<UserInfo, AppError> {
    req.extensions()
        .get::<UserInfo>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// CORS policy for the configured frontend origins
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600)
}
