#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use intake_api::config::{ApiConfig, AuthConfig};
use intake_api::helpers::database::open_in_memory;
use intake_api::middleware::{cors, AuthenticationMiddleware};
use intake_api::models::AppState;
use intake_api::DbConnection;
use intake_api::routes::configure_routes;
use intake_api::storage::SqliteIntakeStore;
use intake_core::{hash_password, IntakeStore};
use intake_types::{QuestionType, UserRole};
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_jwt";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const USER_PASSWORD: &str = "password1";
pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Ids of the rows seeded into every test database
pub struct Seed {
    pub admin_id: i64,
    pub user_id: i64,
    pub other_user_id: i64,
    /// q1 single [Yes, No] priority 1, q2 multi [X, Y, Z] priority 2
    pub onboarding_id: i64,
    pub q1: i64,
    pub q2: i64,
    /// Exists but has no linked questions
    pub empty_id: i64,
}

pub struct TestApp<S> {
    /// Raw handle on the same database the store uses
    pub db: DbConnection,
    pub store: Arc<SqliteIntakeStore>,
    pub seed: Seed,
    pub app: S,
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        auth: Some(AuthConfig {
            jwt_secret: Some(TEST_JWT_SECRET.to_string()),
            token_ttl_hours: Some(1),
        }),
        ..ApiConfig::default()
    }
}

pub fn seed_database(store: &SqliteIntakeStore) -> anyhow::Result<Seed> {
    let admin_id = store.create_user("admin", &hash_password(ADMIN_PASSWORD)?, UserRole::Admin)?;
    let user_id = store.create_user("user1", &hash_password(USER_PASSWORD)?, UserRole::Standard)?;
    let other_user_id =
        store.create_user("user2", &hash_password(USER_PASSWORD)?, UserRole::Standard)?;

    let onboarding_id = store.create_questionnaire("Onboarding")?;
    let q1 = store.create_question(
        "Are you new here?",
        QuestionType::SingleChoice,
        &["Yes".to_string(), "No".to_string()],
        false,
    )?;
    let q2 = store.create_question(
        "Which apply?",
        QuestionType::MultiChoice,
        &["X".to_string(), "Y".to_string(), "Z".to_string()],
        true,
    )?;
    // linked out of id order on purpose
    store.link_question(onboarding_id, q2, 2)?;
    store.link_question(onboarding_id, q1, 1)?;

    let empty_id = store.create_questionnaire("Empty")?;

    Ok(Seed {
        admin_id,
        user_id,
        other_user_id,
        onboarding_id,
        q1,
        q2,
        empty_id,
    })
}

type SeededState = (DbConnection, Arc<SqliteIntakeStore>, Seed, web::Data<AppState>);

fn seeded_state() -> anyhow::Result<SeededState> {
    let db = open_in_memory()?;
    let store = Arc::new(SqliteIntakeStore::new(db.clone()));
    let seed = seed_database(&store)?;

    let shared: Arc<dyn IntakeStore> = store.clone();
    let app_state = web::Data::new(AppState::new(shared, test_config()));
    Ok((db, store, seed, app_state))
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl Service<
            actix_http::Request,
            Response = ServiceResponse<impl MessageBody>,
            Error = Error,
        >,
    >,
> {
    let (db, store, seed, app_state) = seeded_state()?;

    let app = test::init_service(
        App::new()
            .app_data(app_state)
            .wrap(AuthenticationMiddleware)
            .configure(configure_routes),
    )
    .await;

    Ok(TestApp {
        db,
        store,
        seed,
        app,
    })
}

/// Same app wrapped the way the server wraps it, with CORS allowing
/// [`FRONTEND_ORIGIN`]
pub async fn setup_cors_test_app() -> anyhow::Result<
    TestApp<
        impl Service<
            actix_http::Request,
            Response = ServiceResponse<impl MessageBody>,
            Error = Error,
        >,
    >,
> {
    let (db, store, seed, app_state) = seeded_state()?;

    let app = test::init_service(
        App::new()
            .app_data(app_state)
            .wrap(AuthenticationMiddleware)
            .wrap(cors(&[FRONTEND_ORIGIN.to_string()]))
            .configure(configure_routes),
    )
    .await;

    Ok(TestApp {
        db,
        store,
        seed,
        app,
    })
}

/// Logs in and returns the bearer token
pub async fn login<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({ "username": username, "password": password }))
        .to_request();

    let body: serde_json::Value = test::call_and_read_body_json(app, req).await;
    body["token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub async fn call_status<S, B>(app: &S, req: actix_http::Request) -> actix_web::http::StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
{
    test::call_service(app, req).await.status()
}
