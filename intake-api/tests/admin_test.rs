mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::{bearer, call_status, login, setup_test_app, ADMIN_PASSWORD, USER_PASSWORD};
use intake_api::auth::{generate_token, Claims};
use intake_core::{Answer, IntakeStore, User};
use intake_types::UserRole;

fn answer(user_id: i64, questionnaire_id: i64, question_id: i64, text: &str) -> Answer {
    Answer {
        user_id,
        questionnaire_id,
        question_id,
        answer_text: text.to_string(),
    }
}

#[actix_rt::test]
async fn test_admin_routes_reject_standard_users_and_bad_tokens() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;

    let token = login(&test_app.app, "user1", USER_PASSWORD).await;
    let req = TestRequest::get()
        .uri("/api/admin/completions")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(call_status(&test_app.app, req).await, StatusCode::FORBIDDEN);

    let req = TestRequest::get().uri("/api/admin/completions").to_request();
    assert_eq!(call_status(&test_app.app, req).await, StatusCode::UNAUTHORIZED);

    // admin claims signed with the wrong key
    let forged_user = User {
        id: test_app.seed.user_id,
        username: "user1".to_string(),
        password_hash: String::new(),
        role: UserRole::Admin,
    };
    let forged = generate_token(&Claims::new(&forged_user, 1), "not-the-server-secret")?;
    let req = TestRequest::get()
        .uri("/api/admin/completions")
        .insert_header(bearer(&forged))
        .to_request();
    assert_eq!(call_status(&test_app.app, req).await, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[actix_rt::test]
async fn test_completion_counts() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let seed = &test_app.seed;

    let second = test_app.store.create_questionnaire("Feedback")?;
    let q3 = test_app.store.create_question(
        "Comments",
        intake_types::QuestionType::FreeText,
        &[],
        false,
    )?;
    test_app.store.link_question(second, q3, 1)?;

    test_app
        .store
        .upsert_answers(vec![
            answer(seed.user_id, seed.onboarding_id, seed.q1, "Yes"),
            answer(seed.user_id, seed.onboarding_id, seed.q2, "X"),
            answer(seed.user_id, second, q3, "fine"),
            answer(seed.other_user_id, seed.onboarding_id, seed.q1, "No"),
        ])
        .await?;

    let token = login(&test_app.app, "admin", ADMIN_PASSWORD).await;
    let req = TestRequest::get()
        .uri("/api/admin/completions")
        .insert_header(bearer(&token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&test_app.app, req).await;

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2, "users without answers are not listed");
    assert_eq!(users[0]["user_id"], seed.user_id);
    assert_eq!(users[0]["username"], "user1");
    assert_eq!(users[0]["completed_count"], 2);
    assert_eq!(users[1]["user_id"], seed.other_user_id);
    assert_eq!(users[1]["completed_count"], 1);
    Ok(())
}

#[actix_rt::test]
async fn test_user_answer_detail() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let seed = &test_app.seed;

    test_app
        .store
        .upsert_answers(vec![
            answer(seed.user_id, seed.onboarding_id, seed.q1, "Yes"),
            answer(seed.user_id, seed.onboarding_id, seed.q2, ""),
        ])
        .await?;

    let token = login(&test_app.app, "admin", ADMIN_PASSWORD).await;
    let req = TestRequest::get()
        .uri(&format!("/api/admin/users/{}/answers", seed.user_id))
        .insert_header(bearer(&token))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&test_app.app, req).await;

    let groups = body["questionnaires"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["questionnaire_name"], "Onboarding");

    let answers = groups[0]["answers"].as_array().unwrap();
    assert_eq!(answers[0]["question"], "Are you new here?");
    assert_eq!(answers[0]["answer_text"], "Yes");
    assert_eq!(answers[1]["answer_text"], "(No answer)");

    let req = TestRequest::get()
        .uri("/api/admin/users/9999/answers")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(call_status(&test_app.app, req).await, StatusCode::NOT_FOUND);
    Ok(())
}
