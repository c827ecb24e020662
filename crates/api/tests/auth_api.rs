//! Router-level authentication and authorization tests.
//!
//! Every request here is rejected before the handler touches the database,
//! so the app runs on a lazily connected pool.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, get, get_auth, lazy_pool, post_json,
    post_json_auth, token_for, token_with_status, user_id_for, TestAccounts,
};
use patrol_core::roles::{AccountStatus, Role};
use serde_json::json;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_401() {
    let app = build_test_app(lazy_pool());

    let response = get(app, "/api/v1/users").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_401() {
    let app = build_test_app(lazy_pool());

    let response = get_auth(app, "/api/v1/sites", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inactive_account_token_is_401() {
    let app = build_test_app(lazy_pool());
    let token = token_with_status(Role::Guard, Some(1), AccountStatus::Inactive);

    let response = post_json_auth(
        app,
        "/api/v1/checkin",
        &token,
        json!({ "userId": 1, "checkpointCardNum": "A-01" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = build_test_app(lazy_pool());

    let response = get(app, "/api/v1/users").await;

    assert!(response.headers().contains_key("x-request-id"));
}

// ---------------------------------------------------------------------------
// Account state after login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn user_deactivated_after_login_loses_access() {
    let accounts = TestAccounts::seeded();
    let app = build_test_app_with(lazy_pool(), accounts.clone());
    let token = token_for(Role::Guard, Some(1));

    // Authenticated, then refused on role.
    let response = get_auth(app.clone(), "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    accounts.deactivate_user(user_id_for(Role::Guard, Some(1)));

    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn deactivated_organization_locks_out_its_members() {
    let accounts = TestAccounts::seeded();
    let app = build_test_app_with(lazy_pool(), accounts.clone());
    let operator = token_for(Role::Operator, Some(1));
    let other_operator = token_for(Role::Operator, Some(2));

    accounts.deactivate_organization(1);

    let response = get_auth(app.clone(), "/api/v1/logs/history?siteId=1", &operator).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/logs/history?siteId=1", &other_operator).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleted_user_token_is_401() {
    let accounts = TestAccounts::seeded();
    let app = build_test_app_with(lazy_pool(), accounts.clone());
    let token = token_for(Role::Guard, Some(2));

    accounts.remove_user(user_id_for(Role::Guard, Some(2)));

    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Role checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn guard_cannot_list_users() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Guard, Some(1));

    let response = get_auth(app, "/api/v1/users", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn guard_cannot_read_live_logs() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Guard, Some(1));

    let response = get_auth(app, "/api/v1/logs?siteId=1", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn operator_cannot_read_full_history() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Operator, Some(1));

    let response = get_auth(app, "/api/v1/logs/history?siteId=1", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_cannot_manage_organizations() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Admin, Some(1));

    let response = get_auth(app, "/api/v1/superadmin/organizations", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Body validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_blank_fields_is_400() {
    let app = build_test_app(lazy_pool());

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "login": "", "password": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_without_password_is_400() {
    let app = build_test_app(lazy_pool());

    let response = post_json(app, "/api/v1/auth/guard", json!({ "login": "g1" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn checkin_with_blank_card_is_400() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Guard, Some(1));

    let response = post_json_auth(
        app,
        "/api/v1/checkin",
        &token,
        json!({ "userId": 1, "checkpointCardNum": "" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn gps_ping_outside_wgs84_is_400() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Guard, Some(1));

    let response = post_json_auth(
        app,
        "/api/v1/gps",
        &token,
        json!({ "userId": 1, "location": { "lat": 123.0, "lng": 10.0 } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// WebSocket subscription
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ws_without_token_is_401() {
    let app = build_test_app(lazy_pool());

    let response = get(app, "/api/v1/ws").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ws_with_invalid_query_token_is_401() {
    let app = build_test_app(lazy_pool());

    let response = get(app, "/api/v1/ws?token=forged").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ws_token_without_organization_is_401() {
    let app = build_test_app(lazy_pool());
    let token = token_for(Role::Superadmin, None);

    let response = get(app, &format!("/api/v1/ws?token={token}")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn ws_rejects_user_deactivated_after_login() {
    let accounts = TestAccounts::seeded();
    let app = build_test_app_with(lazy_pool(), accounts.clone());
    let token = token_for(Role::Operator, Some(1));

    accounts.deactivate_user(user_id_for(Role::Operator, Some(1)));

    let response = get(app, &format!("/api/v1/ws?token={token}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn ws_rejects_member_of_deactivated_organization() {
    let accounts = TestAccounts::seeded();
    let app = build_test_app_with(lazy_pool(), accounts.clone());
    let token = token_for(Role::Admin, Some(2));

    accounts.deactivate_organization(2);

    let response = get(app, &format!("/api/v1/ws?token={token}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
