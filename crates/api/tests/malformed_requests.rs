//! Unparseable bodies, query strings and path segments still answer with
//! the `{ code, msg, data }` envelope.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, create_user, get_auth, post_json_auth, send, token_for};
use coupon_core::roles;
use serde_json::json;
use sqlx::SqlitePool;

async fn assert_bad_request(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], 40000);
    assert!(json["msg"].is_string());
    assert!(json["data"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_json_body_rejections(pool: SqlitePool) {
    let user = create_user(
        &pool,
        "olga",
        roles::merge(&[roles::LOGIN, roles::APPLY_COUPON]),
    )
    .await;
    let token = token_for(&user);

    for body in [json!({}), json!({ "type": "x" })] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/my-coupon/take",
            &token,
            body,
        )
        .await;
        assert_bad_request(response).await;
    }

    // No body and no content type.
    let response = send(
        common::build_test_app(pool),
        Method::POST,
        "/api/v1/user/login",
        None,
        None,
    )
    .await;
    assert_bad_request(response).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_path_rejection(pool: SqlitePool) {
    let user = create_user(&pool, "pavel", roles::LOGIN.into()).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/my-coupon/detail/abc",
        &token_for(&user),
    )
    .await;
    assert_bad_request(response).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_query_rejection(pool: SqlitePool) {
    let user = create_user(&pool, "quinn", roles::merge(&[roles::LOGIN, roles::STOCK])).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/coupon/list?page=abc",
        &token_for(&user),
    )
    .await;
    assert_bad_request(response).await;
}
