//! HTTP-level tests for the `/api/v1/coupon` stock-management endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, delete_auth, get_auth, post_json_auth, put_json_auth, token_for,
};
use coupon_core::roles;
use coupon_db::repositories::CouponRepo;
use serde_json::json;
use sqlx::SqlitePool;

async fn stock_token(pool: &SqlitePool) -> String {
    let user = create_user(pool, "stocker", roles::merge(&[roles::LOGIN, roles::STOCK])).await;
    token_for(&user)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_reports_created_then_duplicates(pool: SqlitePool) {
    let token = stock_token(&pool).await;
    let body = json!({ "codes": "A,B\nB\nC", "type": 1 });

    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/coupon/import", &token, body.clone())
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["code"], 0);
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["created"], 3);
    assert_eq!(json["data"]["duplicates"], json!([]));

    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/coupon/import", &token, body).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["created"], 0);
    assert_eq!(json["data"]["duplicates"], json!(["A", "B", "C"]));

    assert_eq!(CouponRepo::count_available_by_type(&pool, 1).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_import_rejects_empty_input_and_unknown_type(pool: SqlitePool) {
    let token = stock_token(&pool).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/import",
        &token,
        json!({ "codes": " ,\n ", "type": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 40000);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/coupon/import",
        &token,
        json!({ "codes": "X", "type": 9 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 40001);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_add_duplicate_code_conflicts(pool: SqlitePool) {
    let token = stock_token(&pool).await;
    let body = json!({ "code": "FIT-100", "type": 1 });

    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/coupon/add", &token, body.clone())
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["code"], "FIT-100");
    assert_eq!(json["data"]["type_name"], "Fitness card");
    assert_eq!(json["data"]["is_taken"], false);

    let response = post_json_auth(common::build_test_app(pool), "/api/v1/coupon/add", &token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 40901);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_claimed_coupon_is_locked(pool: SqlitePool) {
    let token = stock_token(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/add",
        &token,
        json!({ "code": "LOCKED", "type": 1 }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    CouponRepo::claim(&pool, id, 99, 1_000).await.unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/update",
        &token,
        json!({ "id": id, "code": "CHANGED" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 40904);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/coupon/delete/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 40904);

    let stored = CouponRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(stored.code, "LOCKED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_and_delete_unclaimed(pool: SqlitePool) {
    let token = stock_token(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/add",
        &token,
        json!({ "code": "OPEN", "type": 1 }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/update",
        &token,
        json!({ "id": id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/update",
        &token,
        json!({ "id": id, "code": "OPEN-2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["code"], "OPEN-2");

    let uri = format!("/api/v1/coupon/delete/{id}");
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], 40400);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filters_and_paging(pool: SqlitePool) {
    let token = stock_token(&pool).await;
    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/import",
        &token,
        json!({ "codes": "L1\nL2\nL3", "type": 1 }),
    )
    .await;
    let l1 = CouponRepo::find_by_code(&pool, "L1").await.unwrap().unwrap();
    CouponRepo::claim(&pool, l1.id, 5, 10).await.unwrap();

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/list?taken=1",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["list"][0]["code"], "L1");

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/list?taken=0&type=1&page=1&size=1",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);
    assert_eq!(json["data"]["size"], 1);
    assert_eq!(json["data"]["list"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["list"][0]["code"], "L3");

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/coupon/list?size=500",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["size"], 10);
    assert_eq!(json["data"]["page"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_detail_not_found(pool: SqlitePool) {
    let token = stock_token(&pool).await;
    let response = get_auth(common::build_test_app(pool), "/api/v1/coupon/detail/404", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_stock_routes_require_stock_bit(pool: SqlitePool) {
    let login_only = create_user(&pool, "viewer", roles::LOGIN.into()).await;
    let admin_only = create_user(&pool, "boss", roles::merge(&[roles::LOGIN, roles::ADMIN])).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/types",
        &token_for(&login_only),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["list"][0]["type"], 1);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/list",
        &token_for(&login_only),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], 40300);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coupon/add",
        &token_for(&admin_only),
        json!({ "code": "NOPE", "type": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = common::get(common::build_test_app(pool), "/api/v1/coupon/types").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], 40100);
}
