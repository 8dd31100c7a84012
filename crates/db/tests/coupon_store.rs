use assert_matches::assert_matches;
use coupon_db::models::coupon::{CouponFilter, CreateCoupon, UpdateCoupon};
use coupon_db::repositories::CouponRepo;
use sqlx::SqlitePool;

fn new_coupon(code: &str) -> CreateCoupon {
    CreateCoupon {
        code: code.to_string(),
        coupon_type: 1,
        creator: 1,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: SqlitePool) {
    coupon_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_then_find_by_code(pool: SqlitePool) {
    let created = CouponRepo::create(&pool, &new_coupon("FIT-001")).await.unwrap();
    assert_eq!(created.taker, 0);
    assert!(!created.is_claimed());
    assert_eq!(created.created_at, created.updated_at);

    let found = CouponRepo::find_by_code(&pool, "FIT-001")
        .await
        .unwrap()
        .expect("coupon should exist");
    assert_eq!(found.id, created.id);
    assert_eq!(found.coupon_type, 1);
    assert_eq!(found.creator, 1);

    assert!(CouponRepo::find_by_code(&pool, "fit-001").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_code_is_unique_violation(pool: SqlitePool) {
    CouponRepo::create(&pool, &new_coupon("DUP")).await.unwrap();
    let err = CouponRepo::create(&pool, &new_coupon("DUP")).await.unwrap_err();
    assert!(coupon_db::is_unique_violation(&err), "got {err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_create_skips_existing_codes(pool: SqlitePool) {
    CouponRepo::create(&pool, &new_coupon("B")).await.unwrap();

    let batch: Vec<_> = ["A", "B", "C"].into_iter().map(new_coupon).collect();
    let inserted = CouponRepo::bulk_create(&pool, &batch).await.unwrap();
    assert_eq!(inserted, vec!["A".to_string(), "C".to_string()]);

    let again = CouponRepo::bulk_create(&pool, &batch).await.unwrap();
    assert!(again.is_empty());
    assert_eq!(CouponRepo::count_available_by_type(&pool, 1).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_claim_is_conditional(pool: SqlitePool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("ONE")).await.unwrap();

    assert_eq!(CouponRepo::claim(&pool, coupon.id, 7, 1_000).await.unwrap(), 1);
    assert_eq!(CouponRepo::claim(&pool, coupon.id, 8, 2_000).await.unwrap(), 0);

    let stored = CouponRepo::find_by_id(&pool, coupon.id).await.unwrap().unwrap();
    assert_eq!(stored.taker, 7);
    assert_eq!(stored.updated_at, 1_000);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_available_one_picks_lowest_id(pool: SqlitePool) {
    let first = CouponRepo::create(&pool, &new_coupon("X1")).await.unwrap();
    let second = CouponRepo::create(&pool, &new_coupon("X2")).await.unwrap();

    let picked = CouponRepo::find_available_one(&pool, 1).await.unwrap().unwrap();
    assert_eq!(picked.id, first.id);

    CouponRepo::claim(&pool, first.id, 3, 10).await.unwrap();
    let picked = CouponRepo::find_available_one(&pool, 1).await.unwrap().unwrap();
    assert_eq!(picked.id, second.id);

    CouponRepo::claim(&pool, second.id, 4, 20).await.unwrap();
    assert!(CouponRepo::find_available_one(&pool, 1).await.unwrap().is_none());
    assert!(CouponRepo::find_available_one(&pool, 2).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_most_recent_by_taker_and_type(pool: SqlitePool) {
    let a = CouponRepo::create(&pool, &new_coupon("R1")).await.unwrap();
    let b = CouponRepo::create(&pool, &new_coupon("R2")).await.unwrap();
    CouponRepo::claim(&pool, a.id, 5, 100).await.unwrap();
    CouponRepo::claim(&pool, b.id, 5, 900).await.unwrap();

    let latest = CouponRepo::most_recent_by_taker_and_type(&pool, 5, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, b.id);
    assert_eq!(latest.updated_at, 900);

    assert!(CouponRepo::most_recent_by_taker_and_type(&pool, 6, 1)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filtered_by_taken_state(pool: SqlitePool) {
    for code in ["L1", "L2", "L3"] {
        CouponRepo::create(&pool, &new_coupon(code)).await.unwrap();
    }
    let claimed = CouponRepo::find_by_code(&pool, "L2").await.unwrap().unwrap();
    CouponRepo::claim(&pool, claimed.id, 9, 50).await.unwrap();

    let all = CouponRepo::list_filtered(&pool, CouponFilter::default(), 0, 10)
        .await
        .unwrap();
    let codes: Vec<_> = all.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["L3", "L2", "L1"]);

    let taken = CouponFilter {
        coupon_type: Some(1),
        taken: Some(true),
    };
    assert_eq!(CouponRepo::count_filtered(&pool, taken).await.unwrap(), 1);

    let open = CouponFilter {
        coupon_type: None,
        taken: Some(false),
    };
    let rows = CouponRepo::list_filtered(&pool, open, 0, 1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, "L3");
    assert_eq!(CouponRepo::count_filtered(&pool, open).await.unwrap(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_by_taker(pool: SqlitePool) {
    for code in ["T1", "T2", "T3"] {
        CouponRepo::create(&pool, &new_coupon(code)).await.unwrap();
    }
    let t1 = CouponRepo::find_by_code(&pool, "T1").await.unwrap().unwrap();
    let t3 = CouponRepo::find_by_code(&pool, "T3").await.unwrap().unwrap();
    CouponRepo::claim(&pool, t1.id, 11, 500).await.unwrap();
    CouponRepo::claim(&pool, t3.id, 11, 100).await.unwrap();

    let mine = CouponRepo::list_by_taker(&pool, 11, None, 0, 10).await.unwrap();
    let codes: Vec<_> = mine.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["T1", "T3"]);
    assert_eq!(CouponRepo::count_by_taker(&pool, 11, Some(1)).await.unwrap(), 2);
    assert_eq!(CouponRepo::count_by_taker(&pool, 11, Some(2)).await.unwrap(), 0);
    assert!(CouponRepo::list_by_taker(&pool, 12, None, 0, 10)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_claimed_coupon_cannot_be_updated_or_deleted(pool: SqlitePool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("LOCK")).await.unwrap();
    CouponRepo::claim(&pool, coupon.id, 2, 42).await.unwrap();

    let edit = UpdateCoupon {
        code: Some("LOCK-2".to_string()),
        coupon_type: None,
    };
    assert!(CouponRepo::update_unclaimed(&pool, coupon.id, &edit, 99)
        .await
        .unwrap()
        .is_none());
    assert!(!CouponRepo::delete_unclaimed(&pool, coupon.id).await.unwrap());

    let stored = CouponRepo::find_by_id(&pool, coupon.id).await.unwrap().unwrap();
    assert_eq!(stored.code, "LOCK");
    assert_eq!(stored.updated_at, 42);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unclaimed_coupon_update_and_delete(pool: SqlitePool) {
    let coupon = CouponRepo::create(&pool, &new_coupon("EDIT")).await.unwrap();
    let edit = UpdateCoupon {
        code: Some("EDITED".to_string()),
        coupon_type: None,
    };
    let updated = CouponRepo::update_unclaimed(&pool, coupon.id, &edit, 77)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.code, "EDITED");
    assert_eq!(updated.coupon_type, 1);
    assert_eq!(updated.updated_at, 77);

    assert!(CouponRepo::delete_unclaimed(&pool, coupon.id).await.unwrap());
    assert_matches!(CouponRepo::find_by_id(&pool, coupon.id).await, Ok(None));
}
