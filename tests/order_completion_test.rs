// ==========================================
// 订单完成与配送员统计集成测试
// ==========================================


use courier_dispatch::api::ApiError;
use courier_dispatch::app::AppState;
use courier_dispatch::domain::{CompleteInfo, CourierType};
use courier_dispatch::logging;
use test_helpers::{create_test_db, new_courier, new_order};

fn setup() -> (tempfile::NamedTempFile, AppState) {
    logging::init_test();
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to create AppState");
    (temp_file, state)
}

fn complete(courier_id: i64, order_id: i64, complete_time: &str) -> CompleteInfo {
    CompleteInfo {
        courier_id,
        order_id,
        complete_time: complete_time.to_string(),
    }
}

/// 一个 FOOT 配送员 + 两个已分配订单（100 / 80）
fn seed_assigned(state: &AppState) -> (i64, Vec<i64>) {
    let courier_ids = state
        .courier_api
        .create_couriers(vec![new_courier(CourierType::Foot, &[1], &["09:00-18:00"])])
        .unwrap();
    let order_ids = state
        .order_api
        .create_orders(vec![
            new_order(3.0, 1, &["09:00-10:00"], 100.0),
            new_order(3.0, 1, &["10:05-11:00"], 100.0),
        ])
        .unwrap();
    state.assignment_api.assign_orders(Some("2023-05-10")).unwrap();
    (courier_ids[0], order_ids)
}

#[test]
fn test_complete_orders_only_for_owner() {
    let (_temp_file, state) = setup();
    let (courier_id, order_ids) = seed_assigned(&state);
    let stranger = state
        .courier_api
        .create_couriers(vec![new_courier(CourierType::Bike, &[1], &["09:00-18:00"])])
        .unwrap()[0];

    let completed = state
        .order_api
        .complete_orders(vec![
            complete(courier_id, order_ids[0], "2023-05-10T09:45:00"),
            complete(stranger, order_ids[1], "2023-05-10T10:45:00"),
            complete(courier_id, 9_999, "2023-05-10T10:45:00"),
        ])
        .unwrap();

    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].order_id, order_ids[0]);
    assert!(completed[0].complete_time.is_some());

    let untouched = state.order_api.get_order(order_ids[1]).unwrap();
    assert!(untouched.complete_time.is_none());
}

#[test]
fn test_complete_orders_twice_is_noop() {
    let (_temp_file, state) = setup();
    let (courier_id, order_ids) = seed_assigned(&state);

    let first = state
        .order_api
        .complete_orders(vec![complete(courier_id, order_ids[0], "2023-05-10 09:45:00")])
        .unwrap();
    let second = state
        .order_api
        .complete_orders(vec![complete(courier_id, order_ids[0], "2023-05-10 11:00:00")])
        .unwrap();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    let order = state.order_api.get_order(order_ids[0]).unwrap();
    assert_eq!(
        order.complete_time.map(|t| t.to_string()),
        Some("2023-05-10 09:45:00".to_string())
    );
}

#[test]
fn test_invalid_complete_time_rejects_batch() {
    let (_temp_file, state) = setup();
    let (courier_id, order_ids) = seed_assigned(&state);

    let err = state
        .order_api
        .complete_orders(vec![
            complete(courier_id, order_ids[0], "2023-05-10T09:45:00"),
            complete(courier_id, order_ids[1], "yesterday"),
        ])
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let order = state.order_api.get_order(order_ids[0]).unwrap();
    assert!(order.complete_time.is_none());
}

#[test]
fn test_meta_info_rating_and_earnings() {
    let (_temp_file, state) = setup();
    let (courier_id, order_ids) = seed_assigned(&state);

    state
        .order_api
        .complete_orders(vec![
            complete(courier_id, order_ids[0], "2023-05-10T09:45:00"),
            complete(courier_id, order_ids[1], "2023-05-10T10:50:00"),
        ])
        .unwrap();

    let meta = state
        .courier_api
        .get_meta_info(courier_id, "2023-05-10", "2023-05-11")
        .unwrap();

    // 2 单 / (1 天 × 24) × 3
    assert_eq!(meta.rating, Some(0.25));
    // (100 + 80) × 2
    assert_eq!(meta.earnings, Some(360.0));
    assert_eq!(meta.courier_type, CourierType::Foot);
    assert_eq!(meta.regions, vec![1]);
}

#[test]
fn test_meta_info_without_completed_orders_omits_fields() {
    let (_temp_file, state) = setup();
    let (courier_id, _order_ids) = seed_assigned(&state);

    let meta = state
        .courier_api
        .get_meta_info(courier_id, "2023-05-01", "2023-05-31")
        .unwrap();
    let json = serde_json::to_value(&meta).unwrap();

    assert!(json.get("rating").is_none());
    assert!(json.get("earnings").is_none());
    assert_eq!(json["courier_id"], courier_id);
}

#[test]
fn test_meta_info_outside_range_not_counted() {
    let (_temp_file, state) = setup();
    let (courier_id, order_ids) = seed_assigned(&state);

    state
        .order_api
        .complete_orders(vec![complete(courier_id, order_ids[0], "2023-05-12T09:45:00")])
        .unwrap();

    let meta = state
        .courier_api
        .get_meta_info(courier_id, "2023-05-10", "2023-05-11")
        .unwrap();
    assert_eq!(meta.rating, None);
    assert_eq!(meta.earnings, None);
}

#[test]
fn test_meta_info_validation() {
    let (_temp_file, state) = setup();
    let (courier_id, _order_ids) = seed_assigned(&state);

    let err = state
        .courier_api
        .get_meta_info(courier_id, "2023-05-11", "2023-05-10")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .courier_api
        .get_meta_info(courier_id, "2023-05-10", "2023-05-10")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .courier_api
        .get_meta_info(courier_id, "May 10", "2023-05-11")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .courier_api
        .get_meta_info(424_242, "2023-05-10", "2023-05-11")
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_create_validation_rejects_whole_batch() {
    let (_temp_file, state) = setup();

    let err = state
        .order_api
        .create_orders(vec![
            new_order(1.0, 1, &["09:00-10:00"], 100.0),
            new_order(-1.0, 1, &["09:00-10:00"], 100.0),
        ])
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .courier_api
        .create_couriers(vec![new_courier(CourierType::Auto, &[], &["09:00-10:00"])])
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = state
        .courier_api
        .create_couriers(vec![new_courier(CourierType::Auto, &[1], &["25:00-26:00"])])
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    assert!(matches!(state.order_api.get_order(1), Err(ApiError::NotFound(_))));
    assert!(matches!(state.courier_api.get_courier(1), Err(ApiError::NotFound(_))));
}
