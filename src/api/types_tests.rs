//! Unit tests for portal API contracts.
//!
//! Covers request serialization, response decoding and the list query
//! builder.

use super::*;
use crate::storage::UserType;
use serde_json::json;

// ============================================================================
// Auth contracts
// ============================================================================

#[test]
fn test_register_request_sends_null_company() {
    let req = RegisterRequest {
        username: "alice".to_string(),
        password: "secret".to_string(),
        email: "alice@example.com".to_string(),
        region: "Shanghai".to_string(),
        trading_products: vec!["LNG".to_string()],
        company_name: None,
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["company_name"], serde_json::Value::Null);
    assert_eq!(value["trading_products"], json!(["LNG"]));
}

#[test]
fn test_login_response_success() {
    let resp: LoginResponse = serde_json::from_value(json!({
        "success": true,
        "message": "ok",
        "token": "t1",
        "user": {"username": "alice", "user_type": "free"}
    }))
    .unwrap();
    assert!(resp.success);
    assert_eq!(resp.token.as_deref(), Some("t1"));
    let user = resp.user.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.user_type, UserType::Free);
}

#[test]
fn test_login_response_failure_without_token() {
    let resp: LoginResponse =
        serde_json::from_value(json!({"success": false, "message": "bad credentials"})).unwrap();
    assert!(!resp.success);
    assert!(resp.token.is_none());
    assert!(resp.user.is_none());
}

#[test]
fn test_regions_response_requires_field() {
    let err = serde_json::from_value::<RegionsResponse>(json!({"items": []})).unwrap_err();
    assert!(err.to_string().contains("regions"));
}

#[test]
fn test_action_response_defaults_success_false() {
    let resp: ActionResponse = serde_json::from_value(json!({})).unwrap();
    assert!(!resp.success);
}

// ============================================================================
// List contracts
// ============================================================================

#[test]
fn test_list_response_decodes_total() {
    let resp: ListResponse = serde_json::from_value(json!({
        "data": [{"title": "a"}],
        "total": 42,
        "page": 1,
        "limit": 1
    }))
    .unwrap();
    assert_eq!(resp.data.len(), 1);
    assert_eq!(resp.total_or_len(), 42);
}

#[test]
fn test_list_response_total_falls_back_to_count_then_len() {
    let resp: ListResponse =
        serde_json::from_value(json!({"data": [{}, {}], "count": 5})).unwrap();
    assert_eq!(resp.total_or_len(), 5);

    let resp: ListResponse = serde_json::from_value(json!({"data": [{}, {}]})).unwrap();
    assert_eq!(resp.total_or_len(), 2);
}

#[test]
fn test_list_response_requires_data() {
    assert!(serde_json::from_value::<ListResponse>(json!({"total": 3})).is_err());
}

#[test]
fn test_list_query_pairs() {
    let query = ListQuery::new()
        .with_days(7)
        .with_product_type("LNG")
        .with_region("");
    assert_eq!(
        query.to_pairs(),
        vec![
            ("days".to_string(), "7".to_string()),
            ("product_type".to_string(), "LNG".to_string()),
        ]
    );
}

#[test]
fn test_list_query_empty() {
    assert!(ListQuery::default().to_pairs().is_empty());
}

#[test]
fn test_list_query_full_order() {
    let query = ListQuery::new()
        .with_page(2)
        .with_limit(10)
        .with_category("policy")
        .with_report_type("weekly")
        .with_index_name("LNG-East");
    let keys: Vec<String> = query.to_pairs().into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec!["page", "limit", "category", "report_type", "index_name"]
    );
}

// ============================================================================
// Recommendation contracts
// ============================================================================

#[test]
fn test_hot_topics_defaults_missing_deals() {
    let topics: HotTopics =
        serde_json::from_value(json!({"hot_news": [{"title": "x"}]})).unwrap();
    assert_eq!(topics.hot_news.len(), 1);
    assert!(topics.hot_deals.is_empty());
}

#[test]
fn test_personalized_defaults() {
    let recs: PersonalizedRecommendations = serde_json::from_value(json!({})).unwrap();
    assert!(recs.news.is_empty());
    assert!(recs.reports.is_empty());
    assert!(recs.price_alerts.is_empty());
}
