mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_default_price_is_seeded() {
    let app = setup().await;

    let (status, json) = get_json(&app.router, "/prices").await;

    assert_eq!(status, StatusCode::OK);
    let prices = json.as_array().unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0]["name"], "Inscripcion");
    assert_eq!(prices[0]["value"], 1000);
}

#[tokio::test]
async fn test_seed_does_not_override_edited_price() {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite://{}", dir.path().join("shared.db").display());

    let first = setup_with(|config, _| config.database_url = database_url.clone()).await;
    let (status, _) = put_json(&first.router, "/prices/Inscripcion", &json!({ "value": 3000 })).await;
    assert_eq!(status, StatusCode::OK);
    first.pool.close().await;

    let second = setup_with(|config, _| config.database_url = database_url.clone()).await;
    let (_, json) = get_json(&second.router, "/prices").await;
    assert_eq!(json[0]["value"], 3000);
}

#[tokio::test]
async fn test_repeated_update_keeps_single_record() {
    let app = setup().await;

    for _ in 0..2 {
        let (status, json) = put_json(&app.router, "/prices/Renovacion", &json!({ "value": 500 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "Renovacion");
        assert_eq!(json["value"], 500);
    }

    let (_, json) = get_json(&app.router, "/prices").await;
    let renewals: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["name"] == "Renovacion")
        .collect();
    assert_eq!(renewals.len(), 1);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_strict_mode_rejects_unknown_price() {
    let app = setup_with(|config, _| config.strict_prices = true).await;

    let (status, json) = put_json(&app.router, "/prices/Renovacion", &json!({ "value": 500 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "price_not_found");

    let (status, json) = put_json(&app.router, "/prices/Inscripcion", &json!({ "value": 1500 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], 1500);
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let app = setup().await;

    let (status, json) = put_json(&app.router, "/prices/Inscripcion", &json!({ "value": -1 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");

    let (_, json) = get_json(&app.router, "/prices").await;
    assert_eq!(json[0]["value"], 1000);
}

#[tokio::test]
async fn test_malformed_price_body_keeps_error_envelope() {
    let app = setup().await;

    let (status, json) =
        put_json(&app.router, "/prices/Inscripcion", &json!({ "value": "mucho" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
    assert!(json["error"]["message"].as_str().unwrap().contains("value"));

    let (_, json) = get_json(&app.router, "/prices").await;
    assert_eq!(json[0]["value"], 1000);
}

#[tokio::test]
async fn test_price_name_with_reserved_characters() {
    let app = setup().await;

    let (status, json) =
        put_json(&app.router, "/prices/Tasa%2FAnual%20%232", &json!({ "value": 700 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Tasa/Anual #2");
}
