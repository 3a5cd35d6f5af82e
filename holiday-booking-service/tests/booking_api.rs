use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use holiday_booking_service::create_app;
use serde_json::{Value, json};
use tower::ServiceExt;

const BOOK: &str = "/tools/holiday/book";

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

async fn book(app: &Router, request_id: &str, params: Value) -> (StatusCode, Value) {
    post(app, BOOK, json!({ "request_id": request_id, "params": params })).await
}

fn variable_names(data: &Value) -> Vec<String> {
    data["interactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["variable_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_empty_params_asks_every_required_field() {
    let app = create_app();
    let (status, data) = book(&app, "s998", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["request_id"], "s998");
    assert_eq!(data["complete"], false);
    assert!(data["booking_id"].is_null());
    assert_eq!(variable_names(&data), vec!["name", "country", "age"]);

    let first = &data["interactions"][0];
    assert_eq!(first["question"], "What is your name?");
    assert_eq!(first["variable_type"], "str");
    assert!(first["options"].is_null());
    assert!(first["answer"].is_null());
    assert_eq!(first["complete"], false);
}

#[tokio::test]
async fn test_partial_params_list_remaining_fields_in_order() {
    let app = create_app();

    let (_, data) = book(&app, "s28", json!({"name": "lisa"})).await;
    assert_eq!(variable_names(&data), vec!["country", "age"]);

    let (_, data) = book(&app, "s61", json!({"age": "30"})).await;
    assert_eq!(variable_names(&data), vec!["name", "country"]);

    let (_, data) = book(&app, "s121", json!({"name": "alice", "country": "Canada"})).await;
    assert_eq!(variable_names(&data), vec!["age"]);
    assert_eq!(data["interactions"][0]["question"], "What is your age?");

    let (_, data) = book(&app, "s444", json!({"country": "UK", "age": "45"})).await;
    assert_eq!(variable_names(&data), vec!["name"]);
}

#[tokio::test]
async fn test_blank_values_count_as_missing() {
    let app = create_app();

    let (status, data) = book(&app, "s993", json!({"name": "", "country": "", "age": ""})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(variable_names(&data), vec!["name", "country", "age"]);

    let (_, data) = book(&app, "s7a2", json!({"name": "Emily", "country": "", "age": "25"})).await;
    assert_eq!(variable_names(&data), vec!["country"]);
    assert_eq!(data["interactions"][0]["question"], "What is your country of birth?");
}

#[tokio::test]
async fn test_complete_params_issue_booking() {
    let app = create_app();
    let (status, data) = book(
        &app,
        "s995",
        json!({"name": "Michael", "country": "Germany", "age": "40", "additional_param": "value"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["complete"], true);
    assert!(data["booking_id"].as_str().is_some());
    assert!(data["interactions"].is_null());
    assert_eq!(data["params"]["additional_param"], "value");
}

#[tokio::test]
async fn test_over_fifty_requires_insurance() {
    let app = create_app();

    let (status, data) =
        book(&app, "s555", json!({"name": "Emma", "country": "Australia", "age": "150"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data["complete"], false);
    assert!(data["booking_id"].is_null());
    let insurance = &data["interactions"][0];
    assert_eq!(insurance["variable_name"], "insurance");
    assert_eq!(insurance["question"], "As you are over 50, do you need insurance?");
    assert_eq!(insurance["options"], json!(["yes", "no"]));

    let (_, data) = book(&app, "s555", json!({"insurance": "Yes"})).await;
    assert_eq!(data["complete"], true);
    assert!(data["booking_id"].as_str().is_some());

    let (_, data) = book(
        &app,
        "s53",
        json!({"name": "sophia", "country": "France", "age": "50"}),
    )
    .await;
    assert_eq!(data["complete"], true);
}

#[tokio::test]
async fn test_details_accumulate_across_calls() {
    let app = create_app();

    let (_, first) = book(&app, "multi-1", json!({"name": "marshall"})).await;
    assert_eq!(first["complete"], false);

    let (_, second) = book(&app, "multi-1", json!({"country": "UK"})).await;
    assert_eq!(variable_names(&second), vec!["age"]);

    let (_, third) = book(&app, "multi-1", json!({"age": "78"})).await;
    assert_eq!(variable_names(&third), vec!["insurance"]);

    let (_, done) = book(&app, "multi-1", json!({"insurance": "no"})).await;
    assert_eq!(done["complete"], true);
    assert_eq!(done["params"], json!({"name": "marshall", "country": "UK", "age": "78", "insurance": "no"}));
}

#[tokio::test]
async fn test_completed_booking_is_idempotent_and_frozen() {
    let app = create_app();
    let params = json!({"name": "Emma", "country": "France", "age": "25"});

    let (_, first) = book(&app, "s994", params.clone()).await;
    let (_, second) = book(&app, "s994", params).await;
    assert_eq!(first, second);

    let (status, third) = book(&app, "s994", json!({"name": "Someone Else", "age": "99"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third, first);

    let request = Request::builder()
        .uri(format!("{BOOK}/s994"))
        .body(Body::empty())
        .unwrap();
    let (status, stored) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, first);
}

#[tokio::test]
async fn test_unknown_booking_lookup_is_not_found() {
    let app = create_app();
    let request = Request::builder()
        .uri(format!("{BOOK}/nope"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_malformed_bodies_are_unprocessable() {
    let app = create_app();

    let (status, data) = post(&app, BOOK, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let detail = data["detail"].as_array().unwrap();
    assert_eq!(detail.len(), 2);
    assert!(detail.iter().all(|d| d.get("msg").is_some()));

    let (status, data) = post(&app, BOOK, json!({"params": {}})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(data["detail"][0]["loc"], json!(["body", "request_id"]));
    assert_eq!(data["detail"][0]["type"], "missing");

    let (status, data) = post_raw(&app, BOOK, "invalid_json_format").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(data["detail"][0]["type"], "json_invalid");

    let (status, _) = post(&app, BOOK, json!({"request_id": "s1", "params": {"age": 30}})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_field_errors() {
    let app = create_app();

    let (status, data) =
        book(&app, "s1000", json!({"name": "Bob", "country": "France", "age": "twenty"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(data["detail"][0]["loc"], json!(["body", "params", "age"]));

    let cases = [
        json!({"name": "Alice", "country": "Neverland", "age": "25"}),
        json!({"name": "Oscar", "country": "Belgium", "age": "0"}),
        json!({"name": "Ella", "country": "Norway", "age": "15450"}),
        json!({"name": "Ella", "country": "Norway", "age": "99999999999999999999"}),
        json!({"name": "A".repeat(1000), "country": "Australia", "age": "45"}),
        json!({"name": "Sarah", "country": "B".repeat(1000), "age": "30"}),
        json!({"name": "Max", "country": "Spain", "age": "60", "insurance": "maybe yes"}),
    ];
    for (idx, params) in cases.into_iter().enumerate() {
        let (status, data) = book(&app, &format!("bad-{idx}"), params).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {idx}");
        assert!(data["detail"].is_string(), "case {idx}");
    }

    // nothing was stored for the rejected submission
    let (_, data) = book(&app, "s1000", json!({})).await;
    assert_eq!(variable_names(&data), vec!["name", "country", "age"]);
}

#[tokio::test]
async fn test_invalid_request_ids_are_bad_requests() {
    let app = create_app();
    let params = json!({"name": "Nina", "country": "Spain", "age": "26"});

    let (status, _) = book(&app, "", params.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = book(&app, "invalid_id", params).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mixed_case_and_short_country_names() {
    let app = create_app();
    for (id, country) in [("s19", "uSa"), ("s21", "US"), ("s20", "Papua New Guinea"), ("s1", "UK")] {
        let (status, data) =
            book(&app, id, json!({"name": "hannah", "country": country, "age": "22"})).await;
        assert_eq!(status, StatusCode::OK, "{country}");
        assert_eq!(data["complete"], true, "{country}");
    }
}

#[tokio::test]
async fn test_responses_carry_correlation_id() {
    let app = create_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let id = response
        .headers()
        .get("x-correlation-id")
        .expect("correlation id header");
    assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
}
