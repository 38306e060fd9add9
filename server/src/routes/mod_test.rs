use uuid::Uuid;

use super::*;
use crate::services::menu::MenuError;
use crate::services::order::OrderError;
use crate::services::workflow::{IllegalTransition, OrderStatus};
use crate::state::test_helpers;

#[test]
fn api_error_maps_classes_to_statuses() {
    let err = api_error(MenuError::NotFound(Uuid::nil()));
    assert_eq!(err.status, StatusCode::NOT_FOUND);
    assert_eq!(err.body.code, "E_MENU_ITEM_NOT_FOUND");

    let err = api_error(OrderError::Validation("quantity must be at least 1".into()));
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body.message, "quantity must be at least 1");

    let err = api_error(OrderError::from(IllegalTransition { from: OrderStatus::Delivered, to: OrderStatus::Pending }));
    assert_eq!(err.status, StatusCode::CONFLICT);
    assert_eq!(err.body.code, "E_INVALID_TRANSITION");
}

#[test]
fn internal_errors_hide_details() {
    let err = api_error(OrderError::Database(sqlx::Error::PoolTimedOut));
    assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.body.code, "E_DATABASE");
    assert_eq!(err.body.message, "internal error");
}

#[test]
fn document_response_sets_headers() {
    let response = document_response(RenderedDocument {
        content_type: "application/pdf",
        file_name: "receipt-7.pdf".into(),
        body: b"%PDF-1.4".to_vec(),
    });
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(response.headers()[CONTENT_DISPOSITION], "inline; filename=\"receipt-7.pdf\"");
}

#[tokio::test]
async fn healthz_is_ok() {
    let addr = test_helpers::spawn_server(test_helpers::test_app_state()).await;
    let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn bad_input_is_rejected_with_a_json_error_before_the_database() {
    let addr = test_helpers::spawn_server(test_helpers::test_app_state()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{addr}/api/orders"))
        .json(&serde_json::json!({
            "customer_name": "Ana",
            "source": "walk_in",
            "payment_method": "cash",
            "items": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "E_VALIDATION");
    assert_eq!(body["message"], "an order needs at least one item");

    let response = client
        .get(format!("http://{addr}/api/orders?status=shipped"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("http://{addr}/api/orders/{}/ticket?format=docx", Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("docx"));

    let response = client
        .get(format!("http://{addr}/api/dashboard/summary?from=2024-03-10&to=2024-03-01"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[test]
fn extractor_rejections_use_the_api_error_shape() {
    let err = extract::rejection_error(StatusCode::UNPROCESSABLE_ENTITY, "unknown variant `drone`".into());
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert_eq!(err.body.code, "E_VALIDATION");
    assert_eq!(err.body.message, "unknown variant `drone`");

    let err = extract::rejection_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, "expected json".into());
    assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let err = extract::rejection_error(StatusCode::INTERNAL_SERVER_ERROR, "missing path params".into());
    assert_eq!(err.body.message, "internal error");
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let addr = test_helpers::spawn_server(test_helpers::test_app_state()).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("http://{addr}/api/orders/not-a-uuid")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "E_VALIDATION");

    let response = client
        .post(format!("http://{addr}/api/orders"))
        .json(&serde_json::json!({
            "customer_name": "Ana",
            "source": "drone",
            "payment_method": "cash",
            "items": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "E_VALIDATION");
    assert!(body["message"].as_str().unwrap().contains("drone"));

    let response = client
        .post(format!("http://{addr}/api/orders"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "E_VALIDATION");

    let response = client.get(format!("http://{addr}/api/orders?limit=many")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "E_VALIDATION");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
async fn live_customer_history_over_http() {
    use crate::config::RestaurantConfig;
    use crate::state::AppState;

    let pool = test_helpers::live_pool().await;
    let addr = test_helpers::spawn_server(AppState::new(pool, RestaurantConfig::default(), 16)).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("http://{addr}/api/customers/{}/orders", Uuid::new_v4())).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let customer: serde_json::Value = client
        .post(format!("http://{addr}/api/customers"))
        .json(&serde_json::json!({ "name": "History Regular", "phone": "555-4400" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let customer_id = customer["id"].as_str().unwrap().to_owned();

    let mut order_ids = Vec::new();
    for item in ["Milanesa", "Ñoquis"] {
        let response = client
            .post(format!("http://{addr}/api/orders"))
            .json(&serde_json::json!({
                "customer_id": customer_id,
                "source": "phone",
                "payment_method": "card",
                "items": [{ "name": item, "unit_price_cents": 1200, "quantity": 1 }]
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let order: serde_json::Value = response.json().await.unwrap();
        assert_eq!(order["customer_name"], "History Regular");
        order_ids.push(order["id"].as_str().unwrap().to_owned());
    }

    let history: Vec<serde_json::Value> = client
        .get(format!("http://{addr}/api/customers/{customer_id}/orders"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stats: serde_json::Value = client
        .get(format!("http://{addr}/api/customers/{customer_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    for id in &order_ids {
        client.delete(format!("http://{addr}/api/orders/{id}")).send().await.unwrap();
    }
    client.delete(format!("http://{addr}/api/customers/{customer_id}")).send().await.unwrap();

    let listed: Vec<&str> = history.iter().map(|o| o["id"].as_str().unwrap()).collect();
    assert_eq!(listed, vec![order_ids[1].as_str(), order_ids[0].as_str()]);
    assert_eq!(history[0]["items"][0]["name"], "Ñoquis");
    assert_eq!(stats["order_count"], 2);
    assert_eq!(stats["total_spent_cents"], 2400);
}
