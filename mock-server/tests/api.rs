use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Customer, Order};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_customers_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/customers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let customers: Vec<Customer> = body_json(resp).await;
    assert!(customers.is_empty());
}

#[tokio::test]
async fn list_customers_rejects_non_numeric_limit() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/customers?limit=lots"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_customer_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/customers", r#"{"name":"Ada"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let customer: Customer = body_json(resp).await;
    assert_eq!(customer.name, "Ada");
    assert_eq!(customer.id, 1);
    assert!(customer.email.is_none());
}

#[tokio::test]
async fn create_customer_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/customers", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_customer_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/customers/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_customer_bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/customers/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_customer_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/customers/99", r#"{"name":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_customer_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/api/customers/99"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_of_unknown_customer_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/customers/99/orders"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn customer_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two
    for body in [r#"{"name":"Ada"}"#, r#"{"name":"Grace","email":"g@example.com"}"#] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/api/customers", body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // list with since_id skips the first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/customers?since_id=1&limit=5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let customers: Vec<Customer> = body_json(resp).await;
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Grace");

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/api/customers/1", r#"{"email":"ada@example.com"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Customer = body_json(resp).await;
    assert_eq!(updated.name, "Ada");
    assert_eq!(updated.email.as_deref(), Some("ada@example.com"));

    // order for customer 1
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/customers/1/orders", r#"{"total_cents":1250}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Order = body_json(resp).await;
    assert_eq!(order.customer_id, 1);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/customers/1/orders"))
        .await
        .unwrap();
    let orders: Vec<Order> = body_json(resp).await;
    assert_eq!(orders, vec![order]);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/api/customers/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // gone
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/customers/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
