use std::time::Duration;

use ecovolt_api::types::Category;
use ecovolt_api::{CancellationToken, Client, Error, ProductQuery, Query};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client_for(server: &MockServer) -> Client {
    Client::with_base_url(&format!("{}/api/products", server.uri()))
}

#[tokio::test]
async fn get_products_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products.json");

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "8"))
        .and(query_param("sortBy", "name"))
        .and(query_param("sortOrder", "asc"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .get_products(&ProductQuery::default(), &CancellationToken::new())
        .await;
    assert!(result.is_ok());

    let page = result.unwrap();
    assert_eq!(page.items.len(), 3);
    assert!(page.pagination.has_more);
}

#[tokio::test]
async fn get_products_by_category_and_brand() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("products.json");

    Mock::given(method("GET"))
        .and(path("/api/products/category/inverters/deye"))
        .and(query_param("page", "2"))
        .and(query_param("search", "hybrid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = ProductQuery::default()
        .with_category(Category::Inverters)
        .with_subcategory("deye")
        .with_search("hybrid")
        .with_page(2);
    let page = client_for(&mock_server)
        .get_products(&query, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(page.items[0].brand(), Some("Deye"));
}

#[tokio::test]
async fn get_products_http_error_carries_backend_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"success": false, "error": "Mongo is down"})),
        )
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .get_products(&ProductQuery::default(), &CancellationToken::new())
        .await;
    match result {
        Err(Error::HttpStatus { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Mongo is down");
        }
        other => panic!("expected HTTP error, got {:?}", other.map(|p| p.items.len())),
    }
}

#[tokio::test]
async fn get_products_http_error_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/category/ups"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let query = ProductQuery::default().with_category(Category::Ups);
    let err = client_for(&mock_server)
        .get_products(&query, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    assert!(err.to_string().contains("HTTP 404: Not Found"));
}

#[tokio::test]
async fn get_products_success_flag_false() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("products_failure.json")))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_products(&ProductQuery::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Server { ref message } if message == "Database temporarily unavailable"));
}

#[tokio::test]
async fn get_products_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_products(&ProductQuery::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Server { .. }));
}

#[tokio::test]
async fn get_products_network_failure() {
    // Nothing listens on the discard port.
    let client = Client::with_base_url("http://127.0.0.1:9/api/products");
    let err = client
        .get_products(&ProductQuery::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn cancelled_request_returns_cancelled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture("products.json"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let token = CancellationToken::new();
    let canceller = token.clone();
    let query = ProductQuery::default();
    let (result, _) = tokio::join!(
        client.get_products(&query, &token),
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        }
    );
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn already_cancelled_token_skips_the_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("products.json")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let result = client_for(&mock_server)
        .get_products(&ProductQuery::default(), &token)
        .await;
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn get_product_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/66a1f0c2e4b0a1a2b3c4d501"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("product.json")))
        .mount(&mock_server)
        .await;

    let product = client_for(&mock_server)
        .get_product("66a1f0c2e4b0a1a2b3c4d501", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(product.name(), Some("Deye SUN-6K-SG03LP1-EU"));
}

#[tokio::test]
async fn get_product_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/products/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"success": false, "error": "Product not found"})),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .get_product("missing", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, ref message } if message == "Product not found"));
}
