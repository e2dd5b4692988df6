use std::sync::Arc;

use async_trait::async_trait;
use merx_api::{app, AppState};
use merx_catalog::{NewProduct, Product, QuantityUpdate};
use merx_core::repository::RepoResult;
use merx_core::ProductRepository;
use merx_store::{MemoryCustomerRepository, MemoryOrderRepository, MemoryProductRepository};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

struct TestServer {
    base_url: String,
    products: Arc<MemoryProductRepository>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port over in-memory
        // repositories.
        let products = Arc::new(MemoryProductRepository::new());
        let state = AppState::new(
            Arc::new(MemoryCustomerRepository::new()),
            products.clone(),
            Arc::new(MemoryOrderRepository::new()),
        );
        let app = app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            products,
            handle,
        }
    }

    async fn stock_of(&self, id: &str) -> i32 {
        let id = Uuid::parse_str(id).unwrap();
        self.products.find_all_by_id(&[id]).await.unwrap()[0].quantity
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_customer(client: &reqwest::Client, base_url: &str, email: &str) -> String {
    let res = client
        .post(format!("{}/customers", base_url))
        .json(&json!({"name": "Ada", "email": email}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
    price_cents: i64,
    quantity: i32,
) -> String {
    let res = client
        .post(format!("{}/products", base_url))
        .json(&json!({"name": name, "price_cents": price_cents, "quantity": quantity}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn order_snapshot_prices_and_decrements_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let customer_id = create_customer(&client, &srv.base_url, "ada@example.com").await;
    let product_id = create_product(&client, &srv.base_url, "Keyboard", 1000, 5).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": customer_id,
            "products": [{"id": product_id, "quantity": 3}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let order: Value = res.json().await.unwrap();
    assert_eq!(order["customer_id"].as_str().unwrap(), customer_id);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);
    assert_eq!(order["items"][0]["product_id"].as_str().unwrap(), product_id);
    assert_eq!(order["items"][0]["quantity"], 3);
    assert_eq!(order["items"][0]["price_cents"], 1000);
    assert_eq!(order["total_cents"], 3000);

    assert_eq!(srv.stock_of(&product_id).await, 2);

    // Read-back through the API returns the same order.
    let res = client
        .get(format!(
            "{}/orders/{}",
            srv.base_url,
            order["id"].as_str().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: Value = res.json().await.unwrap();
    assert_eq!(fetched["id"], order["id"]);
    assert_eq!(fetched["items"][0]["price_cents"], 1000);
}

#[tokio::test]
async fn order_with_insufficient_stock_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let customer_id = create_customer(&client, &srv.base_url, "ada@example.com").await;
    let product_id = create_product(&client, &srv.base_url, "Keyboard", 1000, 5).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": customer_id,
            "products": [{"id": product_id, "quantity": 6}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body["error"].as_str().unwrap(),
        "Some product have insufficient quantities"
    );

    // Rejection leaves the catalog untouched.
    assert_eq!(srv.stock_of(&product_id).await, 5);
}

#[tokio::test]
async fn order_for_unknown_customer_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product_id = create_product(&client, &srv.base_url, "Keyboard", 1000, 5).await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": Uuid::new_v4(),
            "products": [{"id": product_id, "quantity": 1}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "Customer not found");
    assert_eq!(srv.stock_of(&product_id).await, 5);
}

#[tokio::test]
async fn order_with_unknown_product_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let customer_id = create_customer(&client, &srv.base_url, "ada@example.com").await;

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": customer_id,
            "products": [{"id": Uuid::new_v4(), "quantity": 1}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "Some product does not exist");
}

#[tokio::test]
async fn order_with_non_positive_quantity_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let customer_id = create_customer(&client, &srv.base_url, "ada@example.com").await;
    let product_id = create_product(&client, &srv.base_url, "Keyboard", 1000, 5).await;

    // A negative line must not slip through the stock check and inflate
    // the catalog.
    for quantity in [-5, 0] {
        let res = client
            .post(format!("{}/orders", srv.base_url))
            .json(&json!({
                "customer_id": customer_id,
                "products": [{"id": product_id, "quantity": quantity}],
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"].as_str().unwrap(), "quantity must be positive");
    }

    assert_eq!(srv.stock_of(&product_id).await, 5);
}

#[tokio::test]
async fn duplicate_product_name_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_product(&client, &srv.base_url, "Keyboard", 1000, 5).await;

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Keyboard", "price_cents": 900, "quantity": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_customer_email_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    create_customer(&client, &srv.base_url, "ada@example.com").await;

    let res = client
        .post(format!("{}/customers", srv.base_url))
        .json(&json!({"name": "Other Ada", "email": "ada@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_product_payload_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({"name": "Free Stuff", "price_cents": 0, "quantity": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

/// Catalog store whose every call fails, standing in for a lost backend.
struct FailingCatalog;

#[async_trait]
impl ProductRepository for FailingCatalog {
    async fn create_product(&self, _product: &NewProduct) -> RepoResult<Product> {
        Err("catalog store unavailable".into())
    }

    async fn find_by_name(&self, _name: &str) -> RepoResult<Option<Product>> {
        Err("catalog store unavailable".into())
    }

    async fn find_all_by_id(&self, _ids: &[Uuid]) -> RepoResult<Vec<Product>> {
        Err("catalog store unavailable".into())
    }

    async fn update_quantity(&self, _updates: &[QuantityUpdate]) -> RepoResult<Vec<Product>> {
        Err("catalog store unavailable".into())
    }
}

#[tokio::test]
async fn repository_failure_surfaces_message_in_500_body() {
    let state = AppState::new(
        Arc::new(MemoryCustomerRepository::new()),
        Arc::new(FailingCatalog),
        Arc::new(MemoryOrderRepository::new()),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    let client = reqwest::Client::new();
    let customer_id = create_customer(&client, &base_url, "ada@example.com").await;

    let res = client
        .post(format!("{}/orders", base_url))
        .json(&json!({
            "customer_id": customer_id,
            "products": [{"id": Uuid::new_v4(), "quantity": 1}],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The wrapped collaborator message travels to the caller unchanged.
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "catalog store unavailable");
}

#[tokio::test]
async fn unknown_order_id_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
