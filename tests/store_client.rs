use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;

use catalog_tui::network::actor::{create_product, load_catalog, update_product};
use catalog_tui::{NetworkResponse, Product, ProductDraft, Resource, StoreClient, StoreError};

/// Request as seen by the fake server: method, path, body
type Seen = Arc<Mutex<Vec<(String, String, String)>>>;

type Route = Arc<dyn Fn(&str, &str) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct Fake {
    route: Route,
    seen: Seen,
}

async fn record(State(fake): State<Fake>, method: Method, uri: Uri, body: String) -> impl IntoResponse {
    let (status, reply) = (fake.route)(method.as_str(), uri.path());
    fake.seen
        .lock()
        .unwrap()
        .push((method.to_string(), uri.path().to_string(), body));
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply,
    )
}

/// Serve canned responses picked by `route` until the test ends
async fn serve<F>(route: F) -> (String, Seen)
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new().fallback(record).with_state(Fake {
        route: Arc::new(route),
        seen: seen.clone(),
    });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}/api/v1", addr), seen)
}

fn client(base: &str) -> StoreClient {
    StoreClient::new(base, Duration::from_secs(5)).unwrap()
}

fn draft(title: &str) -> ProductDraft {
    ProductDraft {
        title: title.to_string(),
        price: 12.0,
        description: String::from("desc"),
        category_id: 1,
        images: vec![String::from("https://x/a.png")],
    }
}

const PRODUCTS: &str = r#"[
    {"id": 1, "title": "Handbag", "price": 10, "description": "", "category": {"id": 1, "name": "Bags"}, "images": ["https://x/1.png"]},
    {"id": 2, "title": "Shoe", "price": 25.5, "description": "Left", "category": {"id": 2, "name": "Shoes"}, "images": []}
]"#;

#[tokio::test]
async fn lists_products_and_categories() {
    let (base, seen) = serve(|_, path| match path {
        "/api/v1/products" => (200, PRODUCTS.to_string()),
        "/api/v1/categories" => (200, r#"[{"id":1,"name":"Bags"},{"id":2,"name":"Shoes"}]"#.to_string()),
        _ => (404, String::from("{}")),
    })
    .await;

    match load_catalog(&client(&base), 1).await {
        NetworkResponse::CatalogLoaded { products, categories, .. } => {
            assert_eq!(products.len(), 2);
            assert_eq!(products[1].category.name, "Shoes");
            assert_eq!(categories.len(), 2);
        }
        other => panic!("unexpected response: {:?}", other),
    }

    let paths: Vec<String> = seen.lock().unwrap().iter().map(|(_, p, _)| p.clone()).collect();
    assert_eq!(paths, vec!["/api/v1/products", "/api/v1/categories"]);
}

#[tokio::test]
async fn create_posts_json_body() {
    let (base, seen) = serve(|method, _| {
        assert_eq!(method, "POST");
        (
            201,
            r#"{"id": 99, "title": "Tote", "price": 12, "description": "desc", "category": {"id": 1, "name": "Bags"}, "images": ["https://x/a.png"]}"#.to_string(),
        )
    })
    .await;

    let response = create_product(&client(&base), 4, draft("Tote")).await;
    let NetworkResponse::ProductCreated { id, product } = response else {
        panic!("expected created");
    };
    assert_eq!(id, 4);
    assert_eq!(product.id, 99);

    let body = seen.lock().unwrap()[0].2.clone();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["categoryId"], 1);
    assert_eq!(json["images"][0], "https://x/a.png");
}

#[tokio::test]
async fn update_puts_to_record_path() {
    let (base, seen) = serve(|_, _| {
        (
            200,
            r#"{"id": 7, "title": "X", "price": 12, "description": "desc", "category": {"id": 1, "name": "Bags"}, "images": []}"#.to_string(),
        )
    })
    .await;

    let response = update_product(&client(&base), 5, 7, draft("X")).await;
    assert!(matches!(response, NetworkResponse::ProductUpdated { ref product, .. } if product.title == "X"));

    let (method, path, _) = seen.lock().unwrap()[0].clone();
    assert_eq!(method, "PUT");
    assert_eq!(path, "/api/v1/products/7");
}

#[tokio::test]
async fn non_success_status_is_a_network_error() {
    let (base, _) = serve(|_, _| (500, String::from(r#"{"message":"boom"}"#))).await;

    let err = client(&base)
        .create::<_, Product>(Resource::Products, &draft("Tote"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 500 }));
    assert!(err.is_network());

    let response = create_product(&client(&base), 9, draft("Tote")).await;
    assert!(matches!(response, NetworkResponse::WriteFailed { id: 9, .. }));
}

#[tokio::test]
async fn bad_request_is_a_validation_error() {
    let (base, _) = serve(|_, _| {
        (
            400,
            String::from(r#"{"message":["price must be a positive number"],"error":"Bad Request","statusCode":400}"#),
        )
    })
    .await;

    let err = client(&base)
        .update::<_, Product>(Resource::Products, 3, &draft(""))
        .await
        .unwrap_err();
    match err {
        StoreError::Validation { message } => assert_eq!(message, "price must be a positive number"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_server_fails_load() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let response = load_catalog(&client(&format!("http://{}", addr)), 1).await;
    assert!(matches!(response, NetworkResponse::CatalogFailed { .. }));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let (base, _) = serve(|_, _| (200, String::from("not json"))).await;
    let err = client(&base)
        .list::<Product>(Resource::Products)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }));
}
