//! End-to-end checks of `MarketplaceApi` against a one-shot local HTTP server.

use campus_commerce::prelude::*;
use campus_data::{FetchClient, MarketplaceApi};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve exactly one request with a canned response; yields the raw request.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if let Some(end) = find_header_end(&raw) {
                let head = String::from_utf8_lossy(&raw[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }

        let response = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (base_url, handle)
}

fn client_for(base_url: String) -> MarketplaceApi {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    MarketplaceApi::with_client(
        FetchClient::new()
            .with_http_client(http)
            .with_base_url(base_url),
    )
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

#[tokio::test]
async fn list_products_sends_query_and_decodes() {
    let (base_url, server) = serve_once(
        200,
        r#"[
            {"_id":"p1","title":"Organic Chemistry","price":420,"category":"Books","imageUrl":"a.jpg","postDate":"2024-01-01T00:00:00Z"},
            {"_id":"p2","title":"Chemistry Lab Coat","price":300,"category":"Books","imageUrl":["b.jpg"],"postDate":"2024-02-01T00:00:00Z"}
        ]"#,
    )
    .await;
    let api = client_for(base_url);

    let query = ProductQuery::new()
        .with_search("chemistry")
        .with_category("Books");
    let products = api.list_products(&query).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/products?search=chemistry&category=Books "));
    let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(products[0].price, Money::from_minor(42_000));
}

#[tokio::test]
async fn list_products_applies_requested_sort() {
    let (base_url, server) = serve_once(
        200,
        r#"[
            {"_id":"p1","title":"Old Notes","price":50,"postDate":"2024-01-01T00:00:00Z"},
            {"_id":"p2","title":"New Notes","price":80,"postDate":"2024-03-01T00:00:00Z"}
        ]"#,
    )
    .await;
    let api = client_for(base_url);

    let query = ProductQuery::new().with_sort(SortOption::Newest);
    let products = api.list_products(&query).await.unwrap();

    assert!(server.await.unwrap().starts_with("GET /api/products "));
    assert_eq!(products[0].id.as_str(), "p2");
    assert_eq!(products[1].id.as_str(), "p1");
}

#[tokio::test]
async fn missing_product_maps_to_not_found() {
    let (base_url, server) = serve_once(404, r#"{"message":"Product not found"}"#).await;
    let api = client_for(base_url);

    let result = api.get_product(&ProductId::new("nope")).await;

    assert!(server.await.unwrap().starts_with("GET /api/products/nope "));
    assert!(matches!(result, Err(CommerceError::ProductNotFound(id)) if id == "nope"));
}

#[tokio::test]
async fn create_booking_posts_decimal_body_with_token() {
    let (base_url, server) = serve_once(201, r#"{"_id":"bk9"}"#).await;
    let api = client_for(base_url);
    let mut cart = CartStore::with_sink(RecordingSink::new());
    cart.add_to_cart(&Product::new("p1", "Drafter", Money::from_minor(12_550)));
    cart.add_to_cart(&Product::new("p1", "Drafter", Money::from_minor(12_550)));

    let confirmation = place_booking(&mut cart, &api, Some(&AuthToken::new("jwt-1")))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/bookings/create "));
    assert!(request.to_lowercase().contains("authorization: bearer jwt-1"));
    assert!(request.ends_with(
        r#"{"products":[{"productId":"p1","quantity":2,"price":125.5}],"totalPrice":251.0}"#
    ));
    assert_eq!(confirmation.booking_id, Some(BookingId::new("bk9")));
    assert!(cart.is_empty());
}

#[tokio::test]
async fn rejected_booking_uses_backend_message() {
    let (base_url, _server) = serve_once(400, r#"{"message":"Product already sold"}"#).await;
    let api = client_for(base_url);
    let request = BookingRequest {
        products: vec![],
        total_price: Money::ZERO,
    };

    let result = api.create_booking(&AuthToken::new("t"), &request).await;

    assert!(matches!(result, Err(CommerceError::BookingRejected(m)) if m == "Product already sold"));
}

#[tokio::test]
async fn rejected_booking_without_message_falls_back() {
    let (base_url, _server) = serve_once(500, "{}").await;
    let api = client_for(base_url);
    let request = BookingRequest {
        products: vec![],
        total_price: Money::ZERO,
    };

    let result = api.create_booking(&AuthToken::new("t"), &request).await;

    assert!(matches!(result, Err(CommerceError::BookingRejected(m)) if m == "Booking failed"));
}

#[tokio::test]
async fn my_bookings_decodes_list() {
    let (base_url, server) = serve_once(
        200,
        r#"[{"_id":"b1","totalPrice":99.5,"status":"confirmed","bookingDate":"2024-03-03T12:00:00Z",
            "products":[{"productId":{"_id":"p1","title":"Calculator","imageUrl":[]},"quantity":1,"price":99.5}]}]"#,
    )
    .await;
    let api = client_for(base_url);

    let bookings = api.my_bookings(&AuthToken::new("jwt")).await.unwrap();

    assert!(server.await.unwrap().starts_with("GET /api/bookings/my-bookings "));
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].status, "confirmed");
    assert_eq!(bookings[0].total_price, Money::from_minor(9_950));
    assert_eq!(bookings[0].lines[0].title, "Calculator");
}

#[tokio::test]
async fn my_bookings_unauthorized() {
    let (base_url, _server) = serve_once(401, r#"{"message":"Invalid token"}"#).await;
    let api = client_for(base_url);

    let result = api.my_bookings(&AuthToken::new("expired")).await;

    assert!(matches!(result, Err(CommerceError::NotAuthenticated)));
}

#[tokio::test]
async fn login_posts_credentials_and_returns_session() {
    let (base_url, server) = serve_once(
        200,
        r#"{"token":"jwt-42","user":{"_id":"u1","name":"Asha","email":"asha@college.edu"}}"#,
    )
    .await;
    let api = client_for(base_url);

    let session = api
        .login(&Credentials::new("asha@college.edu", "s3cret"))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/auth/login "));
    assert!(request.ends_with(r#"{"email":"asha@college.edu","password":"s3cret"}"#));
    assert_eq!(session.token.expose(), "jwt-42");
    assert_eq!(session.user.name, "Asha");
    assert_eq!(session.user.id, Some(UserId::new("u1")));
}

#[tokio::test]
async fn rejected_login_uses_backend_message() {
    let (base_url, _server) = serve_once(400, r#"{"message":"Invalid credentials"}"#).await;
    let api = client_for(base_url);

    let result = api.login(&Credentials::new("asha@college.edu", "wrong")).await;

    assert!(matches!(result, Err(CommerceError::AuthRejected(m)) if m == "Invalid credentials"));
}

#[tokio::test]
async fn rejected_login_without_message_falls_back() {
    let (base_url, _server) = serve_once(500, "").await;
    let api = client_for(base_url);

    let result = api.login(&Credentials::new("asha@college.edu", "pw")).await;

    assert!(matches!(result, Err(CommerceError::AuthRejected(m)) if m == "Login failed."));
}

#[tokio::test]
async fn signup_posts_name_email_and_password() {
    let (base_url, server) = serve_once(201, r#"{"message":"User registered successfully"}"#).await;
    let api = client_for(base_url);

    let message = api
        .signup(&NewAccount::new("Asha", "asha@college.edu", "pw"))
        .await
        .unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/auth/signup "));
    assert!(request.ends_with(r#"{"name":"Asha","email":"asha@college.edu","password":"pw"}"#));
    assert_eq!(message.as_deref(), Some("User registered successfully"));
}

#[tokio::test]
async fn rejected_signup_uses_backend_message() {
    let (base_url, _server) = serve_once(400, r#"{"message":"User already exists"}"#).await;
    let api = client_for(base_url);

    let result = api
        .signup(&NewAccount::new("Asha", "asha@college.edu", "pw"))
        .await;

    assert!(matches!(result, Err(CommerceError::AuthRejected(m)) if m == "User already exists"));
}

#[tokio::test]
async fn user_profile_fetches_seller() {
    let (base_url, server) = serve_once(200, r#"{"name":"Ravi","email":"ravi@college.edu"}"#).await;
    let api = client_for(base_url);

    let seller = api.user_profile(&UserId::new("u7")).await.unwrap();

    assert!(server.await.unwrap().starts_with("GET /api/users/u7 "));
    assert_eq!(seller.id, Some(UserId::new("u7")));
    assert_eq!(seller.contact_line(), "Ravi <ravi@college.edu>");
}

#[tokio::test]
async fn user_profile_failure_is_reported() {
    let (base_url, _server) = serve_once(404, r#"{"message":"User not found"}"#).await;
    let api = client_for(base_url);

    let result = api.user_profile(&UserId::new("ghost")).await;

    assert!(
        matches!(result, Err(CommerceError::Backend(m)) if m == "Could not fetch seller information.")
    );
}
