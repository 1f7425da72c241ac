//! Router tests against the in-memory document store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, Request, StatusCode,
    },
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use libris_server::{
    api::{
        create_router,
        routes::{Endpoint, Guard},
    },
    auth::IdentityClaim,
    config::AppConfig,
    repository::{MemoryDocumentStore, Repository},
    AppState,
};

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    fn with_config(config: AppConfig) -> Self {
        let repository = Repository::new(Arc::new(MemoryDocumentStore::new()));
        let state = AppState::new(config, repository);
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    fn session_cookie(&self, email: &str) -> String {
        let token = self
            .state
            .services
            .auth
            .codec()
            .issue(&IdentityClaim::new(email))
            .unwrap();
        format!("token={}", token)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, headers, body)
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn json(
        &self,
        method: &str,
        uri: &str,
        body: Value,
        cookie: Option<&str>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// Insert a book through the guarded route and return its id
    async fn seed_book(&self, book: Value) -> String {
        let cookie = self.session_cookie("librarian@x.com");
        let (status, _, body) = self
            .json("POST", "/api/v1/addBook?email=librarian@x.com", book, Some(&cookie))
            .await;
        assert_eq!(status, StatusCode::OK);
        body["insertedId"].as_str().unwrap().to_string()
    }
}

fn first_cookie(headers: &HeaderMap) -> String {
    headers
        .get(SET_COOKIE)
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_liveness() {
    let app = TestApp::new();
    let (status, _, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("LIBRARY SERVER IS IN ONLINE"));
}

#[tokio::test]
async fn test_gated_route_without_cookie_is_unauthorized() {
    let app = TestApp::new();
    let (status, _, body) = app.get("/api/v1/allBooks?email=a@x.com", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "unauthorized access"}));
}

#[tokio::test]
async fn test_gated_route_with_tampered_token_is_unauthorized() {
    let app = TestApp::new();
    let cookie = format!("{}x", app.session_cookie("a@x.com"));
    let (status, _, body) = app.get("/api/v1/allBooks?email=a@x.com", Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized access");
}

#[tokio::test]
async fn test_gated_route_with_expired_token_is_unauthorized() {
    let app = TestApp::new();
    let token = app
        .state
        .services
        .auth
        .codec()
        .issue_at(&IdentityClaim::new("a@x.com"), Utc::now() - Duration::minutes(61))
        .unwrap();
    let cookie = format!("token={}", token);
    let (status, _, _) = app.get("/api/v1/allBooks?email=a@x.com", Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ownership_mismatch_is_forbidden() {
    let app = TestApp::new();
    let cookie = app.session_cookie("a@x.com");

    let (status, _, body) = app.get("/api/v1/allBooks?email=b@x.com", Some(&cookie)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"message": "forbidden access"}));

    let (status, _, _) = app.get("/api/v1/allBooks", Some(&cookie)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = app
        .get("/api/v1/allBooks?email=a@x.com&email=b@x.com", Some(&cookie))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden access");

    let (status, _, _) = app
        .json("POST", "/api/v1/addBook?email=b@x.com", json!({"title": "Dune"}), Some(&cookie))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_owner_lists_all_books() {
    let app = TestApp::new();
    app.seed_book(json!({"title": "Dune", "category": "Fiction"})).await;
    app.seed_book(json!({"title": "SPQR", "category": "History"})).await;

    let cookie = app.session_cookie("a@x.com");
    let (status, _, body) = app.get("/api/v1/allBooks?email=a@x.com", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_login_then_logout() {
    let app = TestApp::new();

    let (status, headers, body) = app
        .json("POST", "/api/v1/jwt", json!({"email": "a@x.com"}), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));
    let cookie = first_cookie(&headers);
    assert!(cookie.starts_with("token="));

    let (status, _, _) = app.get("/api/v1/allBooks?email=a@x.com", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("POST")
        .uri("/jwt/logout")
        .header(COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("cookie cleared"));
    let cleared = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    // A browser honouring the removal sends no cookie
    let (status, _, _) = app.get("/api/v1/allBooks?email=a@x.com", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout does not revoke: a replayed token still verifies until it expires
    let (status, _, _) = app.get("/api/v1/allBooks?email=a@x.com", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_read_flag_projects_book() {
    let app = TestApp::new();
    let id = app
        .seed_book(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "imageLink": "https://img/dune.png",
            "quantity": 3,
            "rating": 4.8,
            "category": "Fiction",
            "description": "Spice",
            "pages": 412,
            "link": "https://example.org/dune"
        }))
        .await;

    let (status, _, full) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full.as_object().unwrap().len(), 10);

    let (status, _, reduced) = app.get(&format!("/api/v1/allBooks/{}?read=1", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let reduced = reduced.as_object().unwrap();
    let mut keys: Vec<&str> = reduced.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["_id", "author", "link", "quantity", "title"]);
    for (key, value) in reduced {
        assert_eq!(&full[key], value);
    }
}

#[tokio::test]
async fn test_missing_book_is_null() {
    let app = TestApp::new();
    let (status, _, body) = app
        .get("/api/v1/allBooks/6f1c2a9e-3b9f-4c1a-9a55-0c1d2e3f4a5b", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_malformed_identifier_is_rejected() {
    let app = TestApp::new();
    let (status, _, _) = app.get("/api/v1/allBooks/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_categorized_books() {
    let app = TestApp::new();
    app.seed_book(json!({"title": "Dune", "category": "Fiction"})).await;
    app.seed_book(json!({"title": "Emma", "category": "Fiction"})).await;
    app.seed_book(json!({"title": "SPQR", "category": "History"})).await;

    let (status, _, body) = app.get("/api/v1/categorizedBooks?category=Fiction", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune", "Emma"]);

    let (status, _, body) = app.get("/api/v1/categorizedBooks?category=Poetry", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_update_book_upserts() {
    let app = TestApp::new();
    let id = "0b8f7c52-5a0e-4b7e-8f62-2f0d6c9f3e11";

    let (status, _, body) = app
        .json(
            "PUT",
            &format!("/api/v1/updateBook/{}", id),
            json!({"title": "Dune", "author": "Frank Herbert", "publisher": "Chilton"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["upsertedId"], id);
    assert_eq!(body["upsertedCount"], 1);

    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(
        book,
        json!({
            "_id": id,
            "title": "Dune",
            "author": "Frank Herbert",
            "imageLink": null,
            "quantity": null,
            "rating": null,
            "category": null,
            "description": null,
            "pages": null,
            "link": null
        })
    );
}

#[tokio::test]
async fn test_update_book_sets_enumerated_fields_only() {
    let app = TestApp::new();
    let id = app
        .seed_book(json!({"title": "Dune", "quantity": 1, "isbn": "9780441013593"}))
        .await;

    let (status, _, body) = app
        .json(
            "PUT",
            &format!("/api/v1/updateBook/{}", id),
            json!({"title": "Dune Messiah", "quantity": 2, "isbn": "0000"}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 1);
    assert_eq!(body["modifiedCount"], 1);

    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(book["title"], "Dune Messiah");
    assert_eq!(book["quantity"], 2);
    assert_eq!(book["isbn"], "9780441013593");
}

#[tokio::test]
async fn test_update_book_replaces_omitted_fields_with_null() {
    let app = TestApp::new();
    let id = app
        .seed_book(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "rating": 4.8,
            "category": "Fiction",
            "quantity": 3,
            "isbn": "9780441013593"
        }))
        .await;

    let (status, _, body) = app
        .json(
            "PUT",
            &format!("/api/v1/updateBook/{}", id),
            json!({"title": "Dune II", "category": null}),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);

    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(book["title"], "Dune II");
    for field in ["author", "rating", "category", "quantity", "imageLink", "description", "pages", "link"] {
        assert_eq!(book[field], Value::Null, "{} should be cleared", field);
        assert!(book.as_object().unwrap().contains_key(field));
    }
    assert_eq!(book["isbn"], "9780441013593");
}

#[tokio::test]
async fn test_update_quantity_without_value_clears_it() {
    let app = TestApp::new();
    let id = app.seed_book(json!({"title": "Dune", "quantity": 3})).await;
    let uri = format!("/api/v1/updateQuantity/{}", id);

    let (status, _, body) = app.json("PATCH", &uri, json!({"quantity": null}), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);

    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(book["quantity"], Value::Null);
    assert_eq!(book["title"], "Dune");

    app.json("PATCH", &uri, json!({"quantity": 4}), None).await;
    let (_, _, body) = app.json("PATCH", &uri, json!({}), None).await;
    assert_eq!(body["modifiedCount"], 1);
    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(book["quantity"], Value::Null);
}

#[tokio::test]
async fn test_update_quantity_does_not_upsert() {
    let app = TestApp::new();
    let id = app.seed_book(json!({"title": "Dune", "quantity": 3})).await;

    let (status, _, body) = app
        .json("PATCH", &format!("/api/v1/updateQuantity/{}", id), json!({"quantity": 2}), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modifiedCount"], 1);

    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", id), None).await;
    assert_eq!(book["quantity"], 2);
    assert_eq!(book["title"], "Dune");

    let missing = "9d1e0c0a-6c53-4f0b-9e43-3c6f7d1b2a10";
    let (status, _, body) = app
        .json("PATCH", &format!("/api/v1/updateQuantity/{}", missing), json!({"quantity": 2}), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matchedCount"], 0);
    assert_eq!(body["upsertedId"], Value::Null);

    let (_, _, book) = app.get(&format!("/api/v1/allBooks/{}", missing), None).await;
    assert_eq!(book, Value::Null);
}

#[tokio::test]
async fn test_borrow_list_and_delete_by_identifier() {
    let app = TestApp::new();

    let (status, _, first) = app
        .json("POST", "/api/v1/borrowBook", json!({"email": "a@x.com", "bookId": "1"}), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, _, second) = app
        .json("POST", "/api/v1/borrowBook", json!({"email": "a@x.com", "bookId": "2"}), None)
        .await;
    app.json("POST", "/api/v1/borrowBook", json!({"email": "b@x.com", "bookId": "1"}), None)
        .await;

    let (status, _, mine) = app.get("/api/v1/borrowBook?email=a@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let second_id = second["insertedId"].as_str().unwrap();
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v1/deleteBorrowedBook/{}", second_id))
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"acknowledged": true, "deletedCount": 1}));

    // Only the addressed record is gone, never the first one in the collection
    let (_, _, mine) = app.get("/api/v1/borrowBook?email=a@x.com", None).await;
    let remaining = mine.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["_id"], first["insertedId"]);

    let (_, _, theirs) = app.get("/api/v1/borrowBook?email=b@x.com", None).await;
    assert_eq!(theirs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_configured_guard_protects_open_write() {
    let mut config = AppConfig::default();
    config.access.overrides.insert(Endpoint::UpdateQuantity, Guard::Session);
    config.access.overrides.insert(Endpoint::BorrowBook, Guard::Owner);
    let app = TestApp::with_config(config);
    let id = app.seed_book(json!({"title": "Dune", "quantity": 3})).await;
    let uri = format!("/api/v1/updateQuantity/{}", id);

    let (status, _, _) = app.json("PATCH", &uri, json!({"quantity": 2}), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = app.session_cookie("a@x.com");
    let (status, _, _) = app.json("PATCH", &uri, json!({"quantity": 2}), Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app
        .json("POST", "/api/v1/borrowBook?email=b@x.com", json!({"email": "b@x.com"}), Some(&cookie))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The GET on the same path keeps its own guard
    let (status, _, _) = app.get("/api/v1/borrowBook?email=b@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    let (status, _, body) = app.get("/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = app.get("/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
