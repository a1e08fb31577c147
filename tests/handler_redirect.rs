mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use shortly::api::handlers::redirect_handler;

fn test_server(state: shortly::AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let pool = common::test_pool().await;
    common::create_test_mapping(&pool, "redir1", "https://example.com/target").await;
    let (state, _rx) = common::create_test_state(pool);
    let server = test_server(state);

    let response = server.get("/redir1").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let pool = common::test_pool().await;
    let (state, _rx) = common::create_test_state(pool);
    let server = test_server(state);

    let response = server.get("/nope00").await;

    response.assert_status_not_found();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_malformed_code() {
    let pool = common::test_pool().await;
    let (state, mut rx) = common::create_test_state(pool);
    let server = test_server(state);

    for code in ["abc", "abcdefg", "abc%2B12", "ab.c12"] {
        let response = server.get(&format!("/{code}")).await;
        response.assert_status_bad_request();
    }

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_is_case_sensitive() {
    let pool = common::test_pool().await;
    common::create_test_mapping(&pool, "AbCdEf", "https://example.com/upper").await;
    let (state, _rx) = common::create_test_state(pool);
    let server = test_server(state);

    let response = server.get("/abcdef").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_records_access() {
    let pool = common::test_pool().await;
    common::create_test_mapping(&pool, "clk_me", "https://example.com").await;
    let (state, mut rx) = common::create_test_state(pool);
    let server = test_server(state);

    let response = server.get("/clk_me").await;

    assert_eq!(response.status_code(), 307);

    let event = rx.try_recv();
    assert!(event.is_ok());
    assert_eq!(event.unwrap().short_code, "clk_me");
}

#[tokio::test]
async fn test_redirect_not_found_records_nothing() {
    let pool = common::test_pool().await;
    let (state, mut rx) = common::create_test_state(pool);
    let server = test_server(state);

    server.get("/nope00").await.assert_status_not_found();

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_succeeds_when_queue_full() {
    let pool = common::test_pool().await;
    common::create_test_mapping(&pool, "full00", "https://example.com/full").await;
    let (state, mut rx) = common::create_test_state_with(pool, 50, 1);
    let server = test_server(state);

    for _ in 0..3 {
        let response = server.get("/full00").await;
        assert_eq!(response.status_code(), 307);
    }

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_succeeds_when_queue_closed() {
    let pool = common::test_pool().await;
    common::create_test_mapping(&pool, "closed", "https://example.com/closed").await;
    let (state, rx) = common::create_test_state(pool);
    drop(rx);
    let server = test_server(state);

    let response = server.get("/closed").await;

    assert_eq!(response.status_code(), 307);
}
