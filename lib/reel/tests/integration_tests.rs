//! Integration tests for `HyperClient` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use reel::movie::{Movie, MovieRoute};
use reel::{ApiError, HttpClient, HyperClient, Method, Pipeline, Request, TimeoutPolicy, TransportError};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Rating {
    value: f64,
}

fn url(server: &MockServer, path: &str) -> url::Url {
    url::Url::parse(&format!("{}{path}", server.uri())).expect("url")
}

/// Serve one connection that sends the response head and part of the body,
/// then stalls. Returns the server's base URL.
async fn stalling_body_server() -> url::Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buf = [0_u8; 1024];
        let _ = stream.read(&mut buf).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n{\"id\":")
            .await
            .expect("write head");
        stream.flush().await.expect("flush");
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });

    url::Url::parse(&format!("http://{addr}")).expect("url")
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 550, "title": "Fight Club"})),
        )
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/movie/550"))
        .header("Accept", "application/json")
        .build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().expect("json");
    assert_eq!(body["title"], "Fight Club");
}

#[tokio::test]
async fn test_post_request_with_json_body() {
    let mock_server = MockServer::start().await;

    let rating = Rating { value: 8.5 };

    Mock::given(method("POST"))
        .and(path("/movie/550/rating"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&rating))
        .respond_with(ResponseTemplate::new(201).set_body_json(&rating))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Post, url(&mock_server, "/movie/550/rating"))
        .json(&rating)
        .expect("json body")
        .build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 201);
    let body: Rating = response.json().expect("json");
    assert_eq!(body, rating);
}

#[tokio::test]
async fn test_http_error_status_is_not_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/not-found")).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_client_error());
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "dune"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/search/movie"))
        .query("query", "dune")
        .query("page", "1")
        .build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_response_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/with-headers"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "abc123")
                .insert_header("Content-Type", "application/json")
                .set_body_json(serde_json::json!({"ok": true})),
        )
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/with-headers")).build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.header("x-request-id"), Some("abc123"));
    assert_eq!(response.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_request_timeout_from_client_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .request_timeout(Duration::from_millis(100))
        .build();
    let request = Request::builder(Method::Get, url(&mock_server, "/slow")).build();

    let err = client.execute(request).await.expect_err("expected timeout error");

    let_assert!(TransportError::RequestTimedOut(threshold) = err);
    check!(threshold == Duration::from_millis(100));
}

#[tokio::test]
async fn test_request_timeout_from_request_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    // Client default is generous; the request brings its own policy.
    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/slow"))
        .timeouts(TimeoutPolicy::from_override(Duration::from_millis(150)))
        .build();

    let err = client.execute(request).await.expect_err("expected timeout error");

    let_assert!(TransportError::RequestTimedOut(threshold) = err);
    check!(threshold == Duration::from_millis(150));
}

#[tokio::test]
async fn test_connection_error() {
    let client = HyperClient::new();

    // Nothing listens on port 1
    let request = Request::builder(Method::Get, url::Url::parse("http://127.0.0.1:1").expect("url"))
        .build();

    let err = client.execute(request).await.expect_err("expected connection error");

    let_assert!(TransportError::NotConnected(_) = err);
}

#[tokio::test]
async fn test_no_content_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/movie/550/rating"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Delete, url(&mock_server, "/movie/550/rating")).build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 204);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn test_request_policy_longer_than_client_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    // The client default alone would give up after 100ms.
    let client = HyperClient::builder()
        .request_timeout(Duration::from_millis(100))
        .build();
    let request = Request::builder(Method::Get, url(&mock_server, "/slow"))
        .timeouts(TimeoutPolicy::from_override(Duration::from_secs(2)))
        .build();

    let response = client.execute(request).await.expect("response within the call's own timeout");

    check!(response.status() == 200);
}

#[tokio::test]
async fn test_stalled_body_is_response_timeout() {
    let base = stalling_body_server().await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, base.join("/movie/7").expect("url"))
        .timeouts(TimeoutPolicy::new(Duration::from_millis(100), Duration::from_millis(300)))
        .build();

    let err = client.execute(request).await.expect_err("body never completes");

    let_assert!(TransportError::ResponseTimedOut(threshold) = err);
    check!(threshold == Duration::from_millis(300));
}

#[tokio::test]
async fn test_pipeline_maps_stalled_body_to_response_timeout() {
    let base = stalling_body_server().await;
    let pipeline = Pipeline::builder().base_url(base).build();

    let err = pipeline
        .send::<Movie, _>(&MovieRoute::Detail { id: 7 }, Some(Duration::from_millis(100)))
        .await
        .expect_err("body never completes");

    let_assert!(ApiError::ResponseTimeout(threshold) = err);
    check!(threshold == Duration::from_millis(200));
}
