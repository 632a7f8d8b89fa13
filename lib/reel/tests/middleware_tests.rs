//! Integration tests for middleware functionality.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use reel::middleware::{NetworkObserver, ObserverLayer};
use reel::movie::{Movie, MovieRoute};
use reel::{ApiError, HttpClient, HyperClient, Method, Pipeline, Request, Response, TransportError};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Observer recording one line per event.
#[derive(Debug, Default, Clone)]
struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }

    fn push(&self, event: String) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl NetworkObserver for Recorder {
    fn on_request(&self, request: &Request<Bytes>) {
        self.push(format!("request {} {}", request.method(), request.url().path()));
    }

    fn on_response(&self, url: &Url, response: &Response<Bytes>, _elapsed: Duration) {
        self.push(format!("response {} {}", url.path(), response.status()));
    }

    fn on_error(&self, url: &Url, error: &TransportError, _elapsed: Duration) {
        let kind = match error {
            TransportError::RequestTimedOut(_) => "request timeout",
            _ => "other",
        };
        self.push(format!("error {} {kind}", url.path()));
    }
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_logging().build();

    let url = Url::parse(&format!("{}/logged", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
}

/// Test that an observer sees the request and the response.
#[tokio::test]
async fn test_observer_sees_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/observed"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let recorder = Recorder::default();
    let client = HyperClient::builder()
        .with_observer(recorder.clone())
        .build();

    let url = Url::parse(&format!("{}/observed", mock_server.uri())).expect("url");
    let response = client
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    assert_eq!(response.status(), 404);
    assert_eq!(
        recorder.events(),
        vec!["request GET /observed".to_string(), "response /observed 404".to_string()]
    );
}

/// Test that observers are notified of transport failures.
#[tokio::test]
async fn test_observer_sees_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let recorder = Recorder::default();
    let client = HyperClient::builder()
        .request_timeout(Duration::from_millis(100))
        .layer(ObserverLayer::new(recorder.clone()))
        .build();

    let url = Url::parse(&format!("{}/slow", mock_server.uri())).expect("url");
    let err = client
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect_err("timeout");

    assert!(matches!(err, TransportError::RequestTimedOut(_)));
    assert_eq!(
        recorder.events(),
        vec!["request GET /slow".to_string(), "error /slow request timeout".to_string()]
    );
}

/// Test that observation does not change the pipeline's error mapping.
#[tokio::test]
async fn test_pipeline_observer_is_side_channel() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/7"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&mock_server)
        .await;

    let recorder = Recorder::default();
    let pipeline = Pipeline::builder()
        .base_url(mock_server.uri().parse().expect("url"))
        .observer(recorder.clone())
        .build();

    let err = pipeline
        .send::<Movie, _>(&MovieRoute::Detail { id: 7 }, None)
        .await
        .expect_err("conflict");

    assert!(matches!(err, ApiError::Conflict));
    assert_eq!(recorder.events().len(), 2);
}

/// Test that every observer in the stack is notified.
#[tokio::test]
async fn test_observer_composition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/composed"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let inner = Recorder::default();
    let outer = Recorder::default();
    let client = HyperClient::builder()
        .with_defaults()
        .with_observer(inner.clone())
        .with_shared_observer(Arc::new(outer.clone()))
        .build();

    let url = Url::parse(&format!("{}/composed", mock_server.uri())).expect("url");
    client
        .execute(Request::builder(Method::Get, url).build())
        .await
        .expect("response");

    assert_eq!(inner.events(), outer.events());
    assert_eq!(inner.events().len(), 2);
}
