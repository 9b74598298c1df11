use std::collections::HashMap;
use std::sync::Arc;

use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use courier::{Config, PersistenceGateway};

fn open_gateway() -> (TempDir, PersistenceGateway) {
    let dir = tempdir().unwrap();
    let config = Config {
        timeout_secs: 5,
        ..Config::default()
    }
    .with_database_path(dir.path().join("history.db"));
    let gateway = PersistenceGateway::from_config(&config).unwrap();
    (dir, gateway)
}

#[tokio::test]
async fn test_successful_cycle_is_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("authorization", "Bearer t0k3n"))
        .and(body_string(r#"{"name":"Bob"}"#))
        .respond_with(
            ResponseTemplate::new(201).set_body_raw(r#"{"id":7,"name":"Bob"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/users", server.uri());

    let (dir, result, requests, responses) = tokio::task::spawn_blocking(move || {
        let (dir, gateway) = open_gateway();
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), " Bearer t0k3n ".to_string());

        let result = gateway.post(&url, &headers, r#"{"name":"Bob"}"#);
        let requests = gateway.requests().list_all().unwrap();
        let responses = gateway.responses().list_all().unwrap();
        (dir, result, requests, responses)
    })
    .await
    .unwrap();

    assert!(!result.is_error);
    assert_eq!(result.status_code, 201);
    assert_eq!(result.body, "{\n  \"id\": 7,\n  \"name\": \"Bob\"\n}");

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].body.as_deref(), Some(r#"{"name":"Bob"}"#));

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].request_id, Some(requests[0].id));
    assert_eq!(responses[0].status_code, 201);
    assert_eq!(responses[0].summary, "application/json");
    assert_eq!(responses[0].body, result.body);

    drop(dir);
}

#[tokio::test]
async fn test_unreachable_host_still_leaves_audit_trail() {
    let (dir, result, requests, responses) = tokio::task::spawn_blocking(|| {
        let (dir, gateway) = open_gateway();
        gateway.get("http://127.0.0.1:1/first", &HashMap::new());
        let result = gateway.get("http://127.0.0.1:1/second", &HashMap::new());
        let requests = gateway.requests().list_all().unwrap();
        let responses = gateway.responses().list_all().unwrap();
        (dir, result, requests, responses)
    })
    .await
    .unwrap();

    assert!(result.is_error);
    assert_eq!(result.status_code, -1);
    assert!(result.error_message.is_some());

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, "http://127.0.0.1:1/second");
    assert_eq!(requests[1].url, "http://127.0.0.1:1/first");

    assert_eq!(responses.len(), 2);
    assert!(responses.iter().all(|r| r.status_code == -1));
    assert_eq!(responses[0].summary, "text/plain");

    drop(dir);
}

#[tokio::test]
async fn test_invalid_url_is_never_sent() {
    let server = MockServer::start().await;

    let (dir, result, request_count, response_count) = tokio::task::spawn_blocking(|| {
        let (dir, gateway) = open_gateway();
        let result = gateway.handle("GET", "not-a-url", &HashMap::new(), None);
        let request_count = gateway.requests().list_all().unwrap().len();
        let response_count = gateway.responses().list_all().unwrap().len();
        (dir, result, request_count, response_count)
    })
    .await
    .unwrap();

    assert_eq!(result.status_code, -1);
    assert!(result.is_error);
    assert!(result
        .error_message
        .as_deref()
        .unwrap()
        .starts_with("Invalid URL"));
    assert_eq!(request_count, 1);
    assert_eq!(response_count, 1);
    assert!(server.received_requests().await.unwrap().is_empty());

    drop(dir);
}

#[tokio::test]
async fn test_unsupported_method_is_recorded_as_error() {
    let server = MockServer::start().await;
    let url = format!("{}/anything", server.uri());

    let (dir, result) = tokio::task::spawn_blocking(move || {
        let (dir, gateway) = open_gateway();
        let result = gateway.handle("PATCH", &url, &HashMap::new(), Some("x"));
        (dir, result)
    })
    .await
    .unwrap();

    assert!(result.is_error);
    assert_eq!(
        result.error_message.as_deref(),
        Some("Unsupported HTTP method: PATCH")
    );
    assert!(server.received_requests().await.unwrap().is_empty());

    drop(dir);
}

#[tokio::test]
async fn test_background_handle_completes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/slow", server.uri());

    let (dir, result, recorded) = tokio::task::spawn_blocking(move || {
        let (dir, gateway) = open_gateway();
        let gateway = Arc::new(gateway);
        let handle = gateway.handle_in_background("GET", url, HashMap::new(), None);
        let result = handle.join().unwrap();
        let recorded = gateway.responses().list_all().unwrap().len();
        (dir, result, recorded)
    })
    .await
    .unwrap();

    assert_eq!(result.status_code, 200);
    assert_eq!(result.body, "done");
    assert_eq!(recorded, 1);

    drop(dir);
}

#[tokio::test]
async fn test_history_survives_reopen() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let url = format!("{}/items/3", server.uri());

    let (dir, requests) = tokio::task::spawn_blocking(move || {
        let (dir, gateway) = open_gateway();
        gateway.delete(&url, &HashMap::new());
        drop(gateway);

        let config = Config::default().with_database_path(dir.path().join("history.db"));
        let reopened = PersistenceGateway::from_config(&config).unwrap();
        let requests = reopened.requests().list_all().unwrap();
        (dir, requests)
    })
    .await
    .unwrap();

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].body, None);

    drop(dir);
}
