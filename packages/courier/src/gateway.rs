//! Request handling with an audit trail.
//!
//! [`PersistenceGateway::handle`] records the request, executes it, then
//! records the outcome. The request row is written before the network call
//! so the attempt survives a crash or hang during the call. Failing to
//! record either side is logged and otherwise ignored: the returned
//! [`ResultValue`] always describes the network outcome.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use courier_http::{HttpExecutor, ReqwestExecutor, RequestSpec, ResultValue};
use courier_history::{Database, NewRequest, NewResponse, RequestStore, ResponseStore};

use crate::config::Config;
use crate::error::GatewayError;

pub struct PersistenceGateway<E = ReqwestExecutor> {
    executor: E,
    requests: RequestStore,
    responses: ResponseStore,
}

impl PersistenceGateway<ReqwestExecutor> {
    /// Open the configured history database and build a reqwest executor.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let db = Database::open(&config.database_path)?;
        let executor = ReqwestExecutor::new(config.timeout())?;
        Ok(Self::new(db, executor))
    }
}

impl<E: HttpExecutor> PersistenceGateway<E> {
    pub fn new(db: Database, executor: E) -> Self {
        Self {
            executor,
            requests: RequestStore::new(db.clone()),
            responses: ResponseStore::new(db),
        }
    }

    pub fn requests(&self) -> &RequestStore {
        &self.requests
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.responses
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Record, execute, record.
    pub fn handle(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> ResultValue {
        log::debug!("Processing {} {}", method, url);

        let request_id = match self.record_request(method, url, headers, body) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Failed to record request {} {}: {}", method, url, e);
                None
            }
        };

        let spec = RequestSpec {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        };
        let result = self.executor.execute(&spec);

        if let Err(e) = self.record_response(request_id, &result) {
            log::warn!("Failed to record response for {} {}: {}", method, url, e);
        }

        log::info!(
            "{} {} -> {}{}",
            method,
            url,
            result.status_code,
            if result.is_error { " (error)" } else { "" }
        );
        result
    }

    pub fn get(&self, url: &str, headers: &HashMap<String, String>) -> ResultValue {
        self.handle("GET", url, headers, None)
    }

    pub fn post(&self, url: &str, headers: &HashMap<String, String>, body: &str) -> ResultValue {
        self.handle("POST", url, headers, Some(body))
    }

    pub fn put(&self, url: &str, headers: &HashMap<String, String>, body: &str) -> ResultValue {
        self.handle("PUT", url, headers, Some(body))
    }

    pub fn delete(&self, url: &str, headers: &HashMap<String, String>) -> ResultValue {
        self.handle("DELETE", url, headers, None)
    }

    fn record_request(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Option<&str>,
    ) -> Result<i64, GatewayError> {
        let request = NewRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: serde_json::to_string(headers)?,
            body: body.map(str::to_string),
        };
        Ok(self.requests.insert(&request)?)
    }

    fn record_response(
        &self,
        request_id: Option<i64>,
        result: &ResultValue,
    ) -> Result<i64, GatewayError> {
        let response = NewResponse {
            request_id,
            status_code: result.status_code,
            headers: serde_json::to_string(&result.headers)?,
            body: result.body.clone(),
            summary: result.content_type.clone(),
        };
        Ok(self.responses.insert(&response)?)
    }
}

impl<E: HttpExecutor + 'static> PersistenceGateway<E> {
    /// Run [`handle`](Self::handle) on a background thread.
    ///
    /// The handle may be dropped; the request still runs and is recorded.
    pub fn handle_in_background(
        self: &Arc<Self>,
        method: impl Into<String>,
        url: impl Into<String>,
        headers: HashMap<String, String>,
        body: Option<String>,
    ) -> JoinHandle<ResultValue> {
        let gateway = Arc::clone(self);
        let method = method.into();
        let url = url.into();
        thread::spawn(move || gateway.handle(&method, &url, &headers, body.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use courier_http::{HeaderMultiMap, ResponseProcessor};
    use tempfile::{tempdir, TempDir};

    /// Answers every request with a canned JSON body and remembers how many
    /// requests were already recorded when it was called.
    struct StubExecutor {
        requests: RequestStore,
        calls: Mutex<Vec<(RequestSpec, usize)>>,
    }

    impl StubExecutor {
        fn calls(&self) -> Vec<(RequestSpec, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HttpExecutor for StubExecutor {
        fn execute(&self, spec: &RequestSpec) -> ResultValue {
            let recorded = self.requests.list_all().map(|r| r.len()).unwrap_or(0);
            self.calls.lock().unwrap().push((spec.clone(), recorded));

            let mut headers = HeaderMultiMap::new();
            headers.insert(
                "content-type".to_string(),
                vec!["application/json".to_string()],
            );
            ResponseProcessor::default().process(200, headers, Some(r#"{"ok":true}"#), &spec.url)
        }
    }

    fn gateway() -> (TempDir, PersistenceGateway<StubExecutor>) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("history.db")).unwrap();
        let executor = StubExecutor {
            requests: RequestStore::new(db.clone()),
            calls: Mutex::new(Vec::new()),
        };
        (dir, PersistenceGateway::new(db, executor))
    }

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn request_is_recorded_before_execution() {
        let (_dir, gateway) = gateway();

        gateway.get("https://example.com/a", &HashMap::new());

        let calls = gateway.executor().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, 1);
    }

    #[test]
    fn handle_records_linked_pair() {
        let (_dir, gateway) = gateway();
        let h = headers(&[("Accept", "application/json")]);

        let result = gateway.handle("POST", "https://example.com/items", &h, Some("{}"));
        assert_eq!(result.status_code, 200);

        let requests = gateway.requests().list_all().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://example.com/items");
        assert_eq!(request.body.as_deref(), Some("{}"));
        let stored: HashMap<String, String> = serde_json::from_str(&request.headers).unwrap();
        assert_eq!(stored, h);

        let responses = gateway.responses().list_all().unwrap();
        assert_eq!(responses.len(), 1);
        let response = &responses[0];
        assert_eq!(response.request_id, Some(request.id));
        assert_eq!(response.status_code, 200);
        assert_eq!(response.summary, "application/json");
        assert_eq!(response.body, result.body);
        let stored: HeaderMultiMap = serde_json::from_str(&response.headers).unwrap();
        assert_eq!(stored, result.headers);
    }

    #[test]
    fn convenience_methods_forward_body_only_when_given() {
        let (_dir, gateway) = gateway();
        let h = HashMap::new();

        gateway.get("https://example.com/g", &h);
        gateway.post("https://example.com/p", &h, "post body");
        gateway.put("https://example.com/u", &h, "put body");
        gateway.delete("https://example.com/d", &h);

        let calls = gateway.executor().calls();
        let seen: Vec<(&str, Option<&str>)> = calls
            .iter()
            .map(|(spec, _)| (spec.method.as_str(), spec.body.as_deref()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("GET", None),
                ("POST", Some("post body")),
                ("PUT", Some("put body")),
                ("DELETE", None),
            ]
        );
    }

    #[test]
    fn failed_request_write_leaves_response_unlinked() {
        let (dir, gateway) = gateway();
        let conn = Database::open(dir.path().join("history.db"))
            .unwrap()
            .connect()
            .unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_requests BEFORE INSERT ON Requests \
             BEGIN SELECT RAISE(ABORT, 'requests are read-only'); END;",
        )
        .unwrap();

        let result = gateway.get("https://example.com", &HashMap::new());

        assert!(!result.is_error);
        assert_eq!(result.status_code, 200);
        assert!(gateway.requests().list_all().unwrap().is_empty());
        let responses = gateway.responses().list_all().unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].request_id, None);
    }

    #[test]
    fn persistence_failures_do_not_change_the_result() {
        let (dir, gateway) = gateway();
        let conn = Database::open(dir.path().join("history.db"))
            .unwrap()
            .connect()
            .unwrap();
        conn.execute_batch("DROP TABLE Responses; DROP TABLE Requests;")
            .unwrap();

        let result = gateway.get("https://example.com/x", &HashMap::new());

        assert!(!result.is_error);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.body, "{\n  \"ok\": true\n}");
        assert_eq!(gateway.executor().calls().len(), 1);
    }

    #[test]
    fn background_handle_runs_full_cycle() {
        let (_dir, gateway) = gateway();
        let gateway = Arc::new(gateway);

        let handle = gateway.handle_in_background(
            "PUT",
            "https://example.com/bg",
            HashMap::new(),
            Some("payload".to_string()),
        );
        let result = handle.join().unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(gateway.requests().list_all().unwrap().len(), 1);
        assert_eq!(gateway.responses().list_all().unwrap().len(), 1);
    }
}
