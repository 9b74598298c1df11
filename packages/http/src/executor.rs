//! HTTP execution.
//!
//! [`HttpExecutor`] is the seam between request handling and the network.
//! Implementations never fail: every fault is folded into an error-shaped
//! [`ResultValue`] so that callers only ever branch on `is_error`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use url::Url;

use crate::error::Error;
use crate::processor::ResponseProcessor;
use crate::types::{HeaderMultiMap, Method, RequestSpec, ResultValue};

/// Connect and overall request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for executing HTTP requests.
pub trait HttpExecutor: Send + Sync {
    /// Execute a request and describe the outcome.
    ///
    /// Invalid input and network failures are reported through
    /// `ResultValue::is_error` with a status code of -1.
    fn execute(&self, spec: &RequestSpec) -> ResultValue;
}

impl<T: HttpExecutor + ?Sized> HttpExecutor for Box<T> {
    fn execute(&self, spec: &RequestSpec) -> ResultValue {
        self.as_ref().execute(spec)
    }
}

impl<T: HttpExecutor + ?Sized> HttpExecutor for Arc<T> {
    fn execute(&self, spec: &RequestSpec) -> ResultValue {
        self.as_ref().execute(spec)
    }
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
    processor: ResponseProcessor,
}

impl ReqwestExecutor {
    /// Create a new executor with the given connect and overall timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::default())
            .build()?;

        Ok(Self {
            client,
            processor: ResponseProcessor::default(),
        })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Use a custom response processor, e.g. one with extra formatters.
    pub fn with_processor(mut self, processor: ResponseProcessor) -> Self {
        self.processor = processor;
        self
    }

    fn try_execute(&self, spec: &RequestSpec) -> Result<ResultValue, Error> {
        let method: Method = spec.method.parse()?;
        let url = validate_url(&spec.url)?;
        let headers = build_headers(&spec.headers)?;

        log::debug!("Sending {} {}...", method, url);

        let mut req_builder = self.client.request(method.into(), url).headers(headers);

        if method.carries_body() {
            if let Some(body) = spec.body.as_deref().filter(|b| !b.trim().is_empty()) {
                req_builder = req_builder.body(body.to_string());
            }
        }

        let response = req_builder.send()?;

        let status = response.status().as_u16();

        let resp_headers = collect_headers(response.headers());
        let body_text = response.text()?;

        Ok(self
            .processor
            .process(status, resp_headers, Some(&body_text), &spec.url))
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, spec: &RequestSpec) -> ResultValue {
        self.try_execute(spec).unwrap_or_else(|error| {
            log::debug!("{} {} failed: {}", spec.method, spec.url, error);
            ResultValue::from_error(&error, spec.url.as_str())
        })
    }
}

/// Reject blank URLs and URLs without a scheme.
pub fn validate_url(url: &str) -> Result<Url, Error> {
    if url.trim().is_empty() {
        return Err(Error::InvalidUrl {
            message: "URL cannot be empty".to_string(),
        });
    }

    Url::parse(url).map_err(|e| Error::InvalidUrl {
        message: format!("{} ({}); URL must include a scheme such as http://", url, e),
    })
}

/// Convert user-entered headers, dropping blank names and trimming both sides.
pub fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let header_name = HeaderName::try_from(name)?;
        let header_value = HeaderValue::try_from(value.trim())?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Group response headers by name. Values that are not UTF-8 are kept lossily.
pub fn collect_headers(headers: &HeaderMap) -> HeaderMultiMap {
    let mut collected = HeaderMultiMap::new();
    for (name, value) in headers {
        collected
            .entry(name.to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}
