use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Status code reported when the request never produced an HTTP response.
pub const CLIENT_FAILURE_STATUS: i32 = -1;

/// Content type assumed when a response does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Multi-valued header mapping, keyed by header name.
pub type HeaderMultiMap = BTreeMap<String, Vec<String>>;

/// HTTP method for requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }

    /// Whether a request body is attached for this method.
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT)
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parses a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(Error::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

/// An ad-hoc request as entered by the user.
///
/// The method is kept as raw text; it is validated when the request is
/// executed so that an unsupported verb becomes an error result rather than
/// a construction failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,

    /// Absolute URL, including the scheme.
    pub url: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Request body. Only sent for POST and PUT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET.as_str(), url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST.as_str(), url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT.as_str(), url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE.as_str(), url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Structured outcome of a request, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultValue {
    /// HTTP status code, or [`CLIENT_FAILURE_STATUS`] when no response arrived.
    pub status_code: i32,

    pub url: String,

    pub headers: HeaderMultiMap,

    pub content_type: String,

    /// Formatted body text, ready for display.
    pub body: String,

    /// UTF-8 length of the body as received, before formatting.
    pub body_size_bytes: u64,

    /// Wall-clock time at which the response was processed.
    pub captured_at_millis: i64,

    pub is_error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ResultValue {
    /// Build the error-shaped result for a request that failed client-side.
    pub fn from_error(error: &Error, url: impl Into<String>) -> Self {
        let message = error.to_string();
        Self {
            status_code: CLIENT_FAILURE_STATUS,
            url: url.into(),
            headers: HeaderMultiMap::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            body: format!("Error: {}", message),
            body_size_bytes: 0,
            captured_at_millis: chrono::Utc::now().timestamp_millis(),
            is_error: true,
            error_message: Some(message),
        }
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Reason phrase for the status code, e.g. "Not Found".
    pub fn status_text(&self) -> &'static str {
        u16::try_from(self.status_code)
            .ok()
            .and_then(|code| http::StatusCode::from_u16(code).ok())
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HTTP {} {}", self.status_code, self.status_text())?;
        writeln!(f, "URL: {}", self.url)?;
        writeln!(f, "Content-Type: {}", self.content_type)?;
        writeln!(f, "Body Size: {} bytes", self.body_size_bytes)?;
        if let Some(message) = self.error_message.as_deref().filter(|_| self.is_error) {
            writeln!(f, "Error: {}", message)?;
        }
        Ok(())
    }
}
