//! # courier-http
//!
//! Request execution and response formatting for Courier.
//!
//! A [`RequestSpec`] goes in, a [`ResultValue`] comes out. The executor
//! validates the method and URL, performs the call with a fixed timeout, and
//! hands the raw response to a [`ResponseProcessor`], which picks a body
//! formatter from the response content type.
//!
//! ```ignore
//! use courier_http::{HttpExecutor, ReqwestExecutor, RequestSpec};
//!
//! let executor = ReqwestExecutor::with_default_timeout()?;
//! let result = executor.execute(
//!     &RequestSpec::get("https://httpbin.org/json").with_header("Accept", "application/json"),
//! );
//!
//! if result.is_error {
//!     eprintln!("{}", result.error_message.unwrap_or_default());
//! } else {
//!     println!("{}\n{}", result, result.body);
//! }
//! ```
//!
//! Failures never escape `execute`; they come back with `status_code == -1`
//! and `is_error == true`.

pub mod error;
pub mod executor;
pub mod format;
pub mod processor;
pub mod types;

// Re-export main types
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor, DEFAULT_TIMEOUT};
pub use format::{format_json, BodyFormatter, FormatterRegistry, JsonPrettyPrinter, Passthrough};
pub use processor::ResponseProcessor;
pub use types::{
    HeaderMultiMap, Method, RequestSpec, ResultValue, CLIENT_FAILURE_STATUS, DEFAULT_CONTENT_TYPE,
};
