//! # courier
//!
//! An API tester that keeps a durable history of every request it sends.
//!
//! ```ignore
//! use std::collections::HashMap;
//! use courier::{Config, PersistenceGateway};
//!
//! let gateway = PersistenceGateway::from_config(&Config::default())?;
//!
//! let result = gateway.get("https://httpbin.org/json", &HashMap::new());
//! println!("{}", result);
//! println!("{}", result.body);
//!
//! for request in gateway.requests().list_all()? {
//!     println!("#{} {} {} at {}", request.id, request.method, request.url, request.created_at);
//! }
//! ```
//!
//! The request is recorded before it is sent and the response after it
//! arrives. History write failures are logged through the `log` facade and
//! never change the returned result.

pub mod config;
pub mod error;
pub mod gateway;

pub use config::Config;
pub use error::GatewayError;
pub use gateway::PersistenceGateway;

pub use courier_history::{
    Database, NewRequest, NewResponse, RequestRecord, RequestStore, ResponseRecord, ResponseStore,
};
pub use courier_http::{
    format_json, BodyFormatter, FormatterRegistry, HttpExecutor, Method, ReqwestExecutor,
    RequestSpec, ResponseProcessor, ResultValue,
};
