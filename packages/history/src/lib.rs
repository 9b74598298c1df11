//! # courier-history
//!
//! Durable audit trail of requests and responses, stored in SQLite.
//!
//! ```ignore
//! use courier_history::{Database, NewRequest, RequestStore};
//!
//! let db = Database::open("history.db")?;
//! let requests = RequestStore::new(db.clone());
//!
//! let id = requests.insert(&NewRequest {
//!     method: "GET".into(),
//!     url: "https://example.com".into(),
//!     headers: "{}".into(),
//!     body: None,
//! })?;
//! let record = requests.find_by_id(id)?;
//! ```
//!
//! Stores hold a [`Database`] handle rather than a connection. Each
//! operation opens its own connection and releases it before returning.

pub mod database;
pub mod error;
pub mod records;
pub mod requests;
pub mod responses;

pub use database::Database;
pub use error::Error;
pub use records::{NewRequest, NewResponse, RequestRecord, ResponseRecord};
pub use requests::RequestStore;
pub use responses::ResponseStore;
