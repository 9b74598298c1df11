use chrono::NaiveDateTime;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A request about to be recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewRequest {
    pub method: String,
    pub url: String,
    /// Serialized header mapping.
    pub headers: String,
    pub body: Option<String>,
}

/// A stored request. Never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestRecord {
    pub id: i64,
    pub method: String,
    pub url: String,
    pub headers: String,
    pub body: Option<String>,
    /// Assigned by the database on insert (UTC).
    pub created_at: NaiveDateTime,
}

impl RequestRecord {
    pub(crate) const COLUMNS: &'static str = "id, method, url, headers, body, created_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            method: row.get(1)?,
            url: row.get(2)?,
            headers: row.get(3)?,
            body: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// A response about to be recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewResponse {
    /// The request this answers, if that request was recorded.
    pub request_id: Option<i64>,
    /// -1 when the request failed before a response arrived.
    pub status_code: i32,
    /// Serialized multi-valued header mapping.
    pub headers: String,
    /// Formatted body text.
    pub body: String,
    /// Content type of the response.
    pub summary: String,
}

/// A stored response. Never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseRecord {
    pub id: i64,
    pub request_id: Option<i64>,
    pub status_code: i32,
    pub headers: String,
    pub body: String,
    pub summary: String,
    pub created_at: NaiveDateTime,
}

impl ResponseRecord {
    pub(crate) const COLUMNS: &'static str =
        "id, request_id, status_code, headers, body, summary, created_at";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            request_id: row.get(1)?,
            status_code: row.get(2)?,
            headers: row.get(3)?,
            body: row.get(4)?,
            summary: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}
