use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Error;
use crate::records::{NewRequest, RequestRecord};

const TABLE: &str = "Requests";

/// CRUD access to recorded requests.
#[derive(Debug, Clone)]
pub struct RequestStore {
    db: Database,
}

impl RequestStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a request and return its generated id.
    pub fn insert(&self, request: &NewRequest) -> Result<i64, Error> {
        log::debug!("Recording request {} {}...", request.method, request.url);

        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO Requests (method, url, headers, body) VALUES (?1, ?2, ?3, ?4)",
            params![request.method, request.url, request.headers, request.body],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> Result<RequestRecord, Error> {
        let conn = self.db.connect()?;
        conn.query_row(
            &format!("SELECT {} FROM Requests WHERE id = ?1", RequestRecord::COLUMNS),
            params![id],
            RequestRecord::from_row,
        )
        .optional()?
        .ok_or(Error::NotFound { table: TABLE, id })
    }

    /// All requests, newest first.
    pub fn list_all(&self) -> Result<Vec<RequestRecord>, Error> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM Requests ORDER BY created_at DESC, id DESC",
            RequestRecord::COLUMNS
        ))?;
        let records = stmt
            .query_map([], RequestRecord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Delete a request. Responses that pointed at it lose their link.
    pub fn delete(&self, id: i64) -> Result<(), Error> {
        log::debug!("Deleting request {}...", id);

        let conn = self.db.connect()?;
        let deleted = conn.execute("DELETE FROM Requests WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound { table: TABLE, id });
        }
        Ok(())
    }
}
