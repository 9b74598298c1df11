use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Error;
use crate::records::{NewResponse, ResponseRecord};

const TABLE: &str = "Responses";

/// CRUD access to recorded responses.
#[derive(Debug, Clone)]
pub struct ResponseStore {
    db: Database,
}

impl ResponseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a response and return its generated id.
    ///
    /// Fails if `request_id` names a request that does not exist.
    pub fn insert(&self, response: &NewResponse) -> Result<i64, Error> {
        log::debug!(
            "Recording response {} for request {:?}...",
            response.status_code,
            response.request_id
        );

        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO Responses (request_id, status_code, headers, body, summary) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                response.request_id,
                response.status_code,
                response.headers,
                response.body,
                response.summary,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> Result<ResponseRecord, Error> {
        let conn = self.db.connect()?;
        conn.query_row(
            &format!("SELECT {} FROM Responses WHERE id = ?1", ResponseRecord::COLUMNS),
            params![id],
            ResponseRecord::from_row,
        )
        .optional()?
        .ok_or(Error::NotFound { table: TABLE, id })
    }

    /// All responses, in insertion order.
    pub fn list_all(&self) -> Result<Vec<ResponseRecord>, Error> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM Responses ORDER BY id ASC",
            ResponseRecord::COLUMNS
        ))?;
        let records = stmt
            .query_map([], ResponseRecord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Responses linked to one request, in insertion order.
    pub fn list_for_request(&self, request_id: i64) -> Result<Vec<ResponseRecord>, Error> {
        let conn = self.db.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM Responses WHERE request_id = ?1 ORDER BY id ASC",
            ResponseRecord::COLUMNS
        ))?;
        let records = stmt
            .query_map(params![request_id], ResponseRecord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn delete(&self, id: i64) -> Result<(), Error> {
        log::debug!("Deleting response {}...", id);

        let conn = self.db.connect()?;
        let deleted = conn.execute("DELETE FROM Responses WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound { table: TABLE, id });
        }
        Ok(())
    }
}
