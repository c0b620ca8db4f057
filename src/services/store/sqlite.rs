use anyhow::{anyhow, Context, Result};
use chrono::Local;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{RecordStore, StoredDocument};

/// [`RecordStore`] backed by the `documents` table.
pub struct SqliteRecordStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteRecordStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn write(&self, collection: &str, id: &str, data: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string(data).context("Failed to encode document")?;
        let now = Local::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO documents (collection, id, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(collection, id) DO UPDATE SET
                    data = excluded.data,
                    updated_at = excluded.updated_at",
                params![collection, id, json, now],
            )
            .with_context(|| format!("Failed to write {}/{}", collection, id))?;

        Ok(())
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>> {
        self.conn
            .query_row(
                "SELECT id, data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                map_document_row,
            )
            .optional()
            .with_context(|| format!("Failed to read {}/{}", collection, id))
    }

    fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data FROM documents WHERE collection = ?1 ORDER BY rowid ASC",
        )?;

        let documents = stmt
            .query_map([collection], map_document_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to list {}", collection))?;

        Ok(documents)
    }

    fn query_eq(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<StoredDocument>> {
        let Some(bound) = scalar_to_sql(value) else {
            // Nulls and nested values are compared on the decoded documents.
            return Ok(self
                .list(collection)?
                .into_iter()
                .filter(|doc| doc.data.get(field).unwrap_or(&Value::Null) == value)
                .collect());
        };

        log::debug!("Querying {} where {} == {}", collection, field, value);
        let path = format!("$.\"{}\"", field.replace('"', "\\\""));
        let mut stmt = self.conn.prepare(
            "SELECT id, data FROM documents
             WHERE collection = ?1 AND json_extract(data, ?2) = ?3
             ORDER BY rowid ASC",
        )?;

        let documents = stmt
            .query_map(params![collection, path, bound], map_document_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to query {}", collection))?;

        Ok(documents)
    }

    fn create(&self, collection: &str, data: Map<String, Value>) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.write(collection, &id, &data)?;
        Ok(id)
    }

    fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()> {
        self.write(collection, id, &data)
    }

    fn update(&self, collection: &str, id: &str, patch: Map<String, Value>) -> Result<()> {
        let mut existing = self
            .get(collection, id)?
            .ok_or_else(|| anyhow!("{} document {} not found", collection, id))?;

        for (key, value) in patch {
            existing.data.insert(key, value);
        }

        self.write(collection, id, &existing.data)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )
            .with_context(|| format!("Failed to delete {}/{}", collection, id))?;

        if rows_affected == 0 {
            return Err(anyhow!("{} document {} not found", collection, id));
        }

        Ok(())
    }
}

fn map_document_row(row: &Row<'_>) -> Result<StoredDocument, rusqlite::Error> {
    let id: String = row.get(0)?;
    let json: String = row.get(1)?;
    let data: Map<String, Value> = serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?;
    Ok(StoredDocument { id, data })
}

/// SQLite value that `json_extract` yields for a scalar JSON value.
fn scalar_to_sql(value: &Value) -> Option<SqlValue> {
    match value {
        Value::String(s) => Some(SqlValue::Text(s.clone())),
        Value::Bool(b) => Some(SqlValue::Integer(i64::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
