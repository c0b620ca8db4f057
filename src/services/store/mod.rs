//! Generic document store.
//!
//! Collections hold JSON objects keyed by an opaque string id. The typed
//! services (`availability`, `subject`, `career`, `user`) sit on top of the
//! [`RecordStore`] trait; [`SqliteRecordStore`] is the local implementation.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

mod sqlite;

pub use sqlite::SqliteRecordStore;

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const CAREERS: &str = "careers";
    pub const SUBJECTS: &str = "subjects";
    pub const AVAILABILITY: &str = "teacherAvailability";
}

/// A document and its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Map<String, Value>,
}

impl StoredDocument {
    /// Deserialize the document body into a typed model.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.data.clone()))
            .map_err(|e| anyhow!("Malformed document {}: {}", self.id, e))
    }
}

/// Serialize a model into a document body.
pub fn to_document<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("Expected a JSON object, got {}", other)),
    }
}

/// Document collection access.
///
/// Reads return `Ok(None)`/empty for absent data; `update` and `delete`
/// fail when the target document does not exist.
pub trait RecordStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>>;

    /// Every document in a collection, in insertion order.
    fn list(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Documents whose top-level `field` equals `value`.
    fn query_eq(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<StoredDocument>>;

    /// Insert with a generated id, which is returned.
    fn create(&self, collection: &str, data: Map<String, Value>) -> Result<String>;

    /// Create or replace the document with the given id.
    fn set(&self, collection: &str, id: &str, data: Map<String, Value>) -> Result<()>;

    /// Merge top-level fields into an existing document.
    fn update(&self, collection: &str, id: &str, patch: Map<String, Value>) -> Result<()>;

    fn delete(&self, collection: &str, id: &str) -> Result<()>;
}
