//! Schema-free JSON document store.
//!
//! Documents live in memory behind a read/write lock and are persisted as a
//! single JSON array. Queries are expressed with [`Filter`] predicates and
//! aggregation [`Stage`]s, so callers describe *what* to fetch and the store
//! does the matching, scoring, sorting and paging itself.

pub mod filter;
pub mod pipeline;

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

pub use filter::{Filter, Pattern, ScoreExpr};
pub use pipeline::{SortDirection, SortKey, Stage};

/// Name of the identifier field every document carries.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },

    #[error("invalid match pattern: {0}")]
    InvalidPattern(String),
}

pub struct DocumentStore {
    docs: RwLock<Vec<Value>>,
    persist_path: PathBuf,
    /// Serializes snapshot, write and rename so flushes never interleave.
    flush_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open the collection stored in `data_dir`, creating an empty one if needed.
    pub fn open_or_create(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        let persist_path = data_dir.join("recipes.json");

        let mut docs: Vec<Value> = if persist_path.exists() {
            let data = std::fs::read_to_string(&persist_path)?;
            serde_json::from_str(&data)?
        } else {
            Vec::new()
        };

        let mut assigned = 0usize;
        for (i, doc) in docs.iter_mut().enumerate() {
            let Value::Object(map) = doc else {
                return Err(StoreError::Malformed {
                    id: format!("#{i}"),
                    reason: "document is not a JSON object".to_string(),
                });
            };
            let current = map.get(ID_FIELD);
            if current.and_then(Value::as_str).is_some_and(|s| !s.is_empty()) {
                continue;
            }
            let id = current.and_then(canonical_id).unwrap_or_else(new_id);
            map.insert(ID_FIELD.to_string(), Value::String(id));
            assigned += 1;
        }

        let store = Self {
            docs: RwLock::new(docs),
            persist_path,
            flush_lock: Mutex::new(()),
        };
        if assigned > 0 {
            tracing::info!("Normalized identifiers of {assigned} stored documents");
            store.flush()?;
        }
        Ok(store)
    }

    /// Write the collection to disk (atomic via temp file + rename).
    pub fn flush(&self) -> Result<(), StoreError> {
        let _guard = self.flush_lock.lock();
        let data = {
            let docs = self.docs.read();
            serde_json::to_string(&*docs)?
        };
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)?;
        std::fs::rename(&tmp_path, &self.persist_path)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Filtered query with ordering and paging.
    pub fn find(&self, filter: &Filter, sort: &[SortKey], skip: usize, limit: usize) -> Vec<Value> {
        self.aggregate(&[
            Stage::Match(filter.clone()),
            Stage::Sort(sort.to_vec()),
            Stage::Skip(skip),
            Stage::Limit(limit),
        ])
    }

    pub fn find_one(&self, filter: &Filter) -> Option<Value> {
        self.docs.read().iter().find(|d| filter.matches(d)).cloned()
    }

    pub fn count(&self, filter: &Filter) -> usize {
        self.docs.read().iter().filter(|d| filter.matches(d)).count()
    }

    /// Run an aggregation pipeline. An empty pipeline returns every document.
    pub fn aggregate(&self, stages: &[Stage]) -> Vec<Value> {
        let (first_match, rest) = match stages.split_first() {
            Some((Stage::Match(filter), rest)) => (Some(filter), rest),
            _ => (None, stages),
        };

        // Only clone the documents that survive a leading match.
        let candidates: Vec<Value> = {
            let docs = self.docs.read();
            match first_match {
                Some(filter) => docs.iter().filter(|d| filter.matches(d)).cloned().collect(),
                None => docs.clone(),
            }
        };
        pipeline::run(candidates, rest)
    }

    /// Distinct string values at `path`, flattened across arrays.
    pub fn distinct(&self, path: &str) -> BTreeSet<String> {
        let docs = self.docs.read();
        docs.iter()
            .flat_map(|d| filter::resolve_path(d, path))
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Insert a document and return its generated identifier.
    pub fn insert(&self, mut fields: Map<String, Value>) -> Result<String, StoreError> {
        let id = new_id();
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.docs.write().push(Value::Object(fields));
        self.flush()?;
        Ok(id)
    }

    /// Overwrite the given top-level fields. Returns false if `id` is unknown.
    pub fn update(&self, id: &str, fields: Map<String, Value>) -> Result<bool, StoreError> {
        {
            let mut docs = self.docs.write();
            let Some(Value::Object(map)) = docs
                .iter_mut()
                .find(|d| d.get(ID_FIELD).and_then(Value::as_str) == Some(id))
            else {
                return Ok(false);
            };
            for (key, value) in fields {
                if key != ID_FIELD {
                    map.insert(key, value);
                }
            }
        }
        self.flush()?;
        Ok(true)
    }

    /// Remove a document. Returns false if `id` is unknown.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut docs = self.docs.write();
            let before = docs.len();
            docs.retain(|d| d.get(ID_FIELD).and_then(Value::as_str) != Some(id));
            docs.len() != before
        };
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// String form of an existing identifier: numbers as their text, extended-JSON
/// `{"$oid": "..."}` as the hex string. `None` if it has no usable form.
fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("$oid")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}
