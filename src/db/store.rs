//! Document store: schema-less collections of JSON documents on SQLite.
//!
//! Operations mirror the collection/document API the apps use:
//! `get`, `get_where`, `add`, `update` (shallow merge), `delete`,
//! `delete_field`. Each write touches exactly one document; there are no
//! multi-document transactions.

use crate::db::cache::{CacheStats, Change, ChangeKind, DocumentCache};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{Collection, Record, Stored};
use chrono::Local;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};
use uuid::Uuid;

pub struct DocumentStore {
    pool: DbPool,
    cache: Option<DocumentCache>,
}

fn now() -> String {
    Local::now().to_rfc3339()
}

fn map_row(row: &Row) -> rusqlite::Result<Stored<Value>> {
    let raw: String = row.get("data")?;
    let data = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Stored {
        id: row.get("id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        data,
    })
}

/// JSON scalar → SQLite value comparable with `json_extract` output.
fn to_sql_value(value: &Value) -> AppResult<SqlValue> {
    Ok(match value {
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::Null => SqlValue::Null,
        other => {
            return Err(AppError::InvalidInput(format!(
                "only scalar values can be matched, got {}",
                other
            )));
        }
    })
}

fn as_object(value: Value, what: &str) -> AppResult<Map<String, Value>> {
    match value {
        Value::Object(m) => Ok(m),
        other => Err(AppError::InvalidInput(format!(
            "{} must be a JSON object, got {}",
            what, other
        ))),
    }
}

impl DocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool, cache: None }
    }

    /// Open the database at `path` and bring its schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        init_db(&pool.conn)?;
        Ok(Self::new(pool))
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let pool = DbPool::in_memory()?;
        init_db(&pool.conn)?;
        Ok(Self::new(pool))
    }

    /// Enable the read-through cache for the lifetime of this store.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(DocumentCache::new());
        self
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(DocumentCache::stats)
    }

    /// Register a change callback. No-op when the cache is disabled.
    pub fn subscribe(
        &mut self,
        collection: Option<Collection>,
        callback: Box<dyn FnMut(&Change)>,
    ) -> bool {
        match self.cache.as_mut() {
            Some(c) => {
                c.subscribe(collection, callback);
                true
            }
            None => false,
        }
    }

    fn notify(&mut self, collection: Collection, id: &str, kind: ChangeKind) {
        if let Some(c) = self.cache.as_mut() {
            c.invalidate(Change {
                collection,
                id: id.to_string(),
                kind,
            });
        }
    }

    // ---------------------------
    // Reads
    // ---------------------------

    /// All documents of a collection, oldest first.
    pub fn get(&mut self, collection: Collection) -> AppResult<Vec<Stored<Value>>> {
        if let Some(docs) = self.cache.as_mut().and_then(|c| c.get_all(collection)) {
            return Ok(docs);
        }

        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT id, data, created_at, updated_at FROM documents
             WHERE collection = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map([collection.name()], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        drop(stmt);

        if let Some(c) = self.cache.as_mut() {
            c.put_all(collection, &out);
        }
        Ok(out)
    }

    pub fn get_by_id(
        &mut self,
        collection: Collection,
        id: &str,
    ) -> AppResult<Option<Stored<Value>>> {
        if let Some(doc) = self.cache.as_mut().and_then(|c| c.get(collection, id)) {
            return Ok(Some(doc));
        }

        let doc = self
            .pool
            .conn
            .query_row(
                "SELECT id, data, created_at, updated_at FROM documents
                 WHERE collection = ?1 AND id = ?2",
                params![collection.name(), id],
                map_row,
            )
            .optional()?;

        if let (Some(c), Some(d)) = (self.cache.as_mut(), doc.as_ref()) {
            c.put(collection, d.clone());
        }
        Ok(doc)
    }

    /// Documents whose top-level `field` equals `value`, oldest first.
    pub fn get_where(
        &mut self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Stored<Value>>> {
        let needle = to_sql_value(value)?;
        let path = format!("$.\"{}\"", field.replace('"', ""));

        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT id, data, created_at, updated_at FROM documents
             WHERE collection = ?1 AND json_extract(data, ?2) = ?3
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![collection.name(), path, needle], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        drop(stmt);

        if let Some(c) = self.cache.as_mut() {
            for d in &out {
                c.put(collection, d.clone());
            }
        }
        Ok(out)
    }

    pub fn count(&self, collection: Collection) -> AppResult<i64> {
        Ok(self.pool.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            [collection.name()],
            |row| row.get(0),
        )?)
    }

    // ---------------------------
    // Writes
    // ---------------------------

    /// Create a document with a fresh id and return the id.
    pub fn add(&mut self, collection: Collection, data: Value) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        self.add_with_id(collection, &id, data)?;
        Ok(id)
    }

    /// Create a document under a caller-chosen id (imports).
    pub fn add_with_id(&mut self, collection: Collection, id: &str, data: Value) -> AppResult<()> {
        let obj = as_object(data, "document")?;
        let ts = now();

        self.pool.conn.execute(
            "INSERT INTO documents (id, collection, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![id, collection.name(), Value::Object(obj).to_string(), ts],
        )?;

        self.notify(collection, id, ChangeKind::Added);
        Ok(())
    }

    /// Shallow merge of `partial` into the stored document (last write wins).
    pub fn update(&mut self, collection: Collection, id: &str, partial: Value) -> AppResult<()> {
        let patch = as_object(partial, "update")?;
        let mut current = self.load_object(collection, id)?;

        for (k, v) in patch {
            current.insert(k, v);
        }

        self.write_object(collection, id, current)?;
        self.notify(collection, id, ChangeKind::Updated);
        Ok(())
    }

    pub fn delete(&mut self, collection: Collection, id: &str) -> AppResult<()> {
        let n = self.pool.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
        )?;

        if n == 0 {
            return Err(AppError::NotFound(format!("{}/{}", collection, id)));
        }

        self.notify(collection, id, ChangeKind::Deleted);
        Ok(())
    }

    /// Remove one top-level field. Removing a field that is absent is not an error.
    pub fn delete_field(&mut self, collection: Collection, id: &str, field: &str) -> AppResult<()> {
        let mut current = self.load_object(collection, id)?;

        if current.remove(field).is_some() {
            self.write_object(collection, id, current)?;
            self.notify(collection, id, ChangeKind::Updated);
        }
        Ok(())
    }

    fn load_object(&mut self, collection: Collection, id: &str) -> AppResult<Map<String, Value>> {
        let raw: Option<String> = self
            .pool
            .conn
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.name(), id],
                |row| row.get(0),
            )
            .optional()?;

        let raw = raw.ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;
        as_object(serde_json::from_str(&raw)?, "stored document")
    }

    fn write_object(
        &mut self,
        collection: Collection,
        id: &str,
        obj: Map<String, Value>,
    ) -> AppResult<()> {
        self.pool.conn.execute(
            "UPDATE documents SET data = ?1, updated_at = ?2
             WHERE collection = ?3 AND id = ?4",
            params![Value::Object(obj).to_string(), now(), collection.name(), id],
        )?;
        Ok(())
    }

    // ---------------------------
    // Typed helpers
    // ---------------------------

    /// All documents of `collection` read as `T`.
    /// Documents that do not fit the shape are skipped with a warning.
    pub fn list_as<T: Record>(&mut self, collection: Collection) -> AppResult<Vec<Stored<T>>> {
        let docs = self.get(collection)?;
        Ok(docs.into_iter().filter_map(|d| decode(collection, d)).collect())
    }

    pub fn list<T: Record>(&mut self) -> AppResult<Vec<Stored<T>>> {
        self.list_as(T::COLLECTION)
    }

    pub fn find_where<T: Record>(
        &mut self,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Stored<T>>> {
        let docs = self.get_where(T::COLLECTION, field, value)?;
        Ok(docs
            .into_iter()
            .filter_map(|d| decode(T::COLLECTION, d))
            .collect())
    }

    /// Like `find_where`, but a matching document that does not read as `T`
    /// is an error instead of being skipped.
    pub fn find_where_strict<T: Record>(
        &mut self,
        field: &str,
        value: &Value,
    ) -> AppResult<Vec<Stored<T>>> {
        let docs = self.get_where(T::COLLECTION, field, value)?;
        docs.into_iter()
            .map(|d| match serde_json::from_value::<T>(d.data.clone()) {
                Ok(data) => Ok(d.map(|_| data)),
                Err(e) => Err(AppError::InvalidInput(format!(
                    "{}/{} is not a readable record: {}",
                    T::COLLECTION,
                    d.id,
                    e
                ))),
            })
            .collect()
    }

    /// One document by id, `NotFound` when missing.
    pub fn fetch_as<T: Record>(
        &mut self,
        collection: Collection,
        id: &str,
    ) -> AppResult<Stored<T>> {
        let doc = self
            .get_by_id(collection, id)?
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;

        let data = serde_json::from_value(doc.data.clone())?;
        Ok(doc.map(|_| data))
    }

    pub fn fetch<T: Record>(&mut self, id: &str) -> AppResult<Stored<T>> {
        self.fetch_as(T::COLLECTION, id)
    }

    pub fn insert_as<T: Record>(
        &mut self,
        collection: Collection,
        record: &T,
    ) -> AppResult<String> {
        self.add(collection, serde_json::to_value(record)?)
    }

    pub fn insert<T: Record>(&mut self, record: &T) -> AppResult<String> {
        self.insert_as(T::COLLECTION, record)
    }

    /// Resolve a full id or a unique id prefix (as shown in tables).
    pub fn resolve_id(&mut self, collection: Collection, prefix: &str) -> AppResult<String> {
        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT id FROM documents WHERE collection = ?1 AND id LIKE ?2 || '%' LIMIT 2",
        )?;
        let ids: Vec<String> = stmt
            .query_map(params![collection.name(), prefix], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        match ids.as_slice() {
            [one] => Ok(one.clone()),
            [] => Err(AppError::NotFound(format!("{}/{}", collection, prefix))),
            _ => Err(AppError::InvalidInput(format!(
                "id prefix '{}' is ambiguous in {}",
                prefix, collection
            ))),
        }
    }
}

fn decode<T: Record>(collection: Collection, doc: Stored<Value>) -> Option<Stored<T>> {
    match serde_json::from_value::<T>(doc.data.clone()) {
        Ok(data) => Some(doc.map(|_| data)),
        Err(e) => {
            log::warn!("skipping {}/{}: {}", collection, doc.id, e);
            None
        }
    }
}
