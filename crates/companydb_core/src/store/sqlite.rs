//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist document bodies as JSON rows in the `documents` table.
//! - Evaluate equality filters and apply partial updates in core code,
//!   keeping SQL limited to row access.
//!
//! # Invariants
//! - Identity lives in the `uuid` column; stored bodies never contain `_id`.
//! - Returned documents always carry their identity under `_id`.
//! - Result order is insertion order within a collection.

use crate::db::migrations::latest_version;
use crate::store::document::{Document, DocumentId, Filter, UpdateDoc, ID_FIELD};
use crate::store::{DocumentStore, StoreError, StoreResult};
use rusqlite::{params, Connection};
use serde_json::Value;
use uuid::Uuid;

/// Store handle borrowing an already-migrated connection.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Constructs a store over a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   this binary.
    /// - `MissingRequiredTable` when the `documents` table is absent.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'documents';",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            return Err(StoreError::MissingRequiredTable("documents"));
        }

        Ok(Self { conn })
    }

    /// Loads all documents of a collection in insertion order, with identity
    /// injected under `_id`.
    fn load_collection(&self, collection: &str) -> StoreResult<Vec<(DocumentId, Document)>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, body FROM documents WHERE collection = ?1 ORDER BY rowid ASC;",
        )?;

        let mut rows = stmt.query([collection])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            let body_text: String = row.get(1)?;
            documents.push((
                parse_document_id(collection, &uuid_text)?,
                parse_body(collection, &uuid_text, &body_text)?,
            ));
        }

        Ok(documents)
    }

    fn find_matches(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> StoreResult<Vec<(DocumentId, Document)>> {
        let documents = self.load_collection(collection)?;
        Ok(documents
            .into_iter()
            .filter(|(_, document)| filter.matches(document))
            .collect())
    }

    fn write_back(
        &self,
        collection: &str,
        id: DocumentId,
        mut document: Document,
    ) -> StoreResult<()> {
        document.remove(ID_FIELD);
        let body = serialize_body(&document)?;
        self.conn.execute(
            "UPDATE documents
             SET body = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?2 AND uuid = ?3;",
            params![body, collection, id.to_string()],
        )?;
        Ok(())
    }

    fn delete_by_id(&self, collection: &str, id: DocumentId) -> StoreResult<u64> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND uuid = ?2;",
            params![collection, id.to_string()],
        )?;
        Ok(changed as u64)
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<DocumentId> {
        // Identity is always store-assigned; a caller-supplied `_id` is not
        // part of the body.
        document.remove(ID_FIELD);

        let id = Uuid::new_v4();
        let body = serialize_body(&document)?;
        self.conn.execute(
            "INSERT INTO documents (collection, uuid, body) VALUES (?1, ?2, ?3);",
            params![collection, id.to_string(), body],
        )?;

        Ok(id)
    }

    fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let matches = self.find_matches(collection, filter)?;
        Ok(matches
            .into_iter()
            .map(|(_, document)| document)
            .collect())
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let mut matches = self.find_matches(collection, filter)?;
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.remove(0).1))
    }

    fn get_by_id(&self, collection: &str, id: DocumentId) -> StoreResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM documents WHERE collection = ?1 AND uuid = ?2;")?;

        let mut rows = stmt.query(params![collection, id.to_string()])?;
        if let Some(row) = rows.next()? {
            let body_text: String = row.get(0)?;
            return Ok(Some(parse_body(collection, &id.to_string(), &body_text)?));
        }

        Ok(None)
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &UpdateDoc,
    ) -> StoreResult<u64> {
        let mut matches = self.find_matches(collection, filter)?;
        if matches.is_empty() {
            return Ok(0);
        }

        let (id, mut document) = matches.remove(0);
        update.apply(&mut document);
        self.write_back(collection, id, document)?;
        Ok(1)
    }

    fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &UpdateDoc,
    ) -> StoreResult<u64> {
        let matches = self.find_matches(collection, filter)?;
        let mut updated = 0;
        for (id, mut document) in matches {
            update.apply(&mut document);
            self.write_back(collection, id, document)?;
            updated += 1;
        }
        Ok(updated)
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut matches = self.find_matches(collection, filter)?;
        if matches.is_empty() {
            return Ok(0);
        }
        self.delete_by_id(collection, matches.remove(0).0)
    }

    fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let matches = self.find_matches(collection, filter)?;
        let mut deleted = 0;
        for (id, _) in matches {
            deleted += self.delete_by_id(collection, id)?;
        }
        Ok(deleted)
    }

    fn populate(
        &self,
        documents: Vec<Document>,
        ref_field: &str,
        target_collection: &str,
    ) -> StoreResult<Vec<Document>> {
        let mut populated = Vec::with_capacity(documents.len());
        for mut document in documents {
            // Non-identifier-shaped values and dangling references degrade
            // silently to "no match" and keep their raw value.
            let target_id = document
                .get(ref_field)
                .and_then(Value::as_str)
                .and_then(|value| Uuid::parse_str(value).ok());

            if let Some(id) = target_id {
                if let Some(target) = self.get_by_id(target_collection, id)? {
                    document.insert(ref_field.to_string(), Value::Object(target));
                }
            }

            populated.push(document);
        }
        Ok(populated)
    }
}

fn parse_document_id(collection: &str, uuid_text: &str) -> StoreResult<DocumentId> {
    Uuid::parse_str(uuid_text).map_err(|_| {
        StoreError::InvalidDocument(format!(
            "invalid uuid value `{uuid_text}` in collection `{collection}`"
        ))
    })
}

fn parse_body(collection: &str, uuid_text: &str, body_text: &str) -> StoreResult<Document> {
    let value: Value = serde_json::from_str(body_text).map_err(|err| {
        StoreError::InvalidDocument(format!(
            "unreadable body for `{uuid_text}` in collection `{collection}`: {err}"
        ))
    })?;

    let mut document = match value {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::InvalidDocument(format!(
                "body for `{uuid_text}` in collection `{collection}` is not an object: {other}"
            )));
        }
    };

    document.insert(ID_FIELD.to_string(), Value::String(uuid_text.to_string()));
    Ok(document)
}

fn serialize_body(document: &Document) -> StoreResult<String> {
    serde_json::to_string(document)
        .map_err(|err| StoreError::InvalidDocument(format!("unserializable body: {err}")))
}
