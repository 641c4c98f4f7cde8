use companydb_core::db::migrations::latest_version;
use companydb_core::db::{open_db, open_db_in_memory};
use companydb_core::{Document, DocumentStore, Filter, SqliteDocumentStore, StoreError, UpdateDoc};
use rusqlite::Connection;
use serde_json::{json, Value};

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

#[test]
fn insert_assigns_identity_and_find_carries_it() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let id = store
        .insert_one("employees", doc(json!({ "firstName": "John" })))
        .unwrap();

    let found = store.find("employees", &Filter::new()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["_id"], json!(id.to_string()));
    assert_eq!(found[0]["firstName"], json!("John"));
}

#[test]
fn find_one_returns_none_when_nothing_matches() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let result = store
        .find_one("employees", &Filter::new().eq("firstName", "nobody"))
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn find_preserves_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    for name in ["a", "b", "c"] {
        store
            .insert_one("employees", doc(json!({ "firstName": name })))
            .unwrap();
    }

    let names: Vec<Value> = store
        .find("employees", &Filter::new())
        .unwrap()
        .into_iter()
        .map(|mut document| document.remove("firstName").unwrap())
        .collect();
    assert_eq!(names, vec![json!("a"), json!("b"), json!("c")]);
}

#[test]
fn collections_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    store
        .insert_one("employees", doc(json!({ "name": "shared" })))
        .unwrap();
    store
        .insert_one("departments", doc(json!({ "name": "shared" })))
        .unwrap();

    assert_eq!(store.find("employees", &Filter::new()).unwrap().len(), 1);
    assert_eq!(store.find("departments", &Filter::new()).unwrap().len(), 1);
    assert!(store.find("other", &Filter::new()).unwrap().is_empty());
}

#[test]
fn update_one_merges_into_the_first_match_only() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    store
        .insert_one(
            "employees",
            doc(json!({ "firstName": "John", "department": "IT" })),
        )
        .unwrap();
    store
        .insert_one(
            "employees",
            doc(json!({ "firstName": "Jane", "department": "IT" })),
        )
        .unwrap();

    let changed = store
        .update_one(
            "employees",
            &Filter::new().eq("department", "IT"),
            &UpdateDoc::new().set("department", "HR"),
        )
        .unwrap();
    assert_eq!(changed, 1);

    let first = store
        .find_one("employees", &Filter::new().eq("firstName", "John"))
        .unwrap()
        .unwrap();
    // Untouched fields survive the partial replacement.
    assert_eq!(first["department"], json!("HR"));
    assert_eq!(first["firstName"], json!("John"));

    let second = store
        .find_one("employees", &Filter::new().eq("firstName", "Jane"))
        .unwrap()
        .unwrap();
    assert_eq!(second["department"], json!("IT"));
}

#[test]
fn update_many_counts_every_match() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    for name in ["a", "b", "c"] {
        store
            .insert_one("employees", doc(json!({ "firstName": name, "flag": "x" })))
            .unwrap();
    }

    let changed = store
        .update_many(
            "employees",
            &Filter::new().eq("flag", "x"),
            &UpdateDoc::new().set("flag", "y"),
        )
        .unwrap();
    assert_eq!(changed, 3);

    let updated = store
        .find("employees", &Filter::new().eq("flag", "y"))
        .unwrap();
    assert_eq!(updated.len(), 3);
}

#[test]
fn delete_operations_report_counts_and_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    store
        .insert_one("employees", doc(json!({ "firstName": "John" })))
        .unwrap();
    store
        .insert_one("employees", doc(json!({ "firstName": "Jane" })))
        .unwrap();

    assert_eq!(store.delete_one("employees", &Filter::new()).unwrap(), 1);
    assert_eq!(store.delete_many("employees", &Filter::new()).unwrap(), 1);
    assert_eq!(store.delete_many("employees", &Filter::new()).unwrap(), 0);
    assert!(store.find("employees", &Filter::new()).unwrap().is_empty());
}

#[test]
fn populate_substitutes_matching_references() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let dep_id = store
        .insert_one("departments", doc(json!({ "name": "TestDep" })))
        .unwrap();
    store
        .insert_one(
            "employees",
            doc(json!({ "firstName": "John", "department": dep_id.to_string() })),
        )
        .unwrap();

    let employees = store.find("employees", &Filter::new()).unwrap();
    let populated = store
        .populate(employees, "department", "departments")
        .unwrap();

    let department = populated[0]["department"].as_object().unwrap();
    assert_eq!(department["name"], json!("TestDep"));
    assert_eq!(department["_id"], json!(dep_id.to_string()));
}

#[test]
fn populate_leaves_non_identifier_values_untouched() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    store
        .insert_one(
            "employees",
            doc(json!({ "firstName": "John", "department": "IT" })),
        )
        .unwrap();

    let employees = store.find("employees", &Filter::new()).unwrap();
    let populated = store
        .populate(employees, "department", "departments")
        .unwrap();

    assert_eq!(populated[0]["department"], json!("IT"));
}

#[test]
fn populate_leaves_dangling_references_untouched() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let dangling = "11111111-2222-4333-8444-555555555555";
    store
        .insert_one(
            "employees",
            doc(json!({ "firstName": "John", "department": dangling })),
        )
        .unwrap();

    let employees = store.find("employees", &Filter::new()).unwrap();
    let populated = store
        .populate(employees, "department", "departments")
        .unwrap();

    assert_eq!(populated[0]["department"], json!(dangling));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteDocumentStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_documents_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteDocumentStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("documents"))
    ));
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("company.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteDocumentStore::try_new(&conn).unwrap();
        store
            .insert_one("departments", doc(json!({ "name": "TestDep" })))
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let found = store
        .find_one("departments", &Filter::new().eq("name", "TestDep"))
        .unwrap();
    assert!(found.is_some());
}
