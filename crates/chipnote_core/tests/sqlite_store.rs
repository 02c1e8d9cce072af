use chipnote_core::db::migrations::{apply_migrations, latest_version};
use chipnote_core::db::{open_db, open_db_in_memory, DbError};
use chipnote_core::{partition, CategorizedTokens, SqliteTaskStore, StoreError, TaskStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tasks");
    assert_table_exists(&conn, "task_items");
    assert_index_exists(&conn, "idx_task_items_kind");
}

#[test]
fn first_migration_leaves_kind_index_to_the_second() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_tasks.sql"))
        .unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    assert!(!index_exists(&conn, "idx_task_items_kind"));

    apply_migrations(&mut conn).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_index_exists(&conn, "idx_task_items_kind");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chipnote.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "tasks");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn created_task_reads_back_with_same_partition() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let tokens = partition(&[
        "test@example.com",
        "#work",
        "https://example.com",
        "Alice",
        "buy milk",
        "#home",
    ]);

    let created = store.create_task(&tokens).await.unwrap();

    let mut feed = store.list_tasks().await.unwrap();
    let tasks = feed.current();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, created.id);
    assert_eq!(tasks[0].created_at, created.created_at);
    assert_eq!(tasks[0].tokens, tokens);
    assert_eq!(
        tasks[0].tokens.tags,
        vec!["#work".to_string(), "#home".to_string()]
    );
}

#[tokio::test]
async fn empty_partition_is_rejected_without_writing() {
    let store = SqliteTaskStore::open_in_memory().unwrap();

    let err = store
        .create_task(&CategorizedTokens::default())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::EmptyTask));
    assert!(store.list_tasks().await.unwrap().current().is_empty());
}

#[tokio::test]
async fn feed_emits_newest_first_after_each_create() {
    let store = SqliteTaskStore::open_in_memory().unwrap();
    let mut feed = store.list_tasks().await.unwrap();
    assert!(feed.current().is_empty());

    let first = store.create_task(&partition(&["first"])).await.unwrap();
    let after_first = feed.changed().await.unwrap();
    assert_eq!(after_first.len(), 1);

    let second = store.create_task(&partition(&["second"])).await.unwrap();
    let after_second = feed.changed().await.unwrap();
    assert_eq!(after_second.len(), 2);
    assert_eq!(after_second[0].id, second.id);
    assert_eq!(after_second[1].id, first.id);
}

#[tokio::test]
async fn reopened_file_store_lists_persisted_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let created = {
        let store = SqliteTaskStore::open(&path).unwrap();
        store
            .create_task(&partition(&["Bob", "bob@example.com"]))
            .await
            .unwrap()
    };

    let store = SqliteTaskStore::open(&path).unwrap();
    let tasks = store.list_tasks().await.unwrap().current();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, created.id);
    assert_eq!(tasks[0].tokens.contacts, vec!["Bob".to_string()]);
    assert_eq!(tasks[0].tokens.email, vec!["bob@example.com".to_string()]);
}

#[tokio::test]
async fn committed_create_succeeds_when_another_row_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let store = SqliteTaskStore::open(&path).unwrap();
    let mut feed = store.list_tasks().await.unwrap();

    let side = Connection::open(&path).unwrap();
    side.execute("INSERT INTO tasks (uuid, created_at) VALUES ('bad', 0);", [])
        .unwrap();

    let created = store.create_task(&partition(&["note"])).await.unwrap();

    let persisted: i64 = side
        .query_row(
            "SELECT COUNT(*) FROM tasks WHERE uuid = ?1;",
            [created.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(persisted, 1);

    let pushed = feed.changed().await.unwrap();
    assert_eq!(pushed.len(), 1);
    assert_eq!(pushed[0].id, created.id);
}

#[test]
fn unknown_item_kind_is_rejected_on_load() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO tasks (uuid, created_at) VALUES ('7f0c3c1e-6c1b-4f0e-9d59-1d3f6f1c2a10', 1);
         PRAGMA ignore_check_constraints = ON;
         INSERT INTO task_items (task_uuid, position, kind, value)
         VALUES ('7f0c3c1e-6c1b-4f0e-9d59-1d3f6f1c2a10', 0, 'phone', '555');
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();

    let err = SqliteTaskStore::try_new(conn).err().unwrap();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}

fn index_exists(conn: &Connection, index_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1);",
            [index_name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert!(
        index_exists(conn, index_name),
        "expected index `{index_name}` to exist"
    );
}
