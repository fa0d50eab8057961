// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! SQLite storage backend.
//!
//! ## Query Construction
//!
//! Identifiers (table and column names) are taken from the static
//! [`Table`] catalogue and checked before a statement is assembled. Values
//! are always bound as positional parameters, never spliced into SQL text.
//!
//! ## Transactions
//!
//! Each mutation runs in its own transaction. Any error drops the
//! transaction before commit, which rolls it back.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use base64ct::{Base64, Encoding};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension};
use serde_json::{Map, Number, Value};

use super::schema::SQLITE_SCHEMA;
use super::{Fields, Record, Storage, StorageError, StorageResult, Table};

/// Busy timeout applied to the connection.
const BUSY_TIMEOUT_MS: u64 = 5_000;

/// [`Storage`] backed by a single SQLite connection.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file at `path` and apply the schema.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Database(format!("create {parent:?}: {e}")))?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database (lost on drop).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SQLITE_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("sqlite connection lock poisoned".to_string()))
    }
}

// =============================================================================
// Value Conversion
// =============================================================================

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(b) => Value::String(Base64::encode_string(&b)),
    }
}

/// Translate constraint failures into their storage-level meaning.
fn map_write_error(table: Table, err: rusqlite::Error) -> StorageError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            let detail = message.clone().unwrap_or_default();
            if let Some(columns) = detail.strip_prefix("UNIQUE constraint failed: ") {
                return StorageError::UniqueViolation {
                    table,
                    columns: columns
                        .split(", ")
                        .map(|qualified| {
                            qualified
                                .rsplit('.')
                                .next()
                                .unwrap_or(qualified)
                                .to_string()
                        })
                        .collect(),
                };
            }
            if detail.contains("FOREIGN KEY") {
                return StorageError::ReferenceViolation { table };
            }
        }
    }
    StorageError::from(err)
}

/// First table holding a row that still references `table`'s row `id`.
fn blocking_dependent(conn: &Connection, table: Table, id: i64) -> StorageResult<Option<Table>> {
    for dependent in Table::ALL {
        for (column, target) in dependent.references() {
            if *target != table {
                continue;
            }
            let sql = format!(
                "SELECT 1 FROM {} WHERE {} = ?1 LIMIT 1",
                dependent.name(),
                column
            );
            let found = conn
                .query_row(&sql, [id], |_| Ok(()))
                .optional()?
                .is_some();
            if found {
                return Ok(Some(dependent));
            }
        }
    }
    Ok(None)
}

fn check_fields(table: Table, fields: &Fields) -> StorageResult<()> {
    for (column, _) in fields {
        table.check_column(column)?;
    }
    Ok(())
}

// =============================================================================
// Row Reading
// =============================================================================

fn query_records(
    conn: &Connection,
    table: Table,
    sql: &str,
    params: &[SqlValue],
) -> StorageResult<Vec<Record>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let id_column = table.id_column();

    let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
        let mut id = 0;
        let mut fields = Map::new();
        for (index, name) in names.iter().enumerate() {
            let value: SqlValue = row.get(index)?;
            if name == id_column {
                if let SqlValue::Integer(i) = value {
                    id = i;
                }
            } else {
                fields.insert(name.clone(), from_sql(value));
            }
        }
        Ok(Record::new(id, fields))
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

fn select_by_id(conn: &Connection, table: Table, id: i64) -> StorageResult<Option<Record>> {
    let sql = format!(
        "SELECT * FROM {} WHERE {} = ?1",
        table.name(),
        table.id_column()
    );
    let mut records = query_records(conn, table, &sql, &[SqlValue::Integer(id)])?;
    Ok(records.pop())
}

impl Storage for SqliteStorage {
    fn exists_where(
        &self,
        table: Table,
        criteria: &[(&'static str, Value)],
    ) -> StorageResult<bool> {
        let mut clauses = Vec::with_capacity(criteria.len());
        for (index, (column, _)) in criteria.iter().enumerate() {
            table.check_column(column)?;
            clauses.push(format!("{column} = ?{}", index + 1));
        }
        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!("SELECT 1 FROM {}{filter} LIMIT 1", table.name());
        let params: Vec<SqlValue> = criteria.iter().map(|(_, v)| to_sql(v)).collect();

        let conn = self.lock()?;
        let found = conn
            .query_row(&sql, params_from_iter(params.iter()), |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn fetch_by_id(&self, table: Table, id: i64) -> StorageResult<Option<Record>> {
        let conn = self.lock()?;
        select_by_id(&conn, table, id)
    }

    fn find_one(
        &self,
        table: Table,
        column: &'static str,
        value: &Value,
    ) -> StorageResult<Option<Record>> {
        table.check_column(column)?;
        let sql = format!(
            "SELECT * FROM {} WHERE {column} = ?1 ORDER BY {} LIMIT 1",
            table.name(),
            table.id_column()
        );
        let conn = self.lock()?;
        let mut records = query_records(&conn, table, &sql, &[to_sql(value)])?;
        Ok(records.pop())
    }

    fn fetch_all(&self, table: Table) -> StorageResult<Vec<Record>> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {}",
            table.name(),
            table.id_column()
        );
        let conn = self.lock()?;
        query_records(&conn, table, &sql, &[])
    }

    fn insert(&self, table: Table, fields: Fields) -> StorageResult<Record> {
        check_fields(table, &fields)?;
        let columns: Vec<&str> = fields.iter().map(|(c, _)| *c).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders.join(", ")
        );
        let params: Vec<SqlValue> = fields.iter().map(|(_, v)| to_sql(v)).collect();

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(&sql, params_from_iter(params.iter()))
            .map_err(|e| map_write_error(table, e))?;
        let id = tx.last_insert_rowid();
        let record = select_by_id(&tx, table, id)?.ok_or(StorageError::NotFound { table, id })?;
        tx.commit()?;
        Ok(record)
    }

    fn update(&self, table: Table, id: i64, fields: Fields) -> StorageResult<Record> {
        check_fields(table, &fields)?;
        let assignments: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(index, (column, _))| format!("{column} = ?{}", index + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            table.name(),
            assignments.join(", "),
            table.id_column(),
            fields.len() + 1
        );
        let mut params: Vec<SqlValue> = fields.iter().map(|(_, v)| to_sql(v)).collect();
        params.push(SqlValue::Integer(id));

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = tx
            .execute(&sql, params_from_iter(params.iter()))
            .map_err(|e| map_write_error(table, e))?;
        if changed == 0 {
            return Err(StorageError::NotFound { table, id });
        }
        let record = select_by_id(&tx, table, id)?.ok_or(StorageError::NotFound { table, id })?;
        tx.commit()?;
        Ok(record)
    }

    fn delete(&self, table: Table, id: i64) -> StorageResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            table.name(),
            table.id_column()
        );
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = match tx.execute(&sql, [id]) {
            Ok(changed) => changed,
            Err(err) => {
                return Err(match map_write_error(table, err) {
                    StorageError::ReferenceViolation { .. } => StorageError::ReferenceViolation {
                        table: blocking_dependent(&tx, table, id)?.unwrap_or(table),
                    },
                    other => other,
                })
            }
        };
        if changed == 0 {
            return Err(StorageError::NotFound { table, id });
        }
        tx.commit()?;
        Ok(())
    }

    fn ping(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn admin_fields(email: &str) -> Fields {
        vec![
            ("first_name", json!("Shirleen")),
            ("last_name", json!("Njoki")),
            ("other_name", json!("Koki")),
            ("email", json!(email)),
            ("telephone", json!(format!("07{}", email.len()))),
            ("passport_url", json!(format!("images/{email}.png"))),
            ("password_hash", json!("hash")),
            ("is_admin", json!(true)),
            ("registration_timestamp", json!("2026-01-01T00:00:00Z")),
            ("last_login_timestamp", Value::Null),
        ]
    }

    fn party_fields(name: &str, created_by: i64) -> Fields {
        vec![
            ("name", json!(name)),
            ("hq_address", json!(format!("{name} House"))),
            ("logo_url", json!(format!("{name}.png"))),
            ("created_by", json!(created_by)),
            ("registration_timestamp", json!("2026-01-01T00:00:00Z")),
        ]
    }

    #[test]
    fn insert_and_fetch_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let storage = SqliteStorage::open(&dir.path().join("nested/politico.db")).unwrap();

        let admin = storage.insert(Table::Users, admin_fields("admin@x.io")).unwrap();
        assert_eq!(admin.id, 1);
        assert!(admin.flag("is_admin"));

        let party = storage.insert(Table::Parties, party_fields("Jubilee", admin.id)).unwrap();
        let fetched = storage.fetch_by_id(Table::Parties, party.id).unwrap().unwrap();
        assert_eq!(fetched.text("name"), Some("Jubilee"));
        assert_eq!(fetched.integer("created_by"), Some(admin.id));

        assert!(storage.exists(Table::Parties, "name", &json!("Jubilee")).unwrap());
        assert!(!storage.exists(Table::Parties, "name", &json!("ODM")).unwrap());
        storage.ping().unwrap();
    }

    #[test]
    fn quotes_in_values_are_bound_not_spliced() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let admin = storage.insert(Table::Users, admin_fields("admin@x.io")).unwrap();
        let hostile = "x'; DROP TABLE parties; --";
        storage.insert(Table::Parties, party_fields(hostile, admin.id)).unwrap();

        let found = storage
            .find_one(Table::Parties, "name", &json!(hostile))
            .unwrap()
            .unwrap();
        assert_eq!(found.text("name"), Some(hostile));
        assert_eq!(storage.fetch_all(Table::Parties).unwrap().len(), 1);
    }

    #[test]
    fn unique_violation_names_the_column() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let admin = storage.insert(Table::Users, admin_fields("admin@x.io")).unwrap();
        storage.insert(Table::Parties, party_fields("Jubilee", admin.id)).unwrap();

        let mut duplicate = party_fields("Jubilee", admin.id);
        duplicate[1] = ("hq_address", json!("Elsewhere"));
        duplicate[2] = ("logo_url", json!("other.png"));

        match storage.insert(Table::Parties, duplicate).unwrap_err() {
            StorageError::UniqueViolation { table, columns } => {
                assert_eq!(table, Table::Parties);
                assert_eq!(columns, vec!["name".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Failed insert was rolled back.
        assert_eq!(storage.fetch_all(Table::Parties).unwrap().len(), 1);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let err = storage
            .insert(Table::Parties, party_fields("Orphan", 99))
            .unwrap_err();
        assert!(matches!(err, StorageError::ReferenceViolation { .. }));
    }

    #[test]
    fn blocked_delete_names_the_dependent_table() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let admin = storage.insert(Table::Users, admin_fields("admin@example.com")).unwrap();
        let party = storage
            .insert(Table::Parties, party_fields("Jubilee", admin.id))
            .unwrap();

        let err = storage.delete(Table::Users, admin.id).unwrap_err();
        assert!(matches!(
            err,
            StorageError::ReferenceViolation {
                table: Table::Parties
            }
        ));
        assert!(storage.fetch_by_id(Table::Parties, party.id).unwrap().is_some());
    }

    #[test]
    fn update_and_delete_report_missing_rows() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let err = storage
            .update(Table::Parties, 5, vec![("name", json!("New"))])
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 5, .. }));

        let err = storage.delete(Table::Parties, 5).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 5, .. }));
    }

    #[test]
    fn update_rewrites_columns() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let admin = storage.insert(Table::Users, admin_fields("admin@x.io")).unwrap();
        let party = storage.insert(Table::Parties, party_fields("Jubilee", admin.id)).unwrap();

        let updated = storage
            .update(Table::Parties, party.id, vec![("name", json!("Jubilee Alliance"))])
            .unwrap();
        assert_eq!(updated.text("name"), Some("Jubilee Alliance"));
        assert_eq!(updated.text("hq_address"), Some("Jubilee House"));
    }
}
