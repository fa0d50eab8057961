// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory storage double.
//!
//! Rows live in one ordered map per table; primary keys come from one atomic
//! counter per table. Unique keys and references declared in
//! [`Table`](super::Table) are enforced exactly as the SQLite schema does, so
//! handler tests see the same conflicts the production backend raises.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde_json::{Map, Value};

use super::{Fields, Record, Storage, StorageError, StorageResult, Table};

type Rows = BTreeMap<i64, Map<String, Value>>;

/// Map-backed [`Storage`] for tests and throwaway deployments.
pub struct InMemoryStorage {
    tables: Mutex<HashMap<Table, Rows>>,
    next_ids: HashMap<Table, AtomicI64>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        let tables = Table::ALL.iter().map(|t| (*t, Rows::new())).collect();
        let next_ids = Table::ALL.iter().map(|t| (*t, AtomicI64::new(1))).collect();
        Self {
            tables: Mutex::new(tables),
            next_ids,
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, HashMap<Table, Rows>>> {
        self.tables
            .lock()
            .map_err(|_| StorageError::Database("in-memory store lock poisoned".to_string()))
    }

    fn next_id(&self, table: Table) -> i64 {
        self.next_ids
            .get(&table)
            .map(|counter| counter.fetch_add(1, Ordering::SeqCst))
            .unwrap_or(1)
    }
}

fn rows(tables: &HashMap<Table, Rows>, table: Table) -> impl Iterator<Item = Record> + '_ {
    tables
        .get(&table)
        .into_iter()
        .flat_map(|rows| rows.iter())
        .map(|(id, fields)| Record::new(*id, fields.clone()))
}

fn check_fields(table: Table, fields: &Fields) -> StorageResult<()> {
    for (column, _) in fields {
        table.check_column(column)?;
    }
    Ok(())
}

/// Reject `candidate` if it collides with another row on any unique key.
fn check_unique(
    tables: &HashMap<Table, Rows>,
    table: Table,
    candidate: &Record,
) -> StorageResult<()> {
    for key in table.unique_keys() {
        let criteria: Vec<(&'static str, Value)> = key
            .iter()
            .map(|column| (*column, candidate.get(column).cloned().unwrap_or(Value::Null)))
            .collect();
        let collides = rows(tables, table)
            .filter(|row| row.id != candidate.id)
            .any(|row| row.matches(&criteria));
        if collides {
            return Err(StorageError::UniqueViolation {
                table,
                columns: key.iter().map(|c| c.to_string()).collect(),
            });
        }
    }
    Ok(())
}

/// Reject `candidate` if any foreign key points at a missing row.
fn check_references(
    tables: &HashMap<Table, Rows>,
    table: Table,
    candidate: &Record,
) -> StorageResult<()> {
    for (column, target) in table.references() {
        let Some(id) = candidate.integer(column) else {
            continue;
        };
        let present = tables.get(target).is_some_and(|rows| rows.contains_key(&id));
        if !present {
            return Err(StorageError::ReferenceViolation { table });
        }
    }
    Ok(())
}

impl Storage for InMemoryStorage {
    fn exists_where(
        &self,
        table: Table,
        criteria: &[(&'static str, Value)],
    ) -> StorageResult<bool> {
        for (column, _) in criteria {
            table.check_column(column)?;
        }
        let tables = self.lock()?;
        let found = rows(&tables, table).any(|row| row.matches(criteria));
        Ok(found)
    }

    fn fetch_by_id(&self, table: Table, id: i64) -> StorageResult<Option<Record>> {
        let tables = self.lock()?;
        Ok(tables
            .get(&table)
            .and_then(|rows| rows.get(&id))
            .map(|fields| Record::new(id, fields.clone())))
    }

    fn find_one(
        &self,
        table: Table,
        column: &'static str,
        value: &Value,
    ) -> StorageResult<Option<Record>> {
        table.check_column(column)?;
        let tables = self.lock()?;
        let criteria = [(column, value.clone())];
        let found = rows(&tables, table).find(|row| row.matches(&criteria));
        Ok(found)
    }

    fn fetch_all(&self, table: Table) -> StorageResult<Vec<Record>> {
        let tables = self.lock()?;
        Ok(rows(&tables, table).collect())
    }

    fn insert(&self, table: Table, fields: Fields) -> StorageResult<Record> {
        check_fields(table, &fields)?;
        let mut tables = self.lock()?;

        let mut candidate = Record::new(0, Map::new());
        for (column, value) in fields {
            candidate.fields.insert(column.to_string(), value);
        }

        check_references(&tables, table, &candidate)?;
        check_unique(&tables, table, &candidate)?;

        candidate.id = self.next_id(table);
        tables
            .entry(table)
            .or_default()
            .insert(candidate.id, candidate.fields.clone());
        Ok(candidate)
    }

    fn update(&self, table: Table, id: i64, fields: Fields) -> StorageResult<Record> {
        check_fields(table, &fields)?;
        let mut tables = self.lock()?;

        let existing = tables
            .get(&table)
            .and_then(|rows| rows.get(&id))
            .cloned()
            .ok_or(StorageError::NotFound { table, id })?;

        let mut candidate = Record::new(id, existing);
        for (column, value) in fields {
            candidate.fields.insert(column.to_string(), value);
        }

        check_references(&tables, table, &candidate)?;
        check_unique(&tables, table, &candidate)?;

        tables
            .entry(table)
            .or_default()
            .insert(id, candidate.fields.clone());
        Ok(candidate)
    }

    fn delete(&self, table: Table, id: i64) -> StorageResult<()> {
        let mut tables = self.lock()?;

        let present = tables.get(&table).is_some_and(|rows| rows.contains_key(&id));
        if !present {
            return Err(StorageError::NotFound { table, id });
        }

        for dependent in Table::ALL {
            for (column, target) in dependent.references() {
                if *target != table {
                    continue;
                }
                let criteria = [(*column, Value::from(id))];
                if rows(&tables, dependent).any(|row| row.matches(&criteria)) {
                    return Err(StorageError::ReferenceViolation { table: dependent });
                }
            }
        }

        if let Some(rows) = tables.get_mut(&table) {
            rows.remove(&id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_fields(email: &str, telephone: &str) -> Fields {
        vec![
            ("first_name", json!("Jane")),
            ("last_name", json!("Doe")),
            ("other_name", json!("Wanjiku")),
            ("email", json!(email)),
            ("telephone", json!(telephone)),
            ("passport_url", json!(format!("images/{email}.png"))),
            ("password_hash", json!("hash")),
            ("is_admin", json!(false)),
            ("registration_timestamp", json!("2026-01-01T00:00:00Z")),
            ("last_login_timestamp", Value::Null),
        ]
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let storage = InMemoryStorage::new();
        let a = storage.insert(Table::Users, user_fields("a@x.io", "1")).unwrap();
        let b = storage.insert(Table::Users, user_fields("b@x.io", "2")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(storage.fetch_all(Table::Users).unwrap().len(), 2);
    }

    #[test]
    fn unique_key_violation_is_reported() {
        let storage = InMemoryStorage::new();
        storage.insert(Table::Users, user_fields("a@x.io", "1")).unwrap();
        let err = storage
            .insert(Table::Users, user_fields("a@x.io", "2"))
            .unwrap_err();
        match err {
            StorageError::UniqueViolation { table, columns } => {
                assert_eq!(table, Table::Users);
                assert_eq!(columns, vec!["email".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_reference_is_rejected() {
        let storage = InMemoryStorage::new();
        let err = storage
            .insert(
                Table::Parties,
                vec![
                    ("name", json!("Jubilee")),
                    ("hq_address", json!("Nairobi")),
                    ("logo_url", json!("logo.png")),
                    ("created_by", json!(42)),
                    ("registration_timestamp", json!("now")),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, StorageError::ReferenceViolation { .. }));
    }

    #[test]
    fn delete_of_referenced_row_is_rejected() {
        let storage = InMemoryStorage::new();
        let user = storage.insert(Table::Users, user_fields("a@x.io", "1")).unwrap();
        storage
            .insert(
                Table::Parties,
                vec![
                    ("name", json!("Jubilee")),
                    ("hq_address", json!("Nairobi")),
                    ("logo_url", json!("logo.png")),
                    ("created_by", json!(user.id)),
                    ("registration_timestamp", json!("now")),
                ],
            )
            .unwrap();

        let err = storage.delete(Table::Users, user.id).unwrap_err();
        assert!(matches!(
            err,
            StorageError::ReferenceViolation {
                table: Table::Parties
            }
        ));
    }

    #[test]
    fn update_allows_keeping_own_unique_value() {
        let storage = InMemoryStorage::new();
        let user = storage.insert(Table::Users, user_fields("a@x.io", "1")).unwrap();
        let updated = storage
            .update(Table::Users, user.id, vec![("email", json!("a@x.io"))])
            .unwrap();
        assert_eq!(updated.text("email"), Some("a@x.io"));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let storage = InMemoryStorage::new();
        let err = storage
            .exists(Table::Users, "password", &json!("x"))
            .unwrap_err();
        assert!(matches!(err, StorageError::UnknownColumn { .. }));
    }

    #[test]
    fn delete_missing_row_is_not_found() {
        let storage = InMemoryStorage::new();
        let err = storage.delete(Table::Offices, 9).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { id: 9, .. }));
    }
}
