// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Backend-neutral row representation.

use serde_json::{Map, Value};

/// Column/value pairs written by an insert or update.
pub type Fields = Vec<(&'static str, Value)>;

/// A single row: primary key plus the remaining columns by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: i64, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    /// Raw column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Text column, `None` when absent, NULL or not a string.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Text column, empty string when missing.
    pub fn text_or_default(&self, column: &str) -> String {
        self.text(column).unwrap_or_default().to_string()
    }

    /// Integer column.
    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    /// Boolean column. SQLite hands booleans back as 0/1 integers.
    pub fn flag(&self, column: &str) -> bool {
        match self.get(column) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
            _ => false,
        }
    }

    /// Whether every `(column, value)` pair matches this row.
    ///
    /// Booleans and 0/1 integers compare equal so that both backends agree.
    pub fn matches(&self, criteria: &[(&'static str, Value)]) -> bool {
        criteria.iter().all(|(column, expected)| {
            let actual = self.get(column).unwrap_or(&Value::Null);
            normalize(actual) == normalize(expected)
        })
    }
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::from(i64::from(*b)),
        other => other.clone(),
    }
}
