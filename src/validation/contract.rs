// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative field contracts and the ordered checks run against them.

use serde_json::{Map, Value};

use super::ValidationError;

/// Primitive type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string; non-blank unless the field allows it.
    Text,
    /// JSON integer, 1 or greater.
    PositiveInteger,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::PositiveInteger => "an integer",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::PositiveInteger => value.is_i64() || value.is_u64(),
        }
    }
}

/// One expected field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Allowed values (compared case-insensitively); empty means any.
    pub allowed: &'static [&'static str],
    pub blank_allowed: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            allowed: &[],
            blank_allowed: false,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::PositiveInteger,
            allowed: &[],
            blank_allowed: false,
        }
    }

    /// Restrict a text field to a fixed set of values.
    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    /// Accept empty and whitespace-only strings.
    pub const fn blank_allowed(mut self) -> Self {
        self.blank_allowed = true;
        self
    }
}

/// Expected shape of one resource's request body.
#[derive(Debug)]
pub struct FieldContract {
    /// Resource name used in error messages.
    pub resource: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FieldContract {
    /// Comma-separated expected field names, in declaration order.
    pub fn expected(&self) -> String {
        self.fields
            .iter()
            .map(|f| f.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Run every structural check against `payload`; the first failure wins.
    ///
    /// Order: field count, field names, value types, blank text / integer
    /// positivity, enumerations. Within a stage fields are visited in
    /// declaration order, so the reported field is deterministic.
    pub fn check(&self, payload: &Map<String, Value>) -> Result<(), ValidationError> {
        if payload.len() != self.fields.len() {
            return Err(ValidationError::FieldCount {
                resource: self.resource,
                expected: self.expected(),
                count: self.fields.len(),
                found: payload.len(),
            });
        }

        let mut keys: Vec<&String> = payload.keys().collect();
        keys.sort();
        if let Some(unknown) = keys.into_iter().find(|key| self.field(key).is_none()) {
            return Err(ValidationError::UnknownField {
                field: unknown.clone(),
                expected: self.expected(),
            });
        }

        for spec in self.fields {
            let value = &payload[spec.name];
            if !spec.kind.accepts(value) {
                return Err(ValidationError::InvalidType {
                    field: spec.name,
                    expected: spec.kind.describe(),
                });
            }
        }

        for spec in self.fields {
            match (spec.kind, &payload[spec.name]) {
                (FieldKind::Text, Value::String(text))
                    if !spec.blank_allowed && text.trim().is_empty() =>
                {
                    return Err(ValidationError::EmptyField { field: spec.name });
                }
                (FieldKind::PositiveInteger, value) if value.as_i64().is_none_or(|n| n < 1) => {
                    return Err(ValidationError::NotPositive { field: spec.name });
                }
                _ => {}
            }
        }

        for spec in self.fields.iter().filter(|f| !f.allowed.is_empty()) {
            let text = payload[spec.name].as_str().unwrap_or_default().trim();
            if !spec.allowed.iter().any(|a| a.eq_ignore_ascii_case(text)) {
                return Err(ValidationError::NotAllowed {
                    field: spec.name,
                    allowed: spec.allowed.join(", "),
                });
            }
        }

        Ok(())
    }
}
