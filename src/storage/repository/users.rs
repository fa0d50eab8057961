// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User account repository.
//!
//! The password hash is stored alongside the profile but never serialized.

use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::super::{Fields, Record, Storage, StorageResult, Table};
use super::timestamp;

/// User row.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct StoredUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub other_name: String,
    pub email: String,
    pub telephone: String,
    pub passport_url: String,
    #[serde(skip)]
    pub password_hash: String,
    pub is_admin: bool,
    pub registration_timestamp: String,
    pub last_login_timestamp: Option<String>,
}

impl From<Record> for StoredUser {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            first_name: record.text_or_default("first_name"),
            last_name: record.text_or_default("last_name"),
            other_name: record.text_or_default("other_name"),
            email: record.text_or_default("email"),
            telephone: record.text_or_default("telephone"),
            passport_url: record.text_or_default("passport_url"),
            password_hash: record.text_or_default("password_hash"),
            is_admin: record.flag("is_admin"),
            registration_timestamp: record.text_or_default("registration_timestamp"),
            last_login_timestamp: record.text("last_login_timestamp").map(str::to_string),
        }
    }
}

/// Profile fields for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub other_name: String,
    pub email: String,
    pub telephone: String,
    pub passport_url: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewUser {
    fn into_fields(self) -> Fields {
        vec![
            ("first_name", json!(self.first_name)),
            ("last_name", json!(self.last_name)),
            ("other_name", json!(self.other_name)),
            ("email", json!(self.email)),
            ("telephone", json!(self.telephone)),
            ("passport_url", json!(self.passport_url)),
            ("password_hash", json!(self.password_hash)),
            ("is_admin", json!(self.is_admin)),
            ("registration_timestamp", json!(timestamp())),
            ("last_login_timestamp", Value::Null),
        ]
    }

    #[cfg(test)]
    pub(crate) fn fixture(email: &str) -> Self {
        Self {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            other_name: "W".into(),
            email: email.into(),
            telephone: format!("tel:{email}"),
            passport_url: format!("passports/{email}.png"),
            password_hash: "unused".into(),
            is_admin: false,
        }
    }
}

/// Repository for user rows.
pub struct UserRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> UserRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn get(&self, user_id: i64) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .storage
            .fetch_by_id(Table::Users, user_id)?
            .map(StoredUser::from))
    }

    /// Look up an account by email address (exact match).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .storage
            .find_one(Table::Users, "email", &json!(email))?
            .map(StoredUser::from))
    }

    /// Whether the user exists and carries the admin flag.
    pub fn is_admin(&self, user_id: i64) -> StorageResult<Option<bool>> {
        Ok(self.get(user_id)?.map(|user| user.is_admin))
    }

    pub fn create(&self, user: &NewUser) -> StorageResult<StoredUser> {
        let record = self.storage.insert(Table::Users, user.clone().into_fields())?;
        Ok(record.into())
    }

    /// Stamp a successful login.
    pub fn touch_last_login(&self, user_id: i64) -> StorageResult<StoredUser> {
        let record = self.storage.update(
            Table::Users,
            user_id,
            vec![("last_login_timestamp", json!(timestamp()))],
        )?;
        Ok(record.into())
    }

    /// Make sure an admin account exists for `email`.
    ///
    /// An existing account is promoted and keeps its password; otherwise a
    /// new account is created with the given hash.
    pub fn ensure_admin(&self, email: &str, password_hash: &str) -> StorageResult<StoredUser> {
        if let Some(existing) = self.find_by_email(email)? {
            if existing.is_admin {
                return Ok(existing);
            }
            let record =
                self.storage
                    .update(Table::Users, existing.id, vec![("is_admin", json!(true))])?;
            return Ok(record.into());
        }

        self.create(&NewUser {
            first_name: "Admin".into(),
            last_name: "Admin".into(),
            other_name: "Admin".into(),
            email: email.into(),
            telephone: format!("admin:{email}"),
            passport_url: format!("admin:{email}"),
            password_hash: password_hash.into(),
            is_admin: true,
        })
    }
}
