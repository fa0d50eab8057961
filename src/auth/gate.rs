// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate.
//!
//! ```text
//! no header            -> Anonymous        -> "No token provided"
//! header, verify fails -> Unauthenticated  -> expired / invalid message
//! header, verify ok    -> Authenticated(id)
//!                           -> Privileged { is_admin, is_owner }  (on demand)
//! ```
//!
//! The privileged refinement costs one storage lookup and is only computed
//! for admin-only and owner-or-admin endpoints. Handlers run the gate before
//! any payload validation.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::{AuthError, AuthenticatedUser, Role, TokenService};
use crate::error::ApiError;
use crate::storage::{OwnedResource, Storage, UserRepository};

/// Caller identity before any privilege lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Unauthenticated(AuthError),
    Authenticated(AuthenticatedUser),
}

impl Principal {
    /// Resolve the principal from request headers.
    pub fn resolve(headers: &HeaderMap, tokens: &TokenService) -> Self {
        let Some(header) = headers.get(AUTHORIZATION) else {
            return Principal::Anonymous;
        };
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);
        match token {
            None => Principal::Unauthenticated(AuthError::InvalidAuthHeader),
            Some(token) => match tokens.verify(token) {
                Ok(user) => Principal::Authenticated(user),
                Err(err) => Principal::Unauthenticated(err),
            },
        }
    }

    /// Reject anything short of a verified token.
    pub fn require_authenticated(self) -> Result<AuthenticatedUser, AuthError> {
        match self {
            Principal::Anonymous => Err(AuthError::MissingToken),
            Principal::Unauthenticated(err) => Err(err),
            Principal::Authenticated(user) => Ok(user),
        }
    }
}

/// Authenticated caller with privileges looked up in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privileged {
    pub user_id: i64,
    pub is_admin: bool,
    pub is_owner: bool,
}

impl Privileged {
    pub fn role(&self) -> Role {
        Role::from_admin_flag(self.is_admin)
    }
}

/// Privilege checks for an authenticated caller.
pub struct Gate<'a> {
    storage: &'a dyn Storage,
}

impl<'a> Gate<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Look up the caller's admin flag. A token for a user that no longer
    /// exists is treated as invalid.
    pub fn privileges(&self, user: &AuthenticatedUser) -> Result<Privileged, ApiError> {
        let is_admin = UserRepository::new(self.storage)
            .is_admin(user.user_id)?
            .ok_or_else(|| deny(user.user_id, AuthError::InvalidToken))?;
        Ok(Privileged {
            user_id: user.user_id,
            is_admin,
            is_owner: false,
        })
    }

    /// Admin-only endpoints.
    pub fn require_admin(&self, user: &AuthenticatedUser) -> Result<Privileged, ApiError> {
        let privileged = self.privileges(user)?;
        if !privileged.role().has_privilege(Role::Admin) {
            return Err(deny(user.user_id, AuthError::AdminOnly).into());
        }
        Ok(privileged)
    }

    /// Mutations allowed to the resource's creator and to admins.
    pub fn require_owner_or_admin(
        &self,
        user: &AuthenticatedUser,
        resource: &impl OwnedResource,
    ) -> Result<Privileged, ApiError> {
        let mut privileged = self.privileges(user)?;
        privileged.is_owner = resource.is_created_by(user.user_id);
        if !(privileged.is_owner || privileged.is_admin) {
            return Err(deny(user.user_id, AuthError::NotOwner).into());
        }
        Ok(privileged)
    }
}

fn deny(user_id: i64, err: AuthError) -> AuthError {
    tracing::warn!(user_id, reason = err.error_code(), "authorization denied");
    err
}
