// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication and the authorization gate.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/v2/auth/signup` or `/auth/login` returns a signed token
//! 2. Client sends `Authorization: Bearer <token>`
//! 3. Server:
//!    - Verifies the HS256 signature and expiry
//!    - Extracts `sub` → numeric `user_id`
//!    - For admin-only and owner-or-admin endpoints, looks up the caller's
//!      admin flag (and the resource creator) in storage
//!
//! ## Security
//!
//! - Tokens expire 24 hours after issue; clock skew tolerance is 60 seconds
//! - There is no revocation list: logout is client-side only
//! - Passwords are stored as salted PBKDF2 hashes

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod password;
pub mod roles;
pub mod tokens;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use gate::{Gate, Principal, Privileged};
pub use password::{hash_password, verify_password, PasswordError};
pub use roles::Role;
pub use tokens::{TokenService, TOKEN_TTL_SECS};
