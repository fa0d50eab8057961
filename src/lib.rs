// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Politico - Party, Office, Candidate and Vote Registration API
//!
//! REST service for registering political parties, offices, candidates and
//! votes. Every mutating request passes the same pipeline: authorization
//! gate, field-contract validation, uniqueness/existence checks, then the
//! write.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) and the OpenAPI document
//! - `auth` - Bearer tokens, password hashing and the authorization gate
//! - `validation` - Declarative per-resource field contracts
//! - `storage` - Storage trait, SQLite and in-memory backends, repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod validation;
