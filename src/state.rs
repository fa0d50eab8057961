// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::{InMemoryStorage, Storage};

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, tokens: Arc<TokenService>) -> Self {
        Self { storage, tokens }
    }

    /// In-memory storage with a fixed token secret.
    pub fn in_memory(secret: &[u8]) -> Self {
        Self::new(
            Arc::new(InMemoryStorage::new()),
            Arc::new(TokenService::new(secret)),
        )
    }
}
