// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tracing_subscriber::EnvFilter;

use politico_server::{
    api::router,
    auth::{hash_password, TokenService},
    config::{LogFormat, ServerConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::UserRepository,
};

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing(LogFormat::from_env());

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(2);
        }
    };

    let storage = config
        .storage
        .open()
        .expect("Failed to open storage backend");
    tracing::info!(backend = ?config.storage, "storage ready");

    let tokens = match &config.jwt_secret {
        Some(secret) => TokenService::new(secret.as_bytes()),
        None => TokenService::random().expect("Failed to generate token secret"),
    };

    if let Some(admin) = &config.admin {
        let hash = hash_password(&admin.password).expect("Failed to hash admin password");
        let user = UserRepository::new(storage.as_ref())
            .ensure_admin(&admin.email, &hash)
            .expect("Failed to bootstrap admin account");
        tracing::info!(user_id = user.id, "admin account ready");
    }

    let state = AppState::new(storage, Arc::new(tokens));
    let app = router(state);
    let addr = config.addr;

    match &config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            rustls::crypto::ring::default_provider()
                .install_default()
                .expect("Failed to install rustls crypto provider");

            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key)
                .await
                .expect("Failed to load TLS certificate and key");

            tracing::info!(%addr, "Politico listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .expect("Failed to bind listener");

            tracing::info!(%addr, "Politico listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .expect("HTTP server failed");
        }
    }
}
