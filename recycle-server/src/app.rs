// Copyright 2026 Recycle Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application initialization and runtime.
//!
//! This module handles:
//! - Backend selection (upstream proxy or in-memory store)
//! - HTTP server setup and routing
//! - TLS/HTTPS configuration
//! - Graceful shutdown

use crate::config::Config;
use crate::expirer::ExpirerWorker;
use crate::upstream::{create_upstream_backend, HttpMetadataLookup, Upstream};
use anyhow::{Context, Result};
use axum::{Router, ServiceExt};
use recycle_api::{create_memory_backend, create_router, AppState};
use recycle_core::{Clock, MemoryStore, MetadataLookup, SystemClock};
use recycle_policy::RecyclePolicy;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::normalize_path::NormalizePath;
use tracing::info;

/// Where requests end up after the recycle middleware.
enum Backend {
    /// Relay to a storage proxy.
    Upstream(Arc<Upstream>),
    /// Serve from the process-local store.
    Memory(Arc<MemoryStore>),
}

/// Main application.
pub struct App {
    config: Config,
    clock: Arc<dyn Clock>,
    backend: Backend,
}

impl App {
    /// Creates a new application instance.
    ///
    /// Validates the policy configuration and prepares the backend.
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing recycle application...");

        config.recycle.validate().context("Invalid grace period")?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let backend = match &config.backend.upstream {
            Some(url) => {
                info!("Forwarding to upstream {}", url);
                let upstream = Upstream::new(
                    url.clone(),
                    Duration::from_secs(config.backend.upstream_timeout_secs),
                    config.server.max_body_size,
                )?;
                Backend::Upstream(Arc::new(upstream))
            }
            None => {
                info!("No upstream configured, using in-memory store");
                Backend::Memory(Arc::new(MemoryStore::new(clock.clone())))
            }
        };

        Ok(Self {
            config,
            clock,
            backend,
        })
    }

    /// Runs the application (HTTP/HTTPS server).
    ///
    /// If TLS is configured via `RECYCLE_TLS_CERT` and `RECYCLE_TLS_KEY`
    /// environment variables, the server will use HTTPS. Otherwise, it runs
    /// as HTTP.
    pub async fn run(self) -> Result<()> {
        // Validate TLS configuration early
        self.config
            .server
            .tls
            .validate()
            .map_err(|e| anyhow::anyhow!("TLS configuration error: {}", e))?;

        info!("Recycle server starting...");
        info!(
            "Grace periods: account {} s, object {} s",
            self.config.recycle.account_recycled_seconds,
            self.config.recycle.object_recycled_seconds
        );
        info!(
            "Max body size: {} bytes ({:.2} GB)",
            self.config.server.max_body_size,
            self.config.server.max_body_size as f64 / (1024.0 * 1024.0 * 1024.0)
        );

        // Parse bind address
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address {}", self.config.server.bind))?;

        // Check if TLS is enabled and load configuration
        let tls_config = if self.config.server.tls.enabled {
            Some(self.load_tls_config().await?)
        } else {
            None
        };

        // Initialize Prometheus metrics recorder if enabled
        let prometheus_handle = if self.config.metrics.prometheus_enabled {
            use metrics_exporter_prometheus::PrometheusBuilder;
            match PrometheusBuilder::new().install_recorder() {
                Ok(handle) => {
                    info!("Prometheus metrics enabled (available at /metrics)");
                    Some(handle)
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to install Prometheus recorder: {}. Metrics disabled.",
                        e
                    );
                    None
                }
            }
        } else {
            info!("Prometheus metrics disabled");
            None
        };

        let policy = RecyclePolicy::new(self.config.recycle);
        let (lookup, backend_router, expirer_handle): (
            Arc<dyn MetadataLookup>,
            Router,
            Option<JoinHandle<()>>,
        ) = match &self.backend {
            Backend::Upstream(upstream) => {
                let lookup: Arc<dyn MetadataLookup> =
                    Arc::new(HttpMetadataLookup::new(upstream.clone()));
                (lookup, create_upstream_backend(upstream.clone()), None)
            }
            Backend::Memory(store) => {
                // Spawn expirer if enabled
                let handle = if self.config.expirer.enabled {
                    let worker = ExpirerWorker::new(store.clone(), self.config.expirer.clone());
                    Some(worker.spawn())
                } else {
                    info!("Expirer disabled");
                    None
                };
                let lookup: Arc<dyn MetadataLookup> = store.clone();
                (lookup, create_memory_backend(store.clone()), handle)
            }
        };

        let mut state = AppState::new(policy, lookup, self.clock.clone())
            .with_max_body_size(self.config.server.max_body_size);
        if let Some(handle) = prometheus_handle {
            state = state.with_prometheus_handle(handle);
        }

        let router = create_router(state, backend_router);

        // Run server with or without TLS
        let result = if let Some(rustls_config) = tls_config {
            info!("Listening on https://{}", addr);
            run_https_server(addr, router, rustls_config).await
        } else {
            info!("Listening on http://{}", addr);
            run_http_server(addr, router).await
        };

        // Abort expirer on shutdown
        if let Some(handle) = expirer_handle {
            handle.abort();
            info!("Expirer stopped");
        }

        result
    }

    /// Loads TLS configuration from certificate and key files.
    async fn load_tls_config(&self) -> Result<axum_server::tls_rustls::RustlsConfig> {
        use axum_server::tls_rustls::RustlsConfig;

        let tls_config = &self.config.server.tls;

        let cert_path =
            tls_config.cert_path.as_ref().context("TLS certificate path not configured")?;
        let key_path =
            tls_config.key_path.as_ref().context("TLS private key path not configured")?;

        info!("Loading TLS certificate from {:?}", cert_path);
        info!("Loading TLS private key from {:?}", key_path);

        let rustls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .context("Failed to load TLS certificate and key")?;

        info!("TLS configured successfully");
        Ok(rustls_config)
    }
}

/// Runs the HTTP server (without TLS).
async fn run_http_server(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Trailing slashes would otherwise read as an empty container or object name
    let app = NormalizePath::trim_trailing_slash(router);

    axum::serve(
        listener,
        ServiceExt::<axum::http::Request<axum::body::Body>>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Runs the HTTPS server (with TLS).
async fn run_https_server(
    addr: SocketAddr,
    router: Router,
    rustls_config: axum_server::tls_rustls::RustlsConfig,
) -> Result<()> {
    // Create handle for graceful shutdown
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(30)));
    });

    let app = NormalizePath::trim_trailing_slash(router);

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(ServiceExt::<axum::http::Request<axum::body::Body>>::into_make_service(app))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handles graceful shutdown signals.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_defaults_to_memory_backend() {
        let app = App::new(Config::default()).await.unwrap();
        assert!(matches!(app.backend, Backend::Memory(_)));
    }

    #[tokio::test]
    async fn test_new_with_upstream() {
        let mut config = Config::default();
        config.backend.upstream = Some("http://127.0.0.1:9".to_string());
        let app = App::new(config).await.unwrap();
        match app.backend {
            Backend::Upstream(upstream) => assert_eq!(upstream.base_url(), "http://127.0.0.1:9"),
            Backend::Memory(_) => panic!("expected upstream backend"),
        }
    }

    #[tokio::test]
    async fn test_new_rejects_zero_grace_period() {
        let mut config = Config::default();
        config.recycle.account_recycled_seconds = 0;
        assert!(App::new(config).await.is_err());
    }
}
