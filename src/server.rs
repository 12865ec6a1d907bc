//! Server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, catalog
//! source, editor registry and its sweeper, the REST API, and graceful
//! shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{error, info, warn};

use crate::application::{start_session_sweeper, EditorRegistry, SharedEditorRegistry};
use crate::config::{AppConfig, LogFormat};
use crate::domain::ports::MetricSource;
use crate::infrastructure::{InMemoryMetricSource, JsonFileMetricSource};
use crate::interfaces::http::{create_api_router, ApiState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Handle to a running pricing console server.
///
/// ```rust,no_run
/// use pricing_console::config::AppConfig;
/// use pricing_console::server::ServerHandle;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let handle = ServerHandle::start(AppConfig::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub registry: SharedEditorRegistry,
    pub config: AppConfig,
    /// Address the API is bound to; differs from config when port 0 was requested
    pub local_addr: SocketAddr,

    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
    sweeper_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(config: AppConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Starting pricing console...");

        let prometheus = prometheus_handle();

        let source = metric_source(&config);
        let validator = config.validator();
        info!(range_convention = %validator.convention(), "Tier validator configured");

        let registry = EditorRegistry::shared(validator);

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();

        let sweeper_task = start_session_sweeper(
            registry.clone(),
            signal.clone(),
            config.editor.session_ttl_secs,
            config.editor.sweep_interval_secs,
        );

        let router = create_api_router(ApiState::new(registry.clone(), source), prometheus);

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = signal.clone();
        let api_task = tokio::spawn(async move {
            let served = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.wait().await;
                    info!("REST API received shutdown signal");
                })
                .await;
            if let Err(e) = served {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            registry,
            config,
            local_addr,
            shutdown,
            api_task,
            sweeper_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the API and the sweeper to stop, bounded by the configured timeout
    pub async fn wait(self) {
        let Self {
            shutdown,
            api_task,
            sweeper_task,
            registry,
            ..
        } = self;

        let graceful = shutdown
            .shutdown_with_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!(error = %e, "REST API task panicked");
                }
                if let Err(e) = sweeper_task.await {
                    error!(error = %e, "Session sweeper task panicked");
                }
            })
            .await;

        if !graceful {
            warn!("Server tasks did not stop in time");
        }
        info!(
            discarded_sessions = registry.count(),
            "Pricing console shutdown complete"
        );
    }

    pub async fn shutdown(self) {
        info!("Shutting down pricing console...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// The global recorder can be installed only once per process; restarts
/// within one process reuse the first handle.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder not installed, /metrics will be empty");
                PrometheusBuilder::new().build_recorder().handle()
            }
        })
        .clone()
}

fn metric_source(config: &AppConfig) -> Arc<dyn MetricSource> {
    match &config.catalog.metrics_file {
        Some(path) => {
            info!(path = %path.display(), "Metric catalog: JSON file");
            Arc::new(JsonFileMetricSource::new(path))
        }
        None => {
            warn!("No metric catalog file configured, catalog starts empty");
            Arc::new(InMemoryMetricSource::new())
        }
    }
}

/// Install the global tracing subscriber. Call once, before [`ServerHandle::start`].
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const STARTUP_GRACE: Duration = Duration::from_secs(5);

    async fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_health_and_shuts_down() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;

        let handle = ServerHandle::start(config).await.unwrap();
        assert!(handle.is_running());

        let response = tokio::time::timeout(STARTUP_GRACE, get(handle.local_addr, "/health"))
            .await
            .unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("\"open_sessions\":0"));

        tokio::time::timeout(Duration::from_secs(10), handle.shutdown())
            .await
            .unwrap();
    }
}
