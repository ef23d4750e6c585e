//! Test server harness for integration tests.
//!
//! Spins up the real application router on a random port so tests go
//! through the same layers (body limit, request id, CORS) as production.

use std::net::SocketAddr;

use carousel_renderer::{ExportConfig, FontConfig, SlideExporter};
use carousel_server::{build_router, AppState, OpenAiClient};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Body limit used by test servers.
pub const TEST_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server without an OpenAI key.
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    /// Start a server whose completions go to `openai_base`.
    pub async fn with_openai(openai_base: &str) -> Self {
        let client = OpenAiClient::new(openai_base, "sk-test", "gpt-4o").expect("client");
        Self::start_with(Some(client)).await
    }

    /// Start a new test server on a random available port.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or server fails to bind.
    async fn start_with(openai: Option<OpenAiClient>) -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let exporter = SlideExporter::new(ExportConfig {
            fonts: FontConfig {
                system_fonts: false,
                font_dirs: Vec::new(),
            },
            ..ExportConfig::default()
        });
        let app = build_router(AppState::new(exporter, openai), TEST_BODY_LIMIT, None);

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), self.handle).await;
    }
}
