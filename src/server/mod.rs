//! Upload web service.
//!
//! This module provides an HTTP server that:
//! - Accepts one EPUB per request as a multipart upload
//! - Validates the upload before touching the archive
//! - Returns the converted EPUB as a download
//!
//! The [`ConversionContext`] is built once when the server starts and shared
//! by all requests. Rewrites run on the blocking thread pool.

mod error;
mod handlers;
mod routes;

pub use error::UploadError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::convert::ConversionContext;
use crate::progress::BYTES_MIB;

/// Default upload ceiling (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * BYTES_MIB;

/// Allowance for multipart framing on top of the upload ceiling.
const MULTIPART_OVERHEAD: usize = BYTES_MIB as usize;

/// Upload validation settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes.
    pub max_upload_bytes: u64,
    /// Name of the multipart field carrying the file.
    pub field_name: String,
    /// Required suffix of the uploaded file name.
    pub expected_suffix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            field_name: "upload".to_string(),
            expected_suffix: ".epub".to_string(),
        }
    }
}

impl UploadConfig {
    /// Sets the upload ceiling.
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Request body limit: the ceiling plus multipart framing.
    pub(crate) fn body_limit(&self) -> usize {
        usize::try_from(self.max_upload_bytes)
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Upload validation settings
    pub upload: UploadConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            upload: UploadConfig::default(),
        }
    }
}

/// Shared, read-only state of the service.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Converter shared by every request.
    pub context: Arc<ConversionContext>,
    /// Upload validation settings.
    pub upload: UploadConfig,
}

impl AppState {
    /// Creates the state.
    pub fn new(context: ConversionContext, upload: UploadConfig) -> Self {
        Self {
            context: Arc::new(context),
            upload,
        }
    }
}

/// Start the upload server
pub async fn run_server(config: ServerConfig, context: ConversionContext) -> std::io::Result<()> {
    tracing::info!("Starting upload server on {}", config.bind_addr);
    tracing::info!(
        "Upload limit: {}",
        crate::progress::human_file_size(config.upload.max_upload_bytes)
    );

    let app = create_router(Arc::new(AppState::new(context, config.upload)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Ready to convert");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
