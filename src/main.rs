//! Submission Drop server binary.
//!
//! Accepts one file plus a username per form submission, stores the file
//! under a timestamped name and appends an audit row to a CSV log. The main
//! entry point prepares storage, builds the Axum router and serves HTTP until
//! a shutdown signal arrives.

mod atomic;
mod audit;
mod config;
mod error;
mod frontend;
mod http;
mod logging;
mod naming;
mod render;
mod sanitize;
mod storage;
mod upload;
mod validate;

use axum::body::Body as AxumBody;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::{get, post};
use axum::{Router, middleware};
use axum_server::Handle;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::audit::AuditLog;
use crate::config::{Args, SHUTDOWN_GRACE_SECS, StorageConfig};
use crate::storage::Storage;
use crate::validate::UploadPolicy;

/// Starts the server and blocks until shutdown.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let args = Args::parse();
    logging::init_logging(args.log_format);

    let storage_config = StorageConfig::from(&args);
    let storage = Arc::new(Storage::new(&storage_config));
    storage.initialize().await?;
    let audit = Arc::new(AuditLog::new(&storage_config));
    let policy = Arc::new(UploadPolicy::with_max_size(args.max_file_size));

    let host = args
        .host
        .parse::<IpAddr>()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;
    let addr = SocketAddr::new(host, args.port);
    let handle = Handle::new();

    info!("🚀 Server listening on http://{}", addr);
    info!(
        "📁 Files will be stored in: {}",
        display_path(storage.upload_dir())
    );
    info!(
        "📊 Submissions logged to: {}",
        display_path(storage.log_file())
    );

    let app = build_app(storage, audit, policy);
    let server = axum_server::bind(addr)
        .handle(handle.clone())
        .serve(app.into_make_service_with_connect_info::<SocketAddr>());

    tokio::select! {
        result = server => result?,
        _ = shutdown_signal(handle) => {}
    }

    Ok(())
}

/// Assembles routes, middleware and shared state.
pub(crate) fn build_app(
    storage: Arc<Storage>,
    audit: Arc<AuditLog>,
    policy: Arc<UploadPolicy>,
) -> Router {
    let body_limit = policy.body_limit();
    Router::new()
        .route("/", get(frontend::serve_index))
        .route(
            "/upload",
            post(upload::upload_submission).layer(DefaultBodyLimit::max(body_limit)),
        )
        .fallback(frontend::serve_static)
        .layer(middleware::from_fn(http::add_security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(http::make_request_span::<AxumBody>)
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(Extension(storage))
        .layer(Extension(audit))
        .layer(Extension(policy))
}

fn display_path(path: &std::path::Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received termination signal shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(SHUTDOWN_GRACE_SECS)));
}
