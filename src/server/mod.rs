//! Development server with CMS webhook regeneration

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::Blog;

/// Path the CMS publish webhook posts to
pub const WEBHOOK_PATH: &str = "/__webhook";

/// Server state
struct ServerState {
    blog: Blog,
    /// Held for the duration of a regeneration
    rebuild: Mutex<()>,
}

/// Body of a webhook call; only the shared secret is looked at
#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    secret: Option<String>,
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        blog: blog.clone(),
        rebuild: Mutex::new(()),
    });
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("CMS webhook: POST {}{}", url, WEBHOOK_PATH);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    let public_dir = &state.blog.public_dir;
    let static_files = ServeDir::new(public_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(public_dir.join("404.html")));

    Router::new()
        .route(WEBHOOK_PATH, post(webhook_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Regenerate the site from the CMS
///
/// Calls arriving during a rebuild wait for it and then rebuild again, so
/// the last publish is always reflected.
async fn webhook_handler(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let expected = state.blog.config.server.webhook_secret.as_deref();
    if !authorized(expected, &body) {
        tracing::warn!("Rejected webhook call with a wrong secret");
        return (StatusCode::UNAUTHORIZED, "Invalid webhook secret").into_response();
    }

    let _guard = state.rebuild.lock().await;
    tracing::info!("Webhook received, regenerating...");

    match state.blog.generate(None).await {
        Ok(()) => (StatusCode::OK, "Regenerated").into_response(),
        Err(e) => {
            tracing::error!("Generation failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Generation failed: {}", e),
            )
                .into_response()
        }
    }
}

/// Whether a webhook body carries the configured secret
///
/// Without a configured secret every call is accepted.
fn authorized(expected: Option<&str>, body: &[u8]) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    let payload: WebhookPayload = serde_json::from_slice(body).unwrap_or_default();
    payload.secret.as_deref() == Some(expected)
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
