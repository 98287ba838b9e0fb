use std::sync::Arc;

use campus_gate::config::ServerConfig;
use campus_gate::identity::EmailVerifier;
use campus_gate::identity::firebase::FirebaseBackend;
use campus_gate::routes;
use campus_gate::state::{AppState, IdentityStatus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("invalid configuration");
    let port = config.port;

    if config.admin_emails.is_empty() {
        tracing::warn!("no admin addresses configured; the admin area is unreachable");
    }

    // Sign-in state lives in each visitor's client store; the edge only
    // reports configuration and confirms verification codes.
    let status = IdentityStatus::from_config(&config.identity);
    let verifier: Option<Arc<dyn EmailVerifier>> = match config.identity {
        Ok(cfg) => {
            tracing::info!(project = %cfg.project_id, ready = status.ready, "identity backend configured");
            Some(Arc::new(FirebaseBackend::new(cfg)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "identity backend not configured; verification disabled");
            None
        }
    };
    let state = AppState::new(status, verifier);

    let app = routes::app(state, &config.website_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(
        %port,
        website = %config.website_dir.display(),
        admins = config.admin_emails.len(),
        cookie_secure = config.cookie_secure,
        "campus-gate listening"
    );
    axum::serve(listener, app).await.expect("server failed");
}
