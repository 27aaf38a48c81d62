//! Raffle management web application.
//!
//! An administrator signs in, pastes a list of names and prize amounts,
//! and the server picks the winners and publishes a shareable result page
//! with a client-side reveal animation. The outcome is computed once at
//! creation and stored; the public page always re-renders the same stored
//! result.
//!
//! # Routes
//!
//! - `GET /` → redirect to the login page
//! - `GET /admin/login`, `POST /admin/login` → admin sign-in
//! - `GET /admin/logout` → drop the session
//! - `GET /admin` → dashboard: creation form plus recent draws (guarded)
//! - `POST /admin/create` → run and persist a draw (guarded)
//! - `GET /r/:id` → public result page
//!
//! # Configuration
//!
//! Environment variables, all with development fallbacks: `PORT`,
//! `ADMIN_USER`, `ADMIN_PASS_HASH` (bcrypt digest), `SESSION_SECRET`,
//! `DATABASE_PATH`.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod auth;
pub mod config;
pub mod database;
pub mod draw;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;
pub mod utils;

use routes::{
    create_handler, dashboard_handler, login_form_handler, login_handler, logout_handler,
    result_handler, root_handler,
};
use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/admin/login", get(login_form_handler).post(login_handler))
        .route("/admin/logout", get(logout_handler))
        .route("/admin", get(dashboard_handler))
        .route("/admin/create", post(create_handler))
        .route("/r/:id", get(result_handler))
        .nest_service("/public", ServeDir::new("public"))
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new();

    info!("Starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
