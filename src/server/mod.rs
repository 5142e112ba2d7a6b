//! HTTP frontend.
//!
//! JSON endpoints, all `POST`:
//!
//! | Route | Body | Reply |
//! |-------|------|-------|
//! | `/api/measure` | `{material, temp, voltage, zener?}` | `{voltage, current, power, status, saturation, breakdown}` |
//! | `/api/sweep` | `{material, start, end, temp, zener?}` | `{data: [{v, i, p}], saddle: {v, i}, saturation, breakdown}` |
//! | `/api/start_mystery` | none | `{status}` |
//! | `/api/submit_guess` | `{guess}` | `{result, actual}` |
//!
//! Mystery rounds are keyed by the optional `x-session-id` header; requests
//! without it share one game. Failures reply with
//! `{"error": <kind>, "message": <text>}`.

mod handlers;
pub mod payload;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::{LabError, Result};
use crate::lab::MysterySessions;

/// Header carrying the caller's mystery session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Longest accepted session id, in bytes.
pub const MAX_SESSION_ID_LEN: usize = 64;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    rng: Arc<Mutex<StdRng>>,
    mysteries: Arc<MysterySessions>,
}

impl AppState {
    /// Create state with a seeded RNG, or one seeded from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Arc::new(Mutex::new(rng)),
            mysteries: Arc::new(MysterySessions::new()),
        }
    }

    /// Lock the RNG. Must not be held across an await point.
    pub fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn mysteries(&self) -> &MysterySessions {
        &self.mysteries
    }
}

/// The API routes bound to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/measure", post(handlers::measure))
        .route("/api/sweep", post(handlers::sweep))
        .route("/api/start_mystery", post(handlers::start_mystery))
        .route("/api/submit_guess", post(handlers::submit_guess))
        .with_state(state)
}

/// Routes plus the middleware selected by `config`.
pub fn app(config: &ServerConfig, state: AppState) -> Router {
    let mut app = router(state);
    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }
    if config.trace_requests {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::new(config.seed);
    let app = app(&config, state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| LabError::io(format!("binding {}", config.bind), e))?;
    tracing::info!(
        addr = %config.bind,
        seeded = config.seed.is_some(),
        cors = config.cors,
        "diode lab listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LabError::io("serving HTTP", e))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl LabError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LabError::InvalidMaterial { .. } | LabError::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            LabError::NoActiveGame => StatusCode::CONFLICT,
            LabError::Io { .. } | LabError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for LabError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::warn!(kind = self.kind(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
