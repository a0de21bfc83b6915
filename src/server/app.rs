use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRef, http::StatusCode, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes::{auth_router, quiz_router};
use super::session::{spawn_sweeper, SessionStore};
use crate::auth::{FirebaseGateway, IdentityGateway};
use crate::quiz::{OpenTdb, QuizEngine, TriviaSource};
use crate::settings::Settings;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(FromRef, Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub gateway: Arc<dyn IdentityGateway>,
    pub trivia: Arc<dyn TriviaSource>,
    pub engine: QuizEngine,
    #[from_ref(skip)]
    pub signup_reset_ms: u64,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sessions: SessionStore::default(),
            gateway: Arc::new(FirebaseGateway::new(
                settings.identity.base_url.clone(),
                settings.identity.api_key.clone(),
            )),
            trivia: Arc::new(OpenTdb::new(settings.trivia.base_url.clone())),
            engine: QuizEngine::new(settings.quiz.question_seconds),
            signup_reset_ms: settings.quiz.signup_reset_ms,
        }
    }
}

pub fn app(state: AppState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .nest_service("/static", ServeDir::new(static_dir))
        .merge(auth_router(state.clone()))
        .merge(quiz_router(state))
        .fallback(|| async {
            tracing::info!("Fallback");
            StatusCode::NOT_FOUND
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.address();
    let state = AppState::from_settings(&settings);
    let max_idle = Duration::from_secs(settings.server.session_idle_secs);
    spawn_sweeper(
        state.sessions.clone(),
        state.engine,
        max_idle,
        SWEEP_INTERVAL.min(max_idle).max(Duration::from_secs(1)),
    );
    let app = app(state, settings.server.static_dir.clone());
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        "Serving on {addr}, {}s per question",
        settings.quiz.question_seconds
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metrics = prometheus::gather();
    let mut buf = vec![];
    if let Err(err) = encoder.encode(&metrics, &mut buf) {
        tracing::error!("Cannot encode metrics: {err}");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_owned())],
        buf,
    )
        .into_response()
}
