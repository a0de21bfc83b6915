use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::auth::{sign_in_message, sign_up_message, AuthMode, Notice, SIGN_UP_SUCCESS};
use crate::server::app::AppState;
use crate::server::htmx::HX_REDIRECT;
use crate::server::session::{expired_session_cookie, session_cookie, session_id, CurrentUser};
use crate::server::views::{AuthForm, IndexPage};
use crate::telemetry::AUTH_CNTR;

use super::ApiResponse;

#[derive(Deserialize)]
struct AuthFormQuery {
    #[serde(default)]
    mode: AuthMode,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
    #[serde(default)]
    mode: AuthMode,
}

async fn index() -> ApiResponse<IndexPage> {
    Ok(IndexPage {
        form: AuthForm::new(AuthMode::Login).render()?,
    })
}

async fn auth_form(Query(query): Query<AuthFormQuery>) -> AuthForm {
    AuthForm {
        email: query.email,
        ..AuthForm::new(query.mode)
    }
}

async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(credentials): Form<Credentials>,
) -> Response {
    match credentials.mode {
        AuthMode::Signup => sign_up(state, credentials).await.into_response(),
        AuthMode::Login => sign_in(state, headers, credentials).await,
    }
}

async fn sign_up(state: AppState, credentials: Credentials) -> AuthForm {
    let mut form = AuthForm {
        email: credentials.email,
        ..AuthForm::new(AuthMode::Signup)
    };
    match state
        .gateway
        .sign_up(&form.email, &credentials.password)
        .await
    {
        Ok(account) => {
            AUTH_CNTR.with_label_values(&["sign_up", "success"]).inc();
            tracing::info!("Created account {}", account.email);
            form.notice = Some(Notice::success(SIGN_UP_SUCCESS));
            form.reset_after_ms = Some(state.signup_reset_ms);
        }
        Err(err) => {
            AUTH_CNTR.with_label_values(&["sign_up", "failure"]).inc();
            tracing::warn!("Sign-up for {} failed: {err}", form.email);
            form.notice = Some(Notice::error(sign_up_message(&err.to_string())));
        }
    }
    form
}

async fn sign_in(state: AppState, headers: HeaderMap, credentials: Credentials) -> Response {
    match state
        .gateway
        .sign_in(&credentials.email, &credentials.password)
        .await
    {
        Ok(account) => {
            AUTH_CNTR.with_label_values(&["sign_in", "success"]).inc();
            tracing::info!("{} signed in", account.email);
            if let Some(previous) = session_id(&headers) {
                drop_session(&state, previous).await;
            }
            let id = state.sessions.create(account).await;
            (
                StatusCode::OK,
                [
                    (SET_COOKIE, session_cookie(id)),
                    (HX_REDIRECT, "/quiz".to_owned()),
                ],
            )
                .into_response()
        }
        Err(err) => {
            AUTH_CNTR.with_label_values(&["sign_in", "failure"]).inc();
            tracing::warn!("Sign-in for {} failed: {err}", credentials.email);
            AuthForm {
                email: credentials.email,
                notice: Some(Notice::error(sign_in_message(&err.to_string()))),
                ..AuthForm::new(AuthMode::Login)
            }
            .into_response()
        }
    }
}

async fn logout(State(state): State<AppState>, user: CurrentUser) -> Response {
    drop_session(&state, user.session_id).await;
    (
        StatusCode::OK,
        [
            (SET_COOKIE, expired_session_cookie()),
            (HX_REDIRECT, "/".to_owned()),
        ],
    )
        .into_response()
}

async fn drop_session(state: &AppState, id: uuid::Uuid) {
    let Some(session) = state.sessions.remove(id).await else {
        return;
    };
    if let Some(quiz) = &session.quiz {
        state.engine.discard(quiz).await;
    }
    if let Err(err) = state.gateway.sign_out(&session.account).await {
        tracing::warn!("Sign-out of {} failed: {err}", session.account.email);
    }
}

pub fn auth_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/auth", post(submit))
        .route("/auth/form", get(auth_form))
        .route("/logout", post(logout))
        .with_state(state)
}
