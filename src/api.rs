use std::sync::Arc;

use axum::{
    Router,
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    auth::Authenticator,
    clients::github::{DispatchClient, DispatchError},
    config::Config,
    dedup::DedupTracker,
    error::RelayError,
    utils::{RelayOutcome, process_message},
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    authenticator: Authenticator,
    dedup: DedupTracker,
    dispatch_client: DispatchClient,
    event_type: String,
    max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            inner: Arc::new(AppStateInner {
                authenticator: Authenticator::new(config.relay_secret.clone()),
                dedup: DedupTracker::new(config.dedup_window(), config.dedup_policy),
                dispatch_client: DispatchClient::new(config)?,
                event_type: config.dispatch_event_type.clone(),
                max_body_bytes: config.max_body_bytes,
            }),
        })
    }

    pub fn dedup(&self) -> &DedupTracker {
        &self.inner.dedup
    }
}

/// Every path is handled by the relay; there are no other routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(relay_handler)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "relay_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

pub async fn run_api_server(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    info!(
        address = %addr,
        repo = %config.github_repo,
        dedup_window_ms = config.dedup_window_ms,
        dedup_policy = ?config.dedup_policy,
        "Relay listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay stopped");

    Ok(())
}

async fn relay_handler(State(state): State<AppState>, request: Request) -> Response {
    info!(method = %request.method(), uri = %request.uri(), "Request received");

    match handle(&state, request).await {
        Ok(outcome) => {
            debug!(?outcome, "Responding ok");
            (StatusCode::OK, "ok").into_response()
        }
        Err(err) => {
            log_rejection(&err);
            err.into_response()
        }
    }
}

async fn handle(state: &AppState, request: Request) -> Result<RelayOutcome, RelayError> {
    if request.method() != Method::POST {
        return Err(RelayError::MethodNotAllowed);
    }

    if !state.inner.authenticator.is_authorized(request.headers()) {
        return Err(RelayError::Unauthorized);
    }

    let limit = state.inner.max_body_bytes;
    let body = to_bytes(request.into_body(), limit).await.map_err(|e| {
        let inner = e.into_inner();
        if inner.is::<LengthLimitError>() {
            RelayError::PayloadTooLarge { limit }
        } else {
            RelayError::BodyRead(inner.to_string())
        }
    })?;

    process_message(
        &body,
        &state.inner.event_type,
        &state.inner.dedup,
        &state.inner.dispatch_client,
    )
    .await
}

fn log_rejection(err: &RelayError) {
    match err {
        RelayError::MethodNotAllowed => info!("Method not allowed"),
        RelayError::Unauthorized => warn!("Unauthorized"),
        RelayError::PayloadTooLarge { limit } => warn!(limit, "Request body too large"),
        RelayError::Dispatch(DispatchError::Downstream { status, .. }) => {
            warn!(status = status.as_u16(), "Responding 502 after GitHub rejection")
        }
        other => error!(error = %other, "Error"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
