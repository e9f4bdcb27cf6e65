//! HTTP gateway setup.
//!
//! # Responsibilities
//! - Accept normalized inbound command events as JSON
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch events to the command router
//! - Expose a health probe

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::commands::router::{CommandRouter, InboundEvent};
use crate::config::schema::GatewayConfig;
use crate::workflow::identity::CallerIdentity;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub commands: Arc<CommandRouter>,
}

#[derive(Debug, Deserialize)]
struct CallerPayload {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    discriminator: String,
}

#[derive(Debug, Deserialize)]
struct EventRequest {
    caller: CallerPayload,
    text: String,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Serialize)]
struct EventResponse {
    claimed: bool,
    reply: Option<String>,
}

/// HTTP server for the inbound event gateway.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    /// Create a new gateway server over a command router.
    pub fn new(config: &GatewayConfig, commands: Arc<CommandRouter>) -> Self {
        let state = AppState { commands };
        let router = Self::build_router(config, state);
        Self { router }
    }

    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/events", post(event_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Gateway shutting down");
            })
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

async fn event_handler(
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Json<EventResponse> {
    let caller = CallerIdentity {
        id: request.caller.id,
        username: request.caller.username,
        discriminator: request.caller.discriminator,
    };
    let event = InboundEvent::new(caller, request.text, request.target);

    let dispatch = state.commands.dispatch(&event).await;
    if !dispatch.claimed {
        tracing::debug!(account_id = %event.caller.id, "Event matched no handler");
    }

    Json(EventResponse {
        claimed: dispatch.claimed,
        reply: dispatch.reply,
    })
}

async fn health_handler() -> &'static str {
    "ok"
}
