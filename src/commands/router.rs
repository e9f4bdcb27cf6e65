//! Command router: ordered handler predicates with first-match claiming.

use async_trait::async_trait;
use std::sync::Arc;

use crate::observability::events::EventRecorder;
use crate::observability::metrics;
use crate::workflow::identity::CallerIdentity;

/// A normalized inbound event from the message platform, whether it
/// originated as free text or a structured interaction.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub caller: CallerIdentity,
    /// Raw text of the command.
    pub text: String,
    /// Lowercased text, normalized once at ingress for matching.
    pub lowered: String,
    /// Optional structured target identity (admin commands).
    pub target: Option<String>,
}

impl InboundEvent {
    pub fn new(caller: CallerIdentity, text: impl Into<String>, target: Option<String>) -> Self {
        let text = text.into();
        let lowered = text.to_lowercase();
        Self {
            caller,
            text,
            lowered,
            target,
        }
    }
}

/// One command: a match predicate plus an async handler.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Stable name for logging and metrics.
    fn name(&self) -> &'static str;

    /// Whether the router must verify the caller is an admin first.
    fn admin_only(&self) -> bool {
        false
    }

    /// Whether this handler claims the event.
    fn matches(&self, event: &InboundEvent) -> bool;

    /// Produce the reply text.
    async fn handle(&self, event: &InboundEvent) -> String;
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// True when some handler claimed the event.
    pub claimed: bool,
    pub reply: Option<String>,
}

/// Evaluates handlers in registration order; the first match claims the
/// request.
pub struct CommandRouter {
    handlers: Vec<Arc<dyn CommandHandler>>,
    admin_ids: Arc<Vec<String>>,
    recorder: Arc<dyn EventRecorder>,
}

impl CommandRouter {
    pub fn new(
        handlers: Vec<Arc<dyn CommandHandler>>,
        admin_ids: Arc<Vec<String>>,
        recorder: Arc<dyn EventRecorder>,
    ) -> Self {
        Self {
            handlers,
            admin_ids,
            recorder,
        }
    }

    pub fn is_admin(&self, account_id: &str) -> bool {
        self.admin_ids.iter().any(|id| id == account_id)
    }

    /// Dispatch one event. The claimed flag lives here, per request.
    pub async fn dispatch(&self, event: &InboundEvent) -> Dispatch {
        let mut claimed = false;

        for handler in &self.handlers {
            if !handler.matches(event) {
                continue;
            }
            claimed = true;
            metrics::record_dispatch(handler.name());

            if handler.admin_only() && !self.is_admin(&event.caller.id) {
                self.recorder.record_event(
                    "command-unauthorised",
                    &[("handler", handler.name()), ("accountId", &event.caller.id)],
                );
                tracing::warn!(
                    handler = handler.name(),
                    account_id = %event.caller.id,
                    "Unauthorised admin command attempt"
                );
                return Dispatch {
                    claimed,
                    reply: Some("Sorry you are not authorised to do that.".to_string()),
                };
            }

            tracing::debug!(handler = handler.name(), account_id = %event.caller.id, "Dispatching command");
            let reply = handler.handle(event).await;
            return Dispatch {
                claimed,
                reply: Some(reply),
            };
        }

        Dispatch {
            claimed,
            reply: None,
        }
    }
}
