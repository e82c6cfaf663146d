//! Port for structured exchange logging.
//!
//! Records what the broker was asked, what each round produced and what it
//! answered, as machine-readable events. This is separate from `tracing`
//! diagnostics.

use serde_json::Value;

/// A structured exchange event.
pub struct ExchangeEvent {
    /// Event type identifier (`query_received`, `round_complete`, `answer_ready`).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ExchangeEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging exchange events.
///
/// Synchronous and non-fallible: a logging failure must never affect an answer.
pub trait ExchangeLogger: Send + Sync {
    fn log(&self, event: ExchangeEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoExchangeLogger;

impl ExchangeLogger for NoExchangeLogger {
    fn log(&self, _event: ExchangeEvent) {}
}
