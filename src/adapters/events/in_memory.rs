//! In-memory event bus.
//!
//! Process-wide publish/subscribe for the story pipeline. Subscriptions are
//! registered during startup; after that the registry is only read.
//!
//! # Dispatch
//!
//! How handlers run is an explicit choice, see [`DispatchMode`]:
//!
//! - `Detached` spawns every handler as its own tokio task. `publish`
//!   returns once the tasks are spawned, so a slow consumer never delays the
//!   publisher or its sibling consumers. No ordering between handlers.
//! - `Inline` awaits handlers one after another inside `publish`. The
//!   publisher blocks until all of them finish. Deterministic, meant for
//!   tests and tools.
//!
//! In both modes a handler that fails or panics is logged and forgotten;
//! the publisher and the other handlers never see it.

use async_trait::async_trait;
use futures::FutureExt;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::task::JoinHandle;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// Number of published envelopes kept for inspection.
const DEFAULT_HISTORY_LIMIT: usize = 256;

/// How the bus runs the handlers of a published event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Each handler in its own task, not bound to the publish call.
    #[default]
    Detached,
    /// Handlers awaited sequentially inside the publish call.
    Inline,
}

/// In-memory event bus.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.subscribe(STORY_COMPLETED, analysis_handler);
/// bus.subscribe(STORY_COMPLETED, comic_handler);
///
/// bus.publish(StoryCompleted::new(story_id).to_envelope()).await?;
/// bus.drain().await; // wait for detached handlers, e.g. on shutdown
/// ```
pub struct InMemoryEventBus {
    mode: DispatchMode,
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<VecDeque<EventEnvelope>>,
    history_limit: usize,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl InMemoryEventBus {
    /// Creates an empty bus that dispatches detached.
    pub fn new() -> Self {
        Self::with_mode(DispatchMode::Detached)
    }

    /// Creates an empty bus with the given dispatch mode.
    pub fn with_mode(mode: DispatchMode) -> Self {
        Self {
            mode,
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(VecDeque::new()),
            history_limit: DEFAULT_HISTORY_LIMIT,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Sets how many published envelopes are retained for inspection.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Returns the dispatch mode.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Waits until every detached handler task has finished.
    ///
    /// Handlers that publish further events while draining are waited for too.
    pub async fn drain(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = {
                let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *in_flight)
            };
            if pending.is_empty() {
                return;
            }
            for result in futures::future::join_all(pending).await {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Event handler task aborted");
                }
            }
        }
    }

    /// Number of handlers subscribed to an event type.
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Returns retained published events, oldest first.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Returns count of retained published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.event_type == event_type)
    }

    fn record(&self, event: &EventEnvelope) {
        if self.history_limit == 0 {
            return;
        }
        let mut published = self.published.write().unwrap_or_else(PoisonError::into_inner);
        while published.len() >= self.history_limit {
            published.pop_front();
        }
        published.push_back(event.clone());
    }

    fn handlers_for(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one handler, containing its errors and panics.
async fn dispatch(handler: Arc<dyn EventHandler>, event: EventEnvelope) {
    let name = handler.name();
    let event_id = event.event_id.clone();
    let event_type = event.event_type.clone();
    let user_id = event.metadata.user_id.clone();

    match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
        Ok(Ok(())) => {
            tracing::debug!(handler = name, event_id = %event_id, event_type = %event_type, "Event handled");
        }
        Ok(Err(e)) => {
            tracing::warn!(handler = name, event_id = %event_id, event_type = %event_type, user_id = ?user_id, error = %e, "Event handler failed");
        }
        Err(_) => {
            tracing::error!(handler = name, event_id = %event_id, event_type = %event_type, user_id = ?user_id, "Event handler panicked");
        }
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.record(&event);

        // Clone handlers to release lock before await points
        let type_handlers = self.handlers_for(&event.event_type);
        if type_handlers.is_empty() {
            tracing::debug!(event_type = %event.event_type, "No subscribers for event");
            return Ok(());
        }

        match self.mode {
            DispatchMode::Detached => {
                for handler in type_handlers {
                    let handle = tokio::spawn(dispatch(handler, event.clone()));
                    self.track(handle);
                }
            }
            DispatchMode::Inline => {
                for handler in type_handlers {
                    dispatch(handler, event.clone()).await;
                }
            }
        }

        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        tracing::debug!(event_type, handler = handler.name(), "Subscribing handler");
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }
}
