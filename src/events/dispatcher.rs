// Event dispatch
// Publishes a domain event to the bus slot, then records it in storage

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::events::models::Event;
use crate::storage::DynStorage;

/// Failure of one of the two dispatch phases
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Delivery to the external bus failed; the event was still recorded
    #[error("failed to publish event: {0}")]
    Publish(String),

    /// The event record could not be stored
    #[error("{0}")]
    Record(ApiError),
}

impl From<DispatchError> for ApiError {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::Record(ApiError::EventCreation(message)) => ApiError::EventCreation(message),
            DispatchError::Record(other) => {
                ApiError::EventCreation(format!("failed to record event: {}", other))
            }
            DispatchError::Publish(message) => ApiError::EventCreation(message),
        }
    }
}

/// External message bus
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<(), DispatchError>;
}

/// Bus that only writes the event to the log
#[derive(Debug, Default, Clone)]
pub struct LogEventBus;

#[async_trait]
impl EventBus for LogEventBus {
    async fn publish(&self, event: &Event) -> Result<(), DispatchError> {
        debug!(
            event_id = %event.id,
            entity_id = %event.entity_id,
            "Publishing event {}",
            event.event_type
        );
        Ok(())
    }
}

pub struct EventDispatcher {
    bus: Arc<dyn EventBus>,
    storage: DynStorage,
    permits: Arc<Semaphore>,
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Counts a spawned dispatch until its task finishes, even on panic
struct InFlight(Arc<EventDispatcher>);

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl EventDispatcher {
    /// `max_inflight` bounds how many dispatches run at once; extra tasks wait
    pub fn new(bus: Arc<dyn EventBus>, storage: DynStorage, max_inflight: usize) -> Self {
        Self {
            bus,
            storage,
            permits: Arc::new(Semaphore::new(max_inflight.max(1))),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        }
    }

    /// Publish, then record
    ///
    /// The record phase runs even when publishing fails. A record failure
    /// wins over a publish failure since the record is what callers rely on.
    pub async fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        let published = self.bus.publish(event).await;

        self.storage
            .create_event(event)
            .await
            .map_err(DispatchError::Record)?;

        debug!(event_id = %event.id, "Recorded event {}", event.event_type);
        published
    }

    /// Dispatch on a detached task
    ///
    /// The caller does not await the handle; failures only show up in the log.
    pub fn spawn(self: &Arc<Self>, event: Event) -> JoinHandle<()> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlight(Arc::clone(self));

        tokio::spawn(async move {
            let dispatcher = &guard.0;
            let _permit = match dispatcher.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    error!(event_id = %event.id, "Event dispatcher closed, dropping event");
                    return;
                }
            };

            if let Err(e) = dispatcher.dispatch(&event).await {
                let code = ApiError::from(e.clone()).code();
                error!(
                    code,
                    event_id = %event.id,
                    entity_id = %event.entity_id,
                    "Error dispatching event {}: {}",
                    event.event_type,
                    e
                );
            }
        })
    }

    /// Wait until every spawned dispatch has finished
    ///
    /// Called on shutdown before storage is closed, so queued events are
    /// still recorded.
    pub async fn drain(&self) {
        loop {
            let idle = self.idle.notified();
            let pending = self.in_flight.load(Ordering::Acquire);
            if pending == 0 {
                return;
            }
            debug!("Waiting for {} event dispatches", pending);
            idle.await;
        }
    }

    /// Number of dispatches that could start right now
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}
