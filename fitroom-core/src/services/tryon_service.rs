//! The try-on request state machine.
//!
//! `Idle -> Pending -> Succeeded | Failed`, terminal states re-submittable.
//! Single-flight: a second `submit` while `Pending` is rejected without
//! dispatching a request. Each request carries a generation tag; a
//! response whose generation no longer matches (the workflow was reset
//! while it was in flight) is discarded instead of being applied to
//! stale state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use fitroom_common::error::{Error, Result};
use fitroom_common::models::tryon::{FailureReason, ResultImage, TryOnRequest, TryOnState};
use fitroom_common::traits::FittingBackend;

use crate::eventbus::{EventBus, FittingEvent};

pub struct TryOnOrchestrator {
    backend: Arc<dyn FittingBackend>,
    event_bus: Arc<EventBus>,
    state: Mutex<TryOnState>,
    generation: AtomicU64,
}

impl TryOnOrchestrator {
    pub fn new(backend: Arc<dyn FittingBackend>, event_bus: Arc<EventBus>) -> Self {
        Self {
            backend,
            event_bus,
            state: Mutex::new(TryOnState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn state(&self) -> TryOnState {
        self.state.lock().await.clone()
    }

    /// Issue exactly one synthesis request for a complete selection.
    ///
    /// Returns the state the machine settled in (`Succeeded`/`Failed`,
    /// or whatever a concurrent `reset` left behind if this response was
    /// discarded). `AlreadyInFlight` is the only error path: the
    /// submission was rejected and nothing was dispatched.
    pub async fn submit(&self, request: TryOnRequest) -> Result<TryOnState> {
        {
            let mut state = self.state.lock().await;
            if state.is_pending() {
                debug!("Rejecting submit: a try-on request is already pending");
                return Err(Error::AlreadyInFlight);
            }
            *state = TryOnState::Pending;
        }
        self.event_bus
            .publish(FittingEvent::TryOnStateChanged(TryOnState::Pending))
            .await;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Dispatching try-on request (generation {}): cloth={} category={}",
            generation, request.cloth_url, request.category
        );

        let outcome = self.backend.try_on(request).await;
        self.apply(generation, outcome).await
    }

    /// Apply a response if it still belongs to the current generation.
    async fn apply(&self, generation: u64, outcome: Result<ResultImage>) -> Result<TryOnState> {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "Discarding try-on response from superseded generation {}",
                generation
            );
            return Ok(self.state().await);
        }

        let next = match outcome {
            Ok(image) => {
                info!("Try-on succeeded: {}", image);
                TryOnState::Succeeded(image)
            }
            Err(err) => {
                let reason = FailureReason::classify(&err);
                warn!("Try-on failed ({:?}): {}", reason, err);
                TryOnState::Failed(reason)
            }
        };

        {
            let mut state = self.state.lock().await;
            if !state.is_pending() {
                // A reset raced ahead of us; the slot is no longer ours.
                return Ok(state.clone());
            }
            *state = next.clone();
        }

        self.event_bus
            .publish(FittingEvent::TryOnStateChanged(next.clone()))
            .await;
        if let TryOnState::Failed(reason) = &next {
            self.event_bus
                .publish(FittingEvent::Notification(format!("Try-on failed: {reason}")))
                .await;
        }
        Ok(next)
    }

    /// Drop a terminal result back to `Idle` (a new photo invalidates
    /// the previous result). A pending request is left alone; it is
    /// still single-flight-guarded and keeps its generation.
    pub async fn clear_result(&self) {
        let cleared = {
            let mut state = self.state.lock().await;
            if state.is_terminal() {
                *state = TryOnState::Idle;
                true
            } else {
                false
            }
        };
        if cleared {
            debug!("Cleared previous try-on result");
            self.event_bus
                .publish(FittingEvent::TryOnStateChanged(TryOnState::Idle))
                .await;
        }
    }

    /// Workflow teardown: forget the current request cycle entirely.
    ///
    /// Bumps the generation so an in-flight response, when it eventually
    /// arrives, is discarded rather than applied to stale state.
    pub async fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let changed = {
            let mut state = self.state.lock().await;
            if *state != TryOnState::Idle {
                *state = TryOnState::Idle;
                true
            } else {
                false
            }
        };
        if changed {
            info!("Try-on state reset");
            self.event_bus
                .publish(FittingEvent::TryOnStateChanged(TryOnState::Idle))
                .await;
        }
    }
}
