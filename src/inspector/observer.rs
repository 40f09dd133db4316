//! Flow observer: the client-side synchronization protocol.
//!
//! A `FlowObserver` tracks one flow's execution state. It subscribes to
//! the advance bus exactly once at construction; each signal triggers one
//! snapshot fetch, and the fetch outcome replaces the whole view state.
//! Detaching drops the subscription, after which broadcasts produce no
//! fetch and no state mutation.
//!
//! Overlapping fetches are permitted (no cancellation, no timeout), but
//! completions carry a request id and only the newest outstanding request
//! may apply its result. Stale completions are discarded.

use std::sync::Arc;

use crate::api::{ApiError, SnapshotSource};
use crate::types::FlowInspection;

use super::signal::{AdvanceBus, AdvanceSubscription};

/// The tracked state of the inspected flow.
///
/// Exactly one variant at any time; every transition replaces the whole
/// value, so a fetch success can never leave a stale error visible and
/// vice versa.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// No fetch has completed yet (initial, or a hung request)
    #[default]
    Loading,
    /// Latest applied fetch succeeded
    Populated(FlowInspection),
    /// Latest applied fetch failed
    Failed(ApiError),
}

/// Handle for one outstanding refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    id: u64,
}

/// Observer of a single flow's execution state.
pub struct FlowObserver {
    flow_slug: String,
    source: Arc<dyn SnapshotSource>,
    subscription: AdvanceSubscription,
    view: ViewState,
    latest_request: u64,
}

impl FlowObserver {
    /// Create an observer for `flow_slug`, registering one listener on
    /// the advance bus.
    pub fn new(
        flow_slug: impl Into<String>,
        source: Arc<dyn SnapshotSource>,
        bus: &AdvanceBus,
    ) -> Self {
        Self {
            flow_slug: flow_slug.into(),
            source,
            subscription: bus.subscribe(),
            view: ViewState::Loading,
            latest_request: 0,
        }
    }

    pub fn flow_slug(&self) -> &str {
        &self.flow_slug
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Start a refresh: allocate the next request id and mark it the
    /// latest outstanding request.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_request += 1;
        RefreshTicket {
            id: self.latest_request,
        }
    }

    /// Apply a fetch outcome. The result replaces the whole view state
    /// only if the ticket is still the latest outstanding request;
    /// returns whether it was applied.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<FlowInspection, ApiError>,
    ) -> bool {
        if ticket.id != self.latest_request {
            tracing::debug!(
                flow = %self.flow_slug,
                stale = ticket.id,
                latest = self.latest_request,
                "discarding stale fetch completion"
            );
            return false;
        }

        self.view = match result {
            Ok(snapshot) => {
                tracing::debug!(
                    flow = %self.flow_slug,
                    completed = snapshot.is_completed,
                    steps = snapshot.plans.len(),
                    "snapshot applied"
                );
                ViewState::Populated(snapshot)
            }
            Err(error) => {
                tracing::warn!(flow = %self.flow_slug, %error, "snapshot fetch failed");
                ViewState::Failed(error)
            }
        };
        true
    }

    /// Fetch the current snapshot and apply it: `begin_refresh`, await
    /// the source, `complete_refresh`.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let result = self.source.fetch_inspection(&self.flow_slug).await;
        self.complete_refresh(ticket, result);
    }

    /// Wait for the next advance signal; `false` once the bus is gone.
    pub async fn next_signal(&mut self) -> bool {
        self.subscription.next().await
    }

    /// Check for pending advance signals without blocking. A burst of
    /// signals coalesces into a single `true`.
    pub fn signal_pending(&mut self) -> bool {
        self.subscription.try_next()
    }

    /// Tear the observer down, removing its listener from the bus.
    pub fn detach(self) {
        drop(self.subscription);
    }
}
