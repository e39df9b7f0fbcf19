//! Single-flight token refresh
//!
//! A [`RefreshGate`] lives inside each [`ApiClient`](super::ApiClient). The
//! first request to see a 401 becomes the leader and holds a
//! [`RefreshLease`]; every other 401 that arrives while the lease is held is
//! parked in a FIFO queue until the lease settles.
//!
//! The lock is only held for state transitions, never across an `.await`.

use std::collections::VecDeque;
use std::mem;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::errors::ApiError;
use super::request::RequestDescriptor;

/// Continuation of a queued request: the refreshed token, or the failure
/// every queued request rejects with.
pub type Resumption = Result<String, ApiError>;

/// A request parked while a refresh is in flight
#[derive(Debug)]
pub struct PendingRequest {
    pub request: RequestDescriptor,
    resume: oneshot::Sender<Resumption>,
}

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    /// Number of completed successful refreshes.
    generation: u64,
    queue: VecDeque<PendingRequest>,
}

/// What a request that just received a 401 should do next
#[derive(Debug)]
pub enum Admission<'a> {
    /// A refresh completed after this request was sent; replay it with the
    /// stored token without refreshing again.
    Replay,
    /// A refresh is in flight; wait for its outcome.
    Wait(oneshot::Receiver<Resumption>),
    /// Nobody is refreshing; this request leads the refresh.
    Lead(RefreshLease<'a>),
}

/// Per-client refresh coordination state
#[derive(Debug, Default)]
pub struct RefreshGate {
    state: Mutex<RefreshState>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation. Read it before sending a request and hand it back
    /// to [`admit`](Self::admit) when that request comes back 401.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Requests currently parked, in resume order.
    pub fn queued(&self) -> Vec<RequestDescriptor> {
        self.state.lock().queue.iter().map(|pending| pending.request.clone()).collect()
    }

    /// Decide how a 401 for `request` (sent at `sent_generation`) proceeds.
    pub fn admit(&self, sent_generation: u64, request: &RequestDescriptor) -> Admission<'_> {
        let mut state = self.state.lock();

        if state.refreshing {
            let (resume, waiter) = oneshot::channel();
            state.queue.push_back(PendingRequest { request: request.clone(), resume });
            debug!(
                queued = state.queue.len(),
                url = %request.url.path(),
                "refresh in flight, queueing request"
            );
            return Admission::Wait(waiter);
        }

        if state.generation != sent_generation {
            debug!(url = %request.url.path(), "credential refreshed since request was sent");
            return Admission::Replay;
        }

        state.refreshing = true;
        Admission::Lead(RefreshLease { gate: self, settled: false })
    }

    fn settle(&self, outcome: &Resumption) {
        let queue = {
            let mut state = self.state.lock();
            state.refreshing = false;
            if outcome.is_ok() {
                state.generation += 1;
            }
            mem::take(&mut state.queue)
        };

        for pending in queue {
            // A dropped receiver means the caller stopped waiting.
            let _ = pending.resume.send(outcome.clone());
        }
    }
}

/// Exclusive right to run the refresh call.
///
/// Settling the lease clears the in-flight flag and resumes the queue in
/// FIFO order. A lease dropped without settling rejects the queue with
/// [`ApiError::RefreshAborted`].
#[derive(Debug)]
#[must_use = "dropping the lease aborts the refresh"]
pub struct RefreshLease<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Release queued requests with the refreshed token.
    pub fn succeed(mut self, token: &str) {
        self.settled = true;
        self.gate.settle(&Ok(token.to_string()));
    }

    /// Reject queued requests with `error`.
    pub fn fail(mut self, error: &ApiError) {
        self.settled = true;
        self.gate.settle(&Err(error.clone()));
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("token refresh abandoned; rejecting queued requests");
            self.gate.settle(&Err(ApiError::RefreshAborted));
        }
    }
}
