//! Scheduled continuations with per-region supersession
//!
//! A correction that must wait for the next frame or for the collapse
//! animation to finish is queued here under the id of the region it belongs
//! to. Each entry holds a [`CancellationToken`]. Scheduling for a region that
//! already has a pending entry cancels the older token, so at most one
//! continuation per region is ever live. Cancelled entries stay queued and
//! are discarded when they come due.
//!
//! Time is virtual: the page shell advances the clock as frames and timer
//! ticks arrive, which keeps replays deterministic.

use crate::document::ElementId;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// When a continuation becomes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// On the next animation frame, after layout has been recomputed
    NextFrame,
    /// Once this much time has elapsed
    After(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Due {
    Frame,
    At(Duration),
}

/// Handle to a scheduled continuation
#[derive(Debug, Clone)]
pub struct ContinuationTicket {
    region: ElementId,
    generation: u64,
    token: CancellationToken,
}

impl ContinuationTicket {
    /// Region the continuation belongs to
    pub fn region(&self) -> &ElementId {
        &self.region
    }

    /// Monotonic scheduling sequence number
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the continuation has not been superseded or cancelled
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }
}

#[derive(Debug)]
struct Pending<C> {
    ticket: ContinuationTicket,
    due: Due,
    payload: C,
}

/// Queue of per-region continuations on a virtual clock
#[derive(Debug)]
pub struct ContinuationQueue<C> {
    now: Duration,
    next_generation: u64,
    pending: Vec<Pending<C>>,
    live: HashMap<ElementId, CancellationToken>,
}

impl<C> Default for ContinuationQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ContinuationQueue<C> {
    /// Create an empty queue at time zero
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_generation: 0,
            pending: Vec::new(),
            live: HashMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule a continuation, superseding any live one for the region
    pub fn schedule(
        &mut self,
        region: ElementId,
        trigger: Trigger,
        payload: C,
    ) -> ContinuationTicket {
        if let Some(previous) = self.live.remove(&region) {
            previous.cancel();
            tracing::debug!("Superseded pending correction for '{}'", region);
        }

        let token = CancellationToken::new();
        let ticket = ContinuationTicket {
            region: region.clone(),
            generation: self.next_generation,
            token: token.clone(),
        };
        self.next_generation += 1;

        let due = match trigger {
            Trigger::NextFrame => Due::Frame,
            Trigger::After(delay) => Due::At(self.now + delay),
        };
        self.live.insert(region, token);
        self.pending.push(Pending {
            ticket: ticket.clone(),
            due,
            payload,
        });
        ticket
    }

    /// Cancel the live continuation for a region; returns whether one existed
    pub fn cancel(&mut self, region: &ElementId) -> bool {
        match self.live.remove(region) {
            Some(token) => {
                token.cancel();
                tracing::debug!("Cancelled pending correction for '{}'", region);
                true
            }
            None => false,
        }
    }

    /// Whether a live continuation exists for the region
    pub fn is_pending(&self, region: &ElementId) -> bool {
        self.live.contains_key(region)
    }

    /// Number of live continuations
    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Earliest timer deadline among live continuations
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|p| p.ticket.is_live())
            .filter_map(|p| match p.due {
                Due::At(at) => Some(at),
                Due::Frame => None,
            })
            .min()
    }

    /// Take every live continuation waiting for the next frame
    pub fn take_frame(&mut self) -> Vec<(ContinuationTicket, C)> {
        self.drain_due(|due| due == Due::Frame)
    }

    /// Advance the clock and take every live timer that came due, in due order
    pub fn advance(&mut self, elapsed: Duration) -> Vec<(ContinuationTicket, C)> {
        self.now += elapsed;
        let now = self.now;
        self.drain_due(|due| matches!(due, Due::At(at) if at <= now))
    }

    fn drain_due(&mut self, is_due: impl Fn(Due) -> bool) -> Vec<(ContinuationTicket, C)> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| is_due(p.due));
        self.pending = waiting;

        due.sort_by_key(|p| match p.due {
            Due::Frame => (Duration::ZERO, p.ticket.generation),
            Due::At(at) => (at, p.ticket.generation),
        });

        let mut fired = Vec::with_capacity(due.len());
        for entry in due {
            if !entry.ticket.is_live() {
                tracing::debug!(
                    "Discarding stale correction for '{}' (generation {})",
                    entry.ticket.region,
                    entry.ticket.generation
                );
                continue;
            }
            self.live.remove(&entry.ticket.region);
            fired.push((entry.ticket, entry.payload));
        }
        fired
    }
}
