//! Debounced update round-trips and their ordering against commands.
//!
//! Text input is coalesced: each edit replaces the queued, not-yet-sent
//! update. Structural commands must not reach the server before the text
//! they apply to, so they wait on [`RoundTripQueue::wait_idle`] first.
//!
//! The queue is executor-agnostic. The platform layer owns the timers and
//! the transport, calling [`RoundTripQueue::fire`] when a debounce timer
//! elapses and [`RoundTripQueue::settle`] when the server replies.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;
use web_time::Instant;

/// How a round-trip ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTripOutcome {
    /// The server replied.
    Acknowledged,
    /// No reply within the configured timeout.
    TimedOut,
    /// The transport reported an error, or the queue was torn down.
    Failed,
}

impl RoundTripOutcome {
    pub fn is_acknowledged(self) -> bool {
        self == Self::Acknowledged
    }
}

#[derive(Debug)]
struct InFlight {
    generation: u64,
    sent_at: Instant,
}

#[derive(Debug)]
struct Waiter {
    generation: u64,
    tx: oneshot::Sender<RoundTripOutcome>,
}

/// Single-slot queue of update round-trips.
#[derive(Debug)]
pub struct RoundTripQueue<P> {
    next_generation: u64,
    queued: Option<(u64, P)>,
    in_flight: Vec<InFlight>,
    waiters: Vec<Waiter>,
    timeout: Duration,
}

impl<P> RoundTripQueue<P> {
    pub fn new(timeout: Duration) -> Self {
        Self {
            next_generation: 1,
            queued: None,
            in_flight: Vec::new(),
            waiters: Vec::new(),
            timeout,
        }
    }

    /// Queue an update, replacing any queued one. Returns its generation,
    /// which the debounce timer passes back to [`Self::fire`].
    pub fn enqueue(&mut self, payload: P) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;

        if let Some((replaced, _)) = self.queued.replace((generation, payload)) {
            tracing::trace!(replaced, generation, "coalescing queued update");
            // Anyone waiting on the replaced update now waits on its successor.
            for waiter in &mut self.waiters {
                if waiter.generation == replaced {
                    waiter.generation = generation;
                }
            }
        }
        generation
    }

    /// Debounce elapsed: send the queued update if `generation` is still
    /// the queued one. Stale timers get `None`.
    pub fn fire(&mut self, generation: u64, now: Instant) -> Option<P> {
        let current = matches!(&self.queued, Some((queued, _)) if *queued == generation);
        if !current {
            tracing::trace!(generation, "ignoring stale debounce timer");
            return None;
        }
        self.flush(now).map(|(_, p)| p)
    }

    /// Send the queued update immediately, skipping the rest of its
    /// debounce window.
    pub fn flush(&mut self, now: Instant) -> Option<(u64, P)> {
        let (generation, payload) = self.queued.take()?;
        self.in_flight.push(InFlight {
            generation,
            sent_at: now,
        });
        Some((generation, payload))
    }

    /// Resolve a round-trip. Replies arrive in send order, so everything up
    /// to and including `generation` is settled. Returns how many waiters
    /// were woken.
    pub fn settle(&mut self, generation: u64, outcome: RoundTripOutcome) -> usize {
        self.in_flight.retain(|f| f.generation > generation);

        let (ready, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.waiters)
            .into_iter()
            .partition(|w| w.generation <= generation);
        self.waiters = pending;

        let woken = ready.len();
        for waiter in ready {
            // A dropped receiver just means nobody cares any more.
            let _ = waiter.tx.send(outcome);
        }
        woken
    }

    /// Time out round-trips sent more than `timeout` before `now`.
    /// Returns the generations that expired.
    pub fn expire(&mut self, now: Instant) -> Vec<u64> {
        let expired: Vec<u64> = self
            .in_flight
            .iter()
            .filter(|f| now.saturating_duration_since(f.sent_at) >= self.timeout)
            .map(|f| f.generation)
            .collect();

        for generation in &expired {
            tracing::warn!(generation, "update round-trip timed out");
            self.settle(*generation, RoundTripOutcome::TimedOut);
        }
        expired
    }

    /// Wait for the newest outstanding update (queued or in flight).
    /// Resolves immediately when nothing is outstanding.
    pub fn wait_idle(&mut self) -> IdleWait {
        let newest = self
            .queued
            .as_ref()
            .map(|(g, _)| *g)
            .or_else(|| self.in_flight.last().map(|f| f.generation));

        let Some(generation) = newest else {
            return IdleWait { rx: None };
        };

        let (tx, rx) = oneshot::channel();
        self.waiters.push(Waiter { generation, tx });
        IdleWait { rx: Some(rx) }
    }

    /// Nothing queued and nothing in flight.
    pub fn is_idle(&self) -> bool {
        self.queued.is_none() && self.in_flight.is_empty()
    }

    pub fn has_queued(&self) -> bool {
        self.queued.is_some()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Drop everything, failing all waiters.
    pub fn clear(&mut self) {
        self.queued = None;
        self.in_flight.clear();
        for waiter in std::mem::take(&mut self.waiters) {
            let _ = waiter.tx.send(RoundTripOutcome::Failed);
        }
    }
}

/// Future returned by [`RoundTripQueue::wait_idle`].
#[derive(Debug)]
pub struct IdleWait {
    rx: Option<oneshot::Receiver<RoundTripOutcome>>,
}

impl Future for IdleWait {
    type Output = RoundTripOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.rx.as_mut() {
            None => Poll::Ready(RoundTripOutcome::Acknowledged),
            Some(rx) => rx
                .poll_unpin(cx)
                .map(|r| r.unwrap_or(RoundTripOutcome::Failed)),
        }
    }
}
