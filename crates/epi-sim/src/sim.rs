//! The `Sim` struct and its wave loop.

use log::{debug, trace};
use rustc_hash::FxHashMap;

use epi_core::{LocationId, Tick};
use epi_location::{EpidemicEvent, Location, LocationSnapshot};
use epi_network::SmallWorldNetwork;
use epi_population::InfectionTally;

use crate::{EventQueue, SimError, SimObserver, SimResult};

// ── SimCheckpoint ─────────────────────────────────────────────────────────────

/// Complete scheduler state at a wave boundary.
///
/// Produced by [`Sim::checkpoint`] and consumed by [`Sim::rollback`].
#[derive(Clone, Debug)]
pub struct SimCheckpoint {
    now:       Tick,
    queue:     EventQueue,
    seq:       Vec<u64>,
    delivered: u64,
    locations: Vec<LocationSnapshot>,
}

impl SimCheckpoint {
    /// Simulation time at which the checkpoint was taken.
    pub fn now(&self) -> Tick {
        self.now
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// Sequential reference scheduler.
///
/// Delivers events in [`EventKey`][crate::EventKey] order, one **wave** at a
/// time:
///
/// 1. **Drain**: remove every queued event at the earliest timestamp `t`.
/// 2. **Dispatch**: hand each location its share of the wave, in key order.
///    Locations touch only their own state, so with the `parallel` feature
///    the per-location batches run on Rayon's thread pool.
/// 3. **Enqueue**: queue the produced events in ascending sender order, each
///    stamped with its sender's next sequence number.  Events produced for
///    `t` itself join the next wave.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Sim {
    pub(crate) network:   SmallWorldNetwork,
    pub(crate) locations: Vec<Location>,
    pub(crate) by_name:   FxHashMap<String, LocationId>,
    pub(crate) queue:     EventQueue,
    /// Next emission sequence number per sender, indexed by `LocationId`.
    pub(crate) seq:       Vec<u64>,
    pub(crate) now:       Tick,
    pub(crate) end_time:  Tick,
    pub(crate) delivered: u64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the configured end time.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.run_until(self.end_time, observer)
    }

    /// Process waves while the next queued timestamp is `< end`.
    ///
    /// Calls [`SimObserver::on_sim_end`] once before returning successfully.
    pub fn run_until<O: SimObserver>(&mut self, end: Tick, observer: &mut O) -> SimResult<()> {
        while self.queue.next_timestamp().is_some_and(|t| t < end) {
            self.step(observer)?;
        }
        debug!(
            "run stopped at {} ({} events delivered, {} pending)",
            self.now,
            self.delivered,
            self.queue.len(),
        );
        observer.on_sim_end(self.now, &self.locations);
        Ok(())
    }

    /// Process exactly one wave.  Returns the number of events delivered
    /// (0 when the queue is empty).
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<usize> {
        let Some((now, due)) = self.queue.drain_next() else {
            return Ok(0);
        };
        self.now = now;
        let processed = due.len();

        // ── Split the wave into per-location inboxes ──────────────────────
        //
        // Keys sort by receiver after timestamp, so every inbox is already
        // in delivery order.
        let mut inboxes: Vec<Vec<EpidemicEvent>> = vec![Vec::new(); self.locations.len()];
        for (_, event) in due {
            observer.on_event(&event);
            inboxes[event.receiver.index()].push(event);
        }

        // ── Dispatch ──────────────────────────────────────────────────────
        let produced = dispatch(&mut self.locations, inboxes)?;

        // ── Enqueue in ascending sender order ─────────────────────────────
        for (sender, events) in produced {
            for event in events {
                self.enqueue(sender, event)?;
            }
        }

        self.delivered += processed as u64;
        trace!("wave {now}: {processed} events, {} pending", self.queue.len());
        observer.on_wave_end(now, processed, &self.locations);
        Ok(processed)
    }

    fn enqueue(&mut self, sender: LocationId, event: EpidemicEvent) -> SimResult<()> {
        if event.receiver.index() >= self.locations.len() {
            return Err(SimError::UnknownReceiver { sender, receiver: event.receiver });
        }
        if event.timestamp < self.now {
            return Err(SimError::Causality {
                receiver:  event.receiver,
                timestamp: event.timestamp,
                now:       self.now,
            });
        }
        let seq = &mut self.seq[sender.index()];
        self.queue.push(sender, *seq, event);
        *seq += 1;
        Ok(())
    }

    // ── Rollback ──────────────────────────────────────────────────────────

    /// Capture the scheduler and every location at the current wave boundary.
    pub fn checkpoint(&self) -> SimCheckpoint {
        SimCheckpoint {
            now:       self.now,
            queue:     self.queue.clone(),
            seq:       self.seq.clone(),
            delivered: self.delivered,
            locations: self.locations.iter().map(Location::snapshot).collect(),
        }
    }

    /// Return to `checkpoint`.  Re-running from here replays the same events
    /// with the same random draws.
    ///
    /// # Errors
    ///
    /// [`SimError::CheckpointMismatch`] if the checkpoint was taken from a
    /// simulation with a different number of locations.
    pub fn rollback(&mut self, checkpoint: &SimCheckpoint) -> SimResult<()> {
        if checkpoint.locations.len() != self.locations.len() {
            return Err(SimError::CheckpointMismatch {
                expected: self.locations.len(),
                got:      checkpoint.locations.len(),
            });
        }
        for (location, snapshot) in self.locations.iter_mut().zip(&checkpoint.locations) {
            location.restore(snapshot);
        }
        self.now = checkpoint.now;
        self.queue = checkpoint.queue.clone();
        self.seq = checkpoint.seq.clone();
        self.delivered = checkpoint.delivered;
        debug!("rolled back to {}", self.now);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Timestamp of the most recently processed wave.
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn end_time(&self) -> Tick {
        self.end_time
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Total events delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    pub fn location_by_name(&self, name: &str) -> Option<&Location> {
        self.by_name.get(name).and_then(|&id| self.location(id))
    }

    /// All locations, indexed by `LocationId`.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Aggregate infection tally over every location.
    pub fn tally(&self) -> InfectionTally {
        self.locations.iter().map(Location::tally).sum()
    }

    /// Total residents over every location (migrants in flight excluded).
    pub fn resident_count(&self) -> usize {
        self.locations.iter().map(|l| l.population().len()).sum()
    }

    pub fn network(&self) -> &SmallWorldNetwork {
        &self.network
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Deliver every inbox to its location.  Returns the produced events per
/// sender, in ascending `LocationId` order, skipping idle locations.
#[cfg(not(feature = "parallel"))]
fn dispatch(
    locations: &mut [Location],
    inboxes:   Vec<Vec<EpidemicEvent>>,
) -> SimResult<Vec<(LocationId, Vec<EpidemicEvent>)>> {
    locations
        .iter_mut()
        .zip(inboxes)
        .filter(|(_, inbox)| !inbox.is_empty())
        .map(|(location, inbox)| deliver(location, inbox))
        .collect()
}

#[cfg(feature = "parallel")]
fn dispatch(
    locations: &mut [Location],
    inboxes:   Vec<Vec<EpidemicEvent>>,
) -> SimResult<Vec<(LocationId, Vec<EpidemicEvent>)>> {
    use rayon::prelude::*;

    // Indexed parallel iterators keep the collected order equal to the
    // location order, so enqueueing stays deterministic.
    locations
        .par_iter_mut()
        .zip(inboxes.into_par_iter())
        .filter(|(_, inbox)| !inbox.is_empty())
        .map(|(location, inbox)| deliver(location, inbox))
        .collect()
}

fn deliver(
    location: &mut Location,
    inbox:    Vec<EpidemicEvent>,
) -> SimResult<(LocationId, Vec<EpidemicEvent>)> {
    let id = location.id();
    let mut produced = Vec::new();
    for event in inbox {
        let events = location
            .handle(event)
            .map_err(|source| SimError::Location { location: id, source })?;
        produced.extend(events);
    }
    Ok((id, produced))
}
