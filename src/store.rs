//! Previous-sample state carried between cycles.
//!
//! The store keeps only what the next cycle needs as a baseline: each live
//! process's last `cpu_time_ticks` and the last global total/idle ticks.
//! It is rebuilt by [`crate::engine::compute_cycle`] every cycle, so a PID
//! missing from the newest enumeration drops out without any eviction pass.

use ahash::AHashMap as HashMap;

use crate::model::EntityId;

/// Lifecycle of a [`SampleStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// No cycle has been recorded yet.
    Empty,
    /// At least one cycle has been recorded. Never reverts to `Empty`.
    Warm,
}

#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    entity_ticks: HashMap<EntityId, u64>,
    prev_total_ticks: u64,
    prev_idle_ticks: u64,
    cycles: u64,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StoreState {
        if self.cycles == 0 {
            StoreState::Empty
        } else {
            StoreState::Warm
        }
    }

    /// Number of cycles recorded so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Last recorded tick counter for `pid`, if the process was seen in the previous cycle.
    pub fn prev_cpu_ticks(&self, pid: EntityId) -> Option<u64> {
        self.entity_ticks.get(&pid).copied()
    }

    pub fn prev_total_ticks(&self) -> u64 {
        self.prev_total_ticks
    }

    pub fn prev_idle_ticks(&self) -> u64 {
        self.prev_idle_ticks
    }

    pub fn len(&self) -> usize {
        self.entity_ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_ticks.is_empty()
    }

    /// Replaces the whole baseline with the given cycle's values.
    pub(crate) fn replace(
        &mut self,
        entity_ticks: HashMap<EntityId, u64>,
        total_ticks: u64,
        idle_ticks: u64,
    ) {
        self.entity_ticks = entity_ticks;
        self.prev_total_ticks = total_ticks;
        self.prev_idle_ticks = idle_ticks;
        self.cycles += 1;
    }
}
