//! Store access statistics

/// Counters for store activity
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    additions: u64,
    relocations: u64,
    evictions: u64,
    removals: u64,
}

impl StoreStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_addition(&mut self) {
        self.additions += 1;
    }

    pub(crate) fn record_relocation(&mut self) {
        self.relocations += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Keys inserted by a touch
    pub fn additions(&self) -> u64 {
        self.additions
    }

    /// Touches or gets that found their key and moved it to the front
    pub fn relocations(&self) -> u64 {
        self.relocations
    }

    /// Entries dropped for exceeding capacity
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Entries dropped by an explicit remove
    pub fn removals(&self) -> u64 {
        self.removals
    }

    /// Share of accesses that hit a resident key (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.additions + self.relocations;
        if total == 0 {
            0.0
        } else {
            self.relocations as f64 / total as f64
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
