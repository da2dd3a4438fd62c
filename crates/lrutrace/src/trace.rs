//! Human-readable trace of store operations

use std::io::{self, Write};

use lrustore::{Capacity, LruStore, Outcome};
use tracing::debug;

/// Drives a key-only store and writes one block of lines per operation
pub struct Trace<W> {
    store: LruStore<String>,
    out: W,
}

impl<W: Write> Trace<W> {
    /// Create a trace over an empty store writing to `out`
    pub fn new(capacity: Capacity, out: W) -> Self {
        Self {
            store: LruStore::with_capacity(capacity),
            out,
        }
    }

    /// Touch `key`, then report the outcome, any eviction and the new order.
    pub fn touch(&mut self, key: String) -> io::Result<()> {
        let touch = self.store.touch(key);
        let entry = touch.entry();

        match touch.outcome() {
            Outcome::Added => writeln!(self.out, "ADD: {}", entry.key())?,
            Outcome::Moved => writeln!(self.out, "MOVE: {}", entry.key())?,
        }
        if let Some(evicted) = touch.evicted() {
            debug!(key = %evicted.key(), "evicted");
            writeln!(self.out, "EVICT: {}", evicted.key())?;
        }

        self.display()
    }

    /// Remove `key`, then report whether it was resident and the new order.
    pub fn remove(&mut self, key: &str) -> io::Result<()> {
        match self.store.remove(key) {
            Some(entry) => writeln!(self.out, "REMOVE: {}", entry.key())?,
            None => writeln!(self.out, "MISS: {}", key)?,
        }

        self.display()
    }

    /// Write the activity counters.
    pub fn stats(&mut self) -> io::Result<()> {
        let stats = self.store.stats();
        writeln!(
            self.out,
            "additions={} relocations={} evictions={} removals={} hit_ratio={:.2}",
            stats.additions(),
            stats.relocations(),
            stats.evictions(),
            stats.removals(),
            stats.hit_ratio()
        )
    }

    /// Number of resident entries
    pub fn resident(&self) -> usize {
        self.store.len()
    }

    fn display(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(capacity: usize, keys: &[&str], remove: &[&str]) -> String {
        let mut out = Vec::new();
        {
            let mut trace = Trace::new(Capacity::new(capacity).unwrap(), &mut out);
            for key in keys {
                trace.touch(key.to_string()).unwrap();
            }
            for key in remove {
                trace.remove(key).unwrap();
            }
            trace.stats().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_trace_default_scenario() {
        let out = run(5, &["STR1", "STR2", "STR3", "STR4", "STR5", "STR6"], &[]);
        let expected = "\
ADD: STR1
1 - [{STR1}]
ADD: STR2
2 - [{STR2}<-->{STR1}]
ADD: STR3
3 - [{STR3}<-->{STR2}<-->{STR1}]
ADD: STR4
4 - [{STR4}<-->{STR3}<-->{STR2}<-->{STR1}]
ADD: STR5
5 - [{STR5}<-->{STR4}<-->{STR3}<-->{STR2}<-->{STR1}]
ADD: STR6
EVICT: STR1
5 - [{STR6}<-->{STR5}<-->{STR4}<-->{STR3}<-->{STR2}]
additions=6 relocations=0 evictions=1 removals=0 hit_ratio=0.00
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_trace_huge_capacity() {
        let capacity: Capacity = "9223372036854775807".parse().unwrap();
        let mut out = Vec::new();
        {
            let mut trace = Trace::new(capacity, &mut out);
            trace.touch("A".to_string()).unwrap();
            trace.touch("B".to_string()).unwrap();
        }

        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("2 - [{B}<-->{A}]\n"));
    }

    #[test]
    fn test_trace_move_and_remove() {
        let out = run(3, &["A", "B", "A"], &["B", "Z"]);
        let expected = "\
ADD: A
1 - [{A}]
ADD: B
2 - [{B}<-->{A}]
MOVE: A
2 - [{A}<-->{B}]
REMOVE: B
1 - [{A}]
MISS: Z
1 - [{A}]
additions=2 relocations=1 evictions=0 removals=1 hit_ratio=0.33
";
        assert_eq!(out, expected);
    }
}
