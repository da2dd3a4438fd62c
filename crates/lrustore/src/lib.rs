//! # lrustore
//!
//! Fixed-capacity least-recently-used store.
//!
//! ## Architecture
//! - **Recency list**: arena of slots linked by index, with fixed head and
//!   tail sentinels. Move-to-front and tail eviction are O(1).
//! - **Index**: AHash map from key to slot (O(1) lookups)
//! - **Shared handle**: one `parking_lot` mutex over both halves
//!
//! ```
//! use lrustore::{LruStore, Outcome};
//!
//! let mut store: LruStore<&str> = LruStore::new(2).unwrap();
//! store.touch("a");
//! store.touch("b");
//! assert_eq!(store.touch("a").outcome(), Outcome::Moved);
//!
//! let touch = store.touch("c");
//! assert_eq!(touch.evicted().map(|e| *e.key()), Some("b"));
//! assert_eq!(store.to_string(), "2 - [{c}<-->{a}]");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod list;
mod shared;
mod stats;
mod store;

pub use config::{Capacity, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use shared::SharedStore;
pub use stats::StoreStats;
pub use store::{Entry, EntryId, LruStore, Outcome, Snapshot, Touch};
