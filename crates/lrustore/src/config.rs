//! Store capacity configuration

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 5;

/// Maximum number of live entries a store may hold. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Validate a capacity
    ///
    /// # Returns
    /// * `Err(Error::InvalidCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Capacity)
            .ok_or(Error::InvalidCapacity(0))
    }

    /// Get the bound as a plain count
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(n: NonZeroUsize) -> Self {
        Self(n)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self> {
        if n < 1 {
            return Err(Error::InvalidCapacity(n));
        }
        let n = usize::try_from(n).map_err(|e| Error::Parse(e.to_string()))?;
        Capacity::new(n)
    }
}

impl FromStr for Capacity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let n: i64 = s.trim().parse()?;
        Capacity::try_from(n)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
