// SPDX-License-Identifier: MIT

//! Reference tracker for cluster reachability during tree walks.
//!
//! One bit per cluster instead of one byte (like `Vec<bool>`). The checker
//! relies on `mark` returning the prior state: a second claim on the same
//! cluster is how cross-links and cycles are detected.

/// Tracks which clusters have been claimed by the directory walk.
#[derive(Debug, Clone)]
pub struct RefTracker {
    bitmap: Vec<u8>,
    count: usize,
}

impl RefTracker {
    /// Creates a tracker for clusters `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            bitmap: vec![0u8; count.div_ceil(8)],
            count,
        }
    }

    /// Marks a cluster as referenced and returns whether it already was.
    ///
    /// Out-of-range clusters report as already claimed, so callers reject
    /// them instead of walking past the volume end.
    #[inline]
    pub fn mark(&mut self, cluster: u16) -> bool {
        let idx = cluster as usize;
        if idx >= self.count {
            return true;
        }
        let prior = self.bitmap[idx / 8] & (1 << (idx % 8)) != 0;
        self.bitmap[idx / 8] |= 1 << (idx % 8);
        prior
    }

    /// Checks whether a cluster has been claimed.
    #[inline]
    pub fn is_marked(&self, cluster: u16) -> bool {
        let idx = cluster as usize;
        if idx >= self.count {
            return false;
        }
        self.bitmap[idx / 8] & (1 << (idx % 8)) != 0
    }

    /// Returns the number of tracked clusters.
    pub fn count(&self) -> usize {
        self.count
    }
}
