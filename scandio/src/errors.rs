// SPDX-License-Identifier: MIT

use core::fmt;

/// Result type for block IO operations.
pub type BlockIOResult<T = ()> = core::result::Result<T, BlockIOError>;

/// Failures a block backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIOError {
    /// Access past the end of the backing store.
    OutOfBounds,
    /// Backend-specific failure, e.g. a mapped `std::io::Error`.
    Other(&'static str),
}

impl BlockIOError {
    pub fn msg(&self) -> &'static str {
        match self {
            BlockIOError::OutOfBounds => "Out of bounds",
            BlockIOError::Other(msg) => msg,
        }
    }
}

impl From<&'static str> for BlockIOError {
    #[inline]
    fn from(msg: &'static str) -> Self {
        BlockIOError::Other(msg)
    }
}

impl fmt::Display for BlockIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.msg())
    }
}
