// SPDX-License-Identifier: MIT

// Core Modules
pub mod core;
pub mod fat12;

// Reusable types
pub use core::errors::*;
pub use core::report::*;
pub use core::tracker::RefTracker;
