// SPDX-License-Identifier: MIT

pub mod errors;
mod macros;
pub mod report;
pub mod tracker;
