// SPDX-License-Identifier: MIT

pub mod attr;
pub mod checker;
pub mod constant;
pub mod fat;
pub mod meta;
pub mod parser;
pub mod types;
pub mod utils;

pub mod prelude {
    pub use super::attr::Fat12Attributes;
    pub use super::checker::{Fat12Checker, RunStats};
    pub use super::constant::*;
    pub use super::meta::Fat12Meta;
    pub use super::parser::parse_boot;
    pub use super::types::*;
}
