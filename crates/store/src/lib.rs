#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod memory;
mod store;

pub use memory::*;
pub use store::*;
