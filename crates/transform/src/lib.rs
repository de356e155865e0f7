#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod determinize;
mod minimize;
mod partition;

pub use determinize::*;
pub use minimize::*;
pub use partition::*;
