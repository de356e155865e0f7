#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod automaton;
mod builder;
mod error;
mod io_fa;
mod random_automaton;
mod simulate;

pub use automaton::*;
pub use builder::*;
pub use error::*;
pub use io_fa::*;
pub use random_automaton::*;
