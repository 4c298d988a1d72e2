//! Row filtering, searching, and ordering

mod filter;
mod sort;

pub use filter::*;
pub use sort::*;
