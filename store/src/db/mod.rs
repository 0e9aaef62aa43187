//! Database module for SQLite persistence.

mod operations;
mod pool;
mod records;

pub use operations::*;
pub use pool::*;
pub use records::*;
