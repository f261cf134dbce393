//! Persistence layer of a small command-line task tracker.
//!
//! Tasks live in a single JSON file owned by a [`TaskStore`]. The store
//! loads the file once, applies one mutation at a time and rewrites the
//! whole file after each of them.

pub mod config;
pub mod error;
pub mod store;
pub mod task;
pub mod timestamp;

pub use crate::error::{Result, StoreError};
pub use crate::store::{IdStrategy, StoreOptions, TaskStore};
pub use crate::task::{Status, Task};
