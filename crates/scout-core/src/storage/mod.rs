//! Persistence layer.
//!
//! SQLite-based checkpoint storage so a session can be resumed across
//! separate invocations, plus an in-memory variant for tests.

mod checkpoints;

pub use checkpoints::{CheckpointStore, MemoryCheckpointStore, SqliteCheckpointStore};
