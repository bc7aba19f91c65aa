//! Platform abstraction layer
//!
//! Handles the host-facing edges of the game:
//! - Input events (pointer / touch to player position)
//! - Frame scheduling (request / cancel display frames)
//! - Storage (localStorage-shaped key-value store)

pub mod input;
pub mod storage;
pub mod time;

pub use input::{PlayerReader, PointerTracker, tracker};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use time::{FrameHandle, FrameQueue, FrameScheduler};
