//! Infrastructure adapters for mernkit.
//!
//! This crate implements the ports defined in `mernkit_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod command;
pub mod filesystem;
pub mod planner;

// Re-export commonly used adapters
pub use command::{ScriptedCommandRunner, ShellCommandRunner};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use planner::MernPlanner;
