//! Command runner adapters.

mod scripted;
mod shell;

pub use scripted::{Invocation, ScriptedCommandRunner};
pub use shell::ShellCommandRunner;
