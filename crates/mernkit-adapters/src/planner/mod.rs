//! Project planners.

mod mern;
pub mod templates;

pub use mern::{DEPENDENCY_TREES, MernPlanner, PROJECT_DIRECTORIES};
