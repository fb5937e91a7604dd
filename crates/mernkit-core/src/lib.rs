//! Mernkit Core - transactional provisioning engine
//!
//! This crate provides the domain and application layers for the mernkit
//! MERN project generator, following hexagonal (ports and adapters)
//! architecture. A run either commits a complete project tree or rolls
//! back every artifact it created.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           mernkit-cli (CLI)             │
//! │   (prompts, config, exit codes)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ProvisioningSession, StepExecutor,    │
//! │   RollbackEngine, RetryingDeleter)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Filesystem, CommandRunner)         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    mernkit-adapters (Infrastructure)    │
//! │  (LocalFilesystem, ShellCommandRunner,  │
//! │   MernPlanner)                          │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ProvisioningPlan, Step, Journal,      │
//! │   RollbackReport, ProjectConfig)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mernkit_core::prelude::*;
//!
//! # fn demo(filesystem: Box<dyn Filesystem>, runner: Box<dyn CommandRunner>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let root = ProjectRoot::new("/tmp/shop")?;
//! let plan = ProvisioningPlan::new(root.clone())
//!     .with_step(Step::create_directory(root.path()))
//!     .with_step(Step::write_file(root.join("README.md")?, "# shop\n"));
//!
//! let mut session = ProvisioningSession::new(filesystem, runner);
//! match session.run(&plan) {
//!     Ok(summary) => println!("created {}", summary.root.display()),
//!     Err(failure) => std::process::exit(failure.exit_code().into()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CommitSummary, ProvisioningSession, RetryPolicy, SessionFailure,
        ports::{CommandRunner, Filesystem, ProjectPlanner},
    };
    pub use crate::domain::{
        Bundler, CssFramework, ExternalCommand, Orm, ProjectConfig, ProjectRoot,
        ProvisioningPlan, RollbackReport, SessionState, Step,
    };
    pub use crate::error::{MernkitError, MernkitResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
