//! Domain value objects: Bundler, CssFramework, Orm, DeleteKind, SessionState.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Bundler ──────────────────────────────────────────────────────────────────

/// Frontend bundler used to bootstrap the `client/` tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    #[default]
    Vite,
    Webpack,
}

impl Bundler {
    pub const ALL: [Self; 2] = [Self::Vite, Self::Webpack];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vite => "vite",
            Self::Webpack => "webpack",
        }
    }

    /// Entry module the bundler expects under `client/src`.
    pub const fn entry_file(&self) -> &'static str {
        match self {
            Self::Vite => "main.jsx",
            Self::Webpack => "index.js",
        }
    }
}

impl fmt::Display for Bundler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bundler {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vite" => Ok(Self::Vite),
            "webpack" => Ok(Self::Webpack),
            other => Err(DomainError::UnknownOption {
                field: "bundler",
                value: other.to_string(),
                expected: "vite, webpack",
            }),
        }
    }
}

// ── CssFramework ─────────────────────────────────────────────────────────────

/// CSS framework wired into the frontend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssFramework {
    Tailwind,
    Bootstrap,
    #[default]
    None,
}

impl CssFramework {
    pub const ALL: [Self; 3] = [Self::Tailwind, Self::Bootstrap, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tailwind => "tailwind",
            Self::Bootstrap => "bootstrap",
            Self::None => "none",
        }
    }
}

impl fmt::Display for CssFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CssFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tailwind" | "tailwindcss" => Ok(Self::Tailwind),
            "bootstrap" => Ok(Self::Bootstrap),
            "none" | "" => Ok(Self::None),
            other => Err(DomainError::UnknownOption {
                field: "css",
                value: other.to_string(),
                expected: "tailwind, bootstrap, none",
            }),
        }
    }
}

// ── Orm ──────────────────────────────────────────────────────────────────────

/// Backend data-access library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orm {
    Mongoose,
    Sequelize,
    #[default]
    None,
}

impl Orm {
    pub const ALL: [Self; 3] = [Self::Mongoose, Self::Sequelize, Self::None];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mongoose => "mongoose",
            Self::Sequelize => "sequelize",
            Self::None => "none",
        }
    }

    /// Human label used in prompts.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mongoose => "Mongoose (MongoDB)",
            Self::Sequelize => "Sequelize (SQL)",
            Self::None => "None",
        }
    }
}

impl fmt::Display for Orm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongoose" | "mongo" | "mongodb" => Ok(Self::Mongoose),
            "sequelize" | "sql" => Ok(Self::Sequelize),
            "none" | "" => Ok(Self::None),
            other => Err(DomainError::UnknownOption {
                field: "orm",
                value: other.to_string(),
                expected: "mongoose, sequelize, none",
            }),
        }
    }
}

// ── DeleteKind ───────────────────────────────────────────────────────────────

/// What a compensating deletion removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteKind {
    File,
    Directory,
}

impl DeleteKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for DeleteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SessionState ─────────────────────────────────────────────────────────────

/// Lifecycle of a provisioning session.
///
/// ```text
/// Planning ──▶ Executing ──▶ Committed
///                  │
///                  └──────▶ RollingBack ──▶ Failed
/// ```
///
/// `Planning ──▶ Failed` is also legal: a plan that fails validation (or a
/// project root that already exists) never reaches execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    Planning,
    Executing,
    Committed,
    RollingBack,
    Failed,
}

impl SessionState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Executing => "executing",
            Self::Committed => "committed",
            Self::RollingBack => "rolling-back",
            Self::Failed => "failed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::Failed)
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Planning, Self::Executing)
                | (Self::Planning, Self::Failed)
                | (Self::Executing, Self::Committed)
                | (Self::Executing, Self::RollingBack)
                | (Self::RollingBack, Self::Failed)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
