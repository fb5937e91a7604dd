//! Scripted command runner for tests and dry runs.
//!
//! Matches commands by substring and replays canned effects through a
//! [`Filesystem`] instead of spawning anything.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use mernkit_core::application::{
    ApplicationError, ApplicationResult,
    ports::{CommandRunner, Filesystem},
};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub working_dir: PathBuf,
    pub command: String,
}

#[derive(Debug, Clone)]
enum Effect {
    CreateDir(PathBuf),
    Write(PathBuf, String),
    Fail(String),
}

#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    effect: Effect,
}

/// Command runner that never spawns a process.
///
/// Unmatched commands succeed with no effect. For a matching command all
/// filesystem effects are applied first, then the first matching failure is
/// returned; this models an install that dies half way.
#[derive(Clone, Default)]
pub struct ScriptedCommandRunner {
    filesystem: Option<Arc<dyn Filesystem>>,
    rules: Vec<Rule>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl ScriptedCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filesystem the scripted effects are applied to.
    pub fn with_filesystem(mut self, filesystem: Arc<dyn Filesystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    /// Commands containing `pattern` create `relative` under their working dir.
    pub fn creates_dir(mut self, pattern: &str, relative: impl Into<PathBuf>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.into(),
            effect: Effect::CreateDir(relative.into()),
        });
        self
    }

    /// Commands containing `pattern` write `content` to `relative`.
    pub fn writes(
        mut self,
        pattern: &str,
        relative: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        self.rules.push(Rule {
            pattern: pattern.into(),
            effect: Effect::Write(relative.into(), content.into()),
        });
        self
    }

    /// Commands containing `pattern` exit non-zero.
    pub fn fails(mut self, pattern: &str, reason: impl Into<String>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.into(),
            effect: Effect::Fail(reason.into()),
        });
        self
    }

    /// Roughly what npm leaves behind: manifests from `init`/`create`,
    /// a lockfile and `node_modules` from installs.
    pub fn npm_like(filesystem: Arc<dyn Filesystem>) -> Self {
        Self::new()
            .with_filesystem(filesystem)
            .writes(
                "npm init",
                "package.json",
                r#"{"name":"app","version":"1.0.0","scripts":{"test":"echo"}}"#,
            )
            .writes(
                "npm create vite",
                "package.json",
                r#"{"name":"client","private":true,"scripts":{"dev":"vite"}}"#,
            )
            .creates_dir("npm create vite", "src")
            .writes(
                "npm create vite",
                "src/main.jsx",
                "import React from 'react';\n",
            )
            .creates_dir("npm install", "node_modules")
            .writes("npm install", "package-lock.json", "{}")
    }

    /// Every command run so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn apply(&self, working_dir: &Path, effect: &Effect) -> ApplicationResult<()> {
        let Some(fs) = &self.filesystem else {
            return Ok(());
        };
        match effect {
            Effect::CreateDir(relative) => fs.create_dir_all(&working_dir.join(relative)),
            Effect::Write(relative, content) => fs.write_file(&working_dir.join(relative), content),
            Effect::Fail(_) => Ok(()),
        }
    }
}

impl CommandRunner for ScriptedCommandRunner {
    fn run(&self, working_dir: &Path, command: &str) -> ApplicationResult<()> {
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                working_dir: working_dir.to_path_buf(),
                command: command.to_string(),
            });

        let matching: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| command.contains(&r.pattern))
            .collect();

        for rule in &matching {
            self.apply(working_dir, &rule.effect)
                .map_err(|e| ApplicationError::ExternalCommand {
                    command: command.to_string(),
                    working_dir: working_dir.to_path_buf(),
                    reason: e.to_string(),
                })?;
        }

        match matching.iter().find_map(|r| match &r.effect {
            Effect::Fail(reason) => Some(reason),
            _ => None,
        }) {
            Some(reason) => Err(ApplicationError::ExternalCommand {
                command: command.to_string(),
                working_dir: working_dir.to_path_buf(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;

    #[test]
    fn unmatched_commands_succeed_and_are_recorded() {
        let runner = ScriptedCommandRunner::new();
        runner.run(Path::new("/app"), "npm test").unwrap();
        assert_eq!(
            runner.invocations(),
            vec![Invocation {
                working_dir: PathBuf::from("/app"),
                command: "npm test".into(),
            }]
        );
    }

    #[test]
    fn partial_effects_land_before_failure() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/app/backend")).unwrap();
        let runner = ScriptedCommandRunner::npm_like(Arc::new(fs.clone()))
            .fails("mongoose", "network unreachable");

        let err = runner
            .run(Path::new("/app/backend"), "npm install mongoose")
            .unwrap_err();

        assert!(err.to_string().contains("network unreachable"));
        assert!(fs.exists(Path::new("/app/backend/node_modules")));
    }

    #[test]
    fn npm_like_init_writes_manifest() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/app/client")).unwrap();
        let runner = ScriptedCommandRunner::npm_like(Arc::new(fs.clone()));

        runner.run(Path::new("/app/client"), "npm init -y").unwrap();
        assert!(
            fs.contents(Path::new("/app/client/package.json"))
                .unwrap()
                .contains("\"version\"")
        );
    }
}
