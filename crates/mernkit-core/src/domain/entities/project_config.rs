use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Bundler, CssFramework, Orm},
};

/// The user's choices for a new project.
///
/// Built through [`ProjectConfig::builder`], which validates the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    name: String,
    bundler: Bundler,
    css: CssFramework,
    orm: Orm,
    testing: bool,
}

impl ProjectConfig {
    pub fn builder(name: impl Into<String>) -> ProjectConfigBuilder {
        ProjectConfigBuilder {
            name: name.into(),
            bundler: Bundler::default(),
            css: CssFramework::default(),
            orm: Orm::default(),
            testing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bundler(&self) -> Bundler {
        self.bundler
    }

    pub fn css(&self) -> CssFramework {
        self.css
    }

    pub fn orm(&self) -> Orm {
        self.orm
    }

    pub fn testing(&self) -> bool {
        self.testing
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_project_name(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ProjectConfigBuilder {
    name: String,
    bundler: Bundler,
    css: CssFramework,
    orm: Orm,
    testing: bool,
}

impl ProjectConfigBuilder {
    pub fn bundler(mut self, bundler: Bundler) -> Self {
        self.bundler = bundler;
        self
    }

    pub fn css(mut self, css: CssFramework) -> Self {
        self.css = css;
        self
    }

    pub fn orm(mut self, orm: Orm) -> Self {
        self.orm = orm;
        self
    }

    pub fn testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    pub fn build(self) -> Result<ProjectConfig, DomainError> {
        let config = ProjectConfig {
            name: self.name.trim().to_string(),
            bundler: self.bundler,
            css: self.css,
            orm: self.orm,
            testing: self.testing,
        };
        config.validate()?;
        Ok(config)
    }
}

/// The name becomes a directory under the working directory, so it must be
/// a single non-hidden path segment.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidProjectName {
        name: name.into(),
        reason: reason.into(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name cannot contain path separators"));
    }
    Ok(())
}
