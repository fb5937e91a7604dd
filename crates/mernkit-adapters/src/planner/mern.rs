//! MERN project planner.
//!
//! Turns a [`ProjectConfig`] into the ordered step list the engine runs.
//! Order matters twice: every file's directory is created (or produced by a
//! command) before the file, and the root is always the first step.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use mernkit_core::{
    application::ports::ProjectPlanner,
    domain::{
        Bundler, CssFramework, DomainError, ExternalCommand, Orm, ProjectConfig, ProjectRoot,
        ProvisioningPlan, Step,
    },
};

use super::templates;

/// Directories created up front, relative to the root. `""` is the root.
pub const PROJECT_DIRECTORIES: [&str; 6] = [
    "",
    "client",
    "backend",
    "backend/controllers",
    "backend/routes",
    "backend/models",
];

/// Dependency trees left behind by package installs.
pub const DEPENDENCY_TREES: [&str; 2] = ["client/node_modules", "backend/node_modules"];

/// Planner for a React client plus Express backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MernPlanner;

impl MernPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Root for `config` under `base` (usually the working directory).
    pub fn root_for(config: &ProjectConfig, base: &Path) -> Result<ProjectRoot, DomainError> {
        ProjectRoot::new(base.join(config.name()))
    }
}

impl ProjectPlanner for MernPlanner {
    #[instrument(skip_all, fields(project = %config.name(), root = %root))]
    fn plan(
        &self,
        config: &ProjectConfig,
        root: ProjectRoot,
    ) -> Result<ProvisioningPlan, DomainError> {
        config.validate()?;

        let mut builder = PlanBuilder::new(root);
        for dir in PROJECT_DIRECTORIES {
            builder.dir(dir)?;
        }
        for tree in DEPENDENCY_TREES {
            builder.dependency_tree(tree)?;
        }

        plan_frontend(&mut builder, config)?;
        plan_backend(&mut builder, config)?;

        builder.next_step(format!("cd {}", config.name()));
        builder.next_step(match config.bundler() {
            Bundler::Vite => "Start frontend: cd client && npm run dev",
            Bundler::Webpack => "Start frontend: cd client && npm start",
        });
        builder.next_step("Start backend: cd backend && npm run dev");

        let plan = builder.finish();
        debug!(steps = plan.len(), "Plan ready");
        plan.validate()?;
        Ok(plan)
    }
}

fn plan_frontend(b: &mut PlanBuilder, config: &ProjectConfig) -> Result<(), DomainError> {
    const CLIENT: &str = "client";

    match config.bundler() {
        Bundler::Vite => {
            b.command(CLIENT, "npm create vite@latest . -- --template react", &[
                "client/package.json",
            ])?;
            b.install(CLIENT, "npm install", &["client/package-lock.json"])?;
        }
        Bundler::Webpack => {
            b.command(CLIENT, "npm init -y", &["client/package.json"])?;
            b.install(
                CLIENT,
                "npm install --save-dev webpack webpack-cli webpack-dev-server \
                 html-webpack-plugin @babel/core babel-loader @babel/preset-env \
                 @babel/preset-react css-loader style-loader",
                &["client/package-lock.json"],
            )?;
            b.install(CLIENT, "npm install react react-dom", &[])?;
            b.file("client/webpack.config.js", templates::webpack_config())?;
            b.dir("client/src")?;
            b.dir("client/public")?;
            b.file("client/src/index.js", templates::react_index_js())?;
            b.file("client/src/App.js", templates::react_app_js())?;
            b.file("client/public/index.html", templates::index_html())?;
            b.scripts("client/package.json", [
                ("start", "webpack serve --mode development"),
                ("build", "webpack --mode production"),
            ])?;
        }
    }

    match config.css() {
        CssFramework::Tailwind => {
            match config.bundler() {
                Bundler::Vite => {
                    b.install(CLIENT, "npm install -D tailwindcss @tailwindcss/vite", &[])?;
                    b.file("client/vite.config.js", templates::vite_config_with_tailwind())?;
                    b.file("client/src/index.css", templates::tailwind_css_vite())?;
                }
                Bundler::Webpack => {
                    b.install(
                        CLIENT,
                        "npm install -D tailwindcss postcss autoprefixer postcss-loader",
                        &[],
                    )?;
                    b.file("client/tailwind.config.cjs", templates::tailwind_config_cjs())?;
                    b.file("client/postcss.config.cjs", templates::postcss_config_cjs())?;
                    b.file("client/src/index.css", templates::tailwind_css_postcss())?;
                }
            }
            let entry = format!("client/src/{}", config.bundler().entry_file());
            b.prepend(&entry, templates::CSS_IMPORT)?;
        }
        CssFramework::Bootstrap => b.install(CLIENT, "npm install bootstrap", &[])?,
        CssFramework::None => {}
    }

    Ok(())
}

fn plan_backend(b: &mut PlanBuilder, config: &ProjectConfig) -> Result<(), DomainError> {
    const BACKEND: &str = "backend";

    b.command(BACKEND, "npm init -y", &["backend/package.json"])?;
    b.install(BACKEND, "npm install express dotenv cors", &[
        "backend/package-lock.json",
    ])?;
    b.install(BACKEND, "npm install --save-dev nodemon", &[])?;

    match config.orm() {
        Orm::Mongoose => b.install(BACKEND, "npm install mongoose", &[])?,
        Orm::Sequelize => b.install(BACKEND, "npm install sequelize pg pg-hstore", &[])?,
        Orm::None => {}
    }
    if config.testing() {
        b.install(BACKEND, "npm install --save-dev mocha jest", &[])?;
    }

    b.file("backend/index.js", templates::backend_index_js(config.orm()))?;
    b.file("backend/routes/exampleRoutes.js", templates::example_routes_js())?;
    b.file(
        "backend/controllers/exampleController.js",
        templates::example_controller_js(),
    )?;
    b.file("backend/.env", templates::env_file(config))?;

    let test_script = if config.testing() {
        "jest"
    } else {
        "echo \"Error: no test specified\" && exit 1"
    };
    b.scripts("backend/package.json", [
        ("start", "node index.js"),
        ("dev", "nodemon index.js"),
        ("test", test_script),
    ])
}

/// Resolves relative paths against the root while pushing steps.
struct PlanBuilder {
    plan: ProvisioningPlan,
}

impl PlanBuilder {
    fn new(root: ProjectRoot) -> Self {
        Self {
            plan: ProvisioningPlan::new(root),
        }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, DomainError> {
        self.plan.root().join(relative)
    }

    fn dir(&mut self, relative: &str) -> Result<(), DomainError> {
        let path = self.resolve(relative)?;
        self.plan.push(Step::create_directory(path));
        Ok(())
    }

    fn file(&mut self, relative: &str, content: impl Into<String>) -> Result<(), DomainError> {
        let path = self.resolve(relative)?;
        self.plan.push(Step::write_file(path, content));
        Ok(())
    }

    fn prepend(&mut self, relative: &str, content: &str) -> Result<(), DomainError> {
        let path = self.resolve(relative)?;
        self.plan.push(Step::prepend_to_file(path, content));
        Ok(())
    }

    fn scripts<const N: usize>(
        &mut self,
        package_json: &str,
        scripts: [(&str, &str); N],
    ) -> Result<(), DomainError> {
        let path = self.resolve(package_json)?;
        self.plan.push(Step::update_package_scripts(path, scripts));
        Ok(())
    }

    fn command(&mut self, cwd: &str, command: &str, produces: &[&str]) -> Result<(), DomainError> {
        let cmd = self.external(cwd, command, produces)?;
        self.plan.push(Step::run(cmd));
        Ok(())
    }

    fn install(&mut self, cwd: &str, command: &str, produces: &[&str]) -> Result<(), DomainError> {
        let cmd = self.external(cwd, command, produces)?.installs_dependencies();
        self.plan.push(Step::run(cmd));
        Ok(())
    }

    fn external(
        &self,
        cwd: &str,
        command: &str,
        produces: &[&str],
    ) -> Result<ExternalCommand, DomainError> {
        let mut cmd = ExternalCommand::new(self.resolve(cwd)?, command);
        for product in produces {
            cmd = cmd.producing(self.resolve(product)?);
        }
        Ok(cmd)
    }

    fn dependency_tree(&mut self, relative: &str) -> Result<(), DomainError> {
        let path = self.resolve(relative)?;
        self.plan.add_dependency_tree(path);
        Ok(())
    }

    fn next_step(&mut self, line: impl Into<String>) {
        self.plan.add_next_step(line);
    }

    fn finish(self) -> ProvisioningPlan {
        self.plan
    }
}
