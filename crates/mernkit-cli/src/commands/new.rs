//! Implementation of the `mernkit new` command.
//!
//! Responsibility: turn CLI arguments, prompts and config defaults into a
//! `ProjectConfig`, ask the planner for a plan, run it in a provisioning
//! session, and display the outcome. No provisioning logic lives here.

use std::io::IsTerminal as _;

use serde::Serialize;
use tracing::{debug, info, instrument};

use mernkit_adapters::{LocalFilesystem, MernPlanner, ShellCommandRunner};
use mernkit_core::{
    application::{CommitSummary, ProjectPlanner, ProvisioningSession, SessionFailure},
    domain::{
        Bundler as CoreBundler, CssFramework as CoreCss, Orm as CoreOrm, ProjectConfig,
        ProvisioningPlan, RollbackReport, validate_project_name,
    },
};

use crate::{
    cli::{Bundler, Css, NewArgs, Orm},
    config::{AppConfig, Defaults},
    error::{CliError, CliResult},
    output::OutputManager,
    prompt,
};

/// Execute the `mernkit new` command.
///
/// Dispatch sequence:
/// 1. Resolve every choice (flag, then prompt, then config default)
/// 2. Build the plan under the current directory
/// 3. Early-exit if `--dry-run`
/// 4. Confirm with user when prompting
/// 5. Run the plan in a provisioning session
/// 6. Print next steps, or hand the rollback report to the error path
#[instrument(skip_all, fields(project = args.name.as_deref().unwrap_or("")))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let interactive = wants_prompts(&args);

    // 1. Resolve choices
    let project = resolve_project(&args, &config.defaults, interactive)?;
    debug!(
        bundler = %project.bundler(),
        css = %project.css(),
        orm = %project.orm(),
        testing = project.testing(),
        "Project resolved"
    );

    // 2. Plan
    let base = std::env::current_dir()?;
    let root = MernPlanner::root_for(&project, &base)?;
    let plan = MernPlanner::new().plan(&project, root)?;

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        return show_plan(&project, &plan, &output);
    }

    // 4. Confirm
    if interactive && !output.is_quiet() {
        show_configuration(&project, &plan, &output)?;
        if !prompt::confirm("Create project?", true)? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Provision
    let runner = if output.is_quiet() || output.is_json() {
        ShellCommandRunner::new().quiet()
    } else {
        ShellCommandRunner::new()
    };
    let mut session = ProvisioningSession::new(Box::new(LocalFilesystem::new()), Box::new(runner))
        .with_retry_policy(config.rollback.retry_policy())
        .with_settle_delay(config.rollback.settle_delay());

    output.header(&format!("Creating '{}'...", project.name()))?;
    info!(
        project = %project.name(),
        root = %plan.root(),
        steps = plan.len(),
        "Provisioning started"
    );

    match session.run(&plan) {
        Ok(summary) => {
            info!(project = %project.name(), "Provisioning committed");
            show_summary(&project, &summary, &output)
        }
        Err(failure) => {
            output.json(&FailureOutput::from(&failure))?;
            Err(failure.into())
        }
    }
}

// ── Choice resolution ────────────────────────────────────────────────────────

/// Prompts only make sense on a terminal and when the user did not opt out.
fn wants_prompts(args: &NewArgs) -> bool {
    prompt::available()
        && !args.yes
        && std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal()
}

/// Flag first; otherwise prompt (preselecting the config default) when
/// interactive, else take the config default.
fn resolve_project(
    args: &NewArgs,
    defaults: &Defaults,
    interactive: bool,
) -> CliResult<ProjectConfig> {
    let name = match &args.name {
        Some(name) => name.trim().to_string(),
        None if interactive => prompt::project_name()?,
        None => {
            return Err(CliError::InvalidInput {
                message: "a project name is required when not running interactively".into(),
                source: None,
            });
        }
    };
    validate_project_name(&name)?;

    let bundler = match args.bundler {
        Some(bundler) => convert_bundler(bundler),
        None if interactive => {
            prompt::select("Bundler", &CoreBundler::ALL, defaults.bundler, ToString::to_string)?
        }
        None => defaults.bundler,
    };
    let css = match args.css {
        Some(css) => convert_css(css),
        None if interactive => {
            prompt::select("CSS framework", &CoreCss::ALL, defaults.css, ToString::to_string)?
        }
        None => defaults.css,
    };
    let orm = match args.orm {
        Some(orm) => convert_orm(orm),
        None if interactive => prompt::select("ORM", &CoreOrm::ALL, defaults.orm, orm_label)?,
        None => defaults.orm,
    };
    let testing = match args.testing_flag() {
        Some(testing) => testing,
        None if interactive => prompt::confirm("Add backend testing (mocha, jest)?", defaults.testing)?,
        None => defaults.testing,
    };

    Ok(ProjectConfig::builder(name)
        .bundler(bundler)
        .css(css)
        .orm(orm)
        .testing(testing)
        .build()?)
}

fn orm_label(orm: &CoreOrm) -> String {
    orm.label().to_string()
}

// ── Type conversions CLI → core ───────────────────────────────────────────────

fn convert_bundler(bundler: Bundler) -> CoreBundler {
    match bundler {
        Bundler::Vite => CoreBundler::Vite,
        Bundler::Webpack => CoreBundler::Webpack,
    }
}

fn convert_css(css: Css) -> CoreCss {
    match css {
        Css::Tailwind => CoreCss::Tailwind,
        Css::Bootstrap => CoreCss::Bootstrap,
        Css::None => CoreCss::None,
    }
}

fn convert_orm(orm: Orm) -> CoreOrm {
    match orm {
        Orm::Mongoose => CoreOrm::Mongoose,
        Orm::Sequelize => CoreOrm::Sequelize,
        Orm::None => CoreOrm::None,
    }
}

// ── Display ──────────────────────────────────────────────────────────────────

fn show_configuration(
    project: &ProjectConfig,
    plan: &ProvisioningPlan,
    output: &OutputManager,
) -> CliResult<()> {
    output.header(&format!("Project '{}'", project.name()))?;
    output.detail(&format!("Location: {}", plan.root()))?;
    output.detail(&format!("Bundler:  {}", project.bundler()))?;
    output.detail(&format!("CSS:      {}", project.css()))?;
    output.detail(&format!("ORM:      {}", project.orm()))?;
    output.detail(&format!(
        "Testing:  {}",
        if project.testing() { "yes" } else { "no" }
    ))?;
    Ok(())
}

#[derive(Serialize)]
struct DryRunOutput<'a> {
    dry_run: bool,
    project: &'a ProjectConfig,
    plan: &'a ProvisioningPlan,
}

fn show_plan(
    project: &ProjectConfig,
    plan: &ProvisioningPlan,
    output: &OutputManager,
) -> CliResult<()> {
    output.json(&DryRunOutput {
        dry_run: true,
        project,
        plan,
    })?;

    output.info(&format!(
        "Dry run: would create '{}' at {}",
        project.name(),
        plan.root()
    ))?;
    if plan.root().path().exists() {
        output.warning("That directory already exists; a real run would stop before touching it")?;
    }
    show_configuration(project, plan, output)?;

    output.print("")?;
    output.print(&format!("Plan ({} steps):", plan.len()))?;
    for (i, step) in plan.steps().iter().enumerate() {
        output.detail(&format!("{:>2}. {}", i + 1, step.describe()))?;
    }

    if !plan.dependency_trees().is_empty() {
        output.print("")?;
        output.print("On failure, rollback also removes:")?;
        for tree in plan.dependency_trees() {
            output.detail(&tree.display().to_string())?;
        }
    }
    Ok(())
}

fn show_summary(
    project: &ProjectConfig,
    summary: &CommitSummary,
    output: &OutputManager,
) -> CliResult<()> {
    output.json(summary)?;

    output.success(&format!(
        "Project '{}' created ({} steps)",
        project.name(),
        summary.steps_executed
    ))?;

    if !summary.next_steps.is_empty() {
        output.print("")?;
        output.print("Next steps:")?;
        for line in &summary.next_steps {
            output.print(&format!("  {line}"))?;
        }
    }
    Ok(())
}

/// JSON shape of a failed run; the human rendering lives in `CliError`.
#[derive(Serialize)]
struct FailureOutput<'a> {
    session_id: String,
    error: String,
    rolled_back: bool,
    report: Option<&'a RollbackReport>,
}

impl<'a> From<&'a SessionFailure> for FailureOutput<'a> {
    fn from(failure: &'a SessionFailure) -> Self {
        Self {
            session_id: failure.session_id.to_string(),
            error: failure.error.to_string(),
            rolled_back: failure.rolled_back(),
            report: failure.report.as_ref(),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn new_args(argv: &[&str]) -> NewArgs {
        let cli = Cli::parse_from(["mernkit", "new"].iter().chain(argv));
        match cli.command {
            Commands::New(args) => args,
            other => panic!("expected New command, got {other:?}"),
        }
    }

    #[test]
    fn flags_win_over_defaults() {
        let defaults = Defaults {
            bundler: CoreBundler::Webpack,
            css: CoreCss::Bootstrap,
            orm: CoreOrm::Sequelize,
            testing: true,
        };
        let args = new_args(&["shop", "--bundler", "vite", "--orm", "mongoose", "--no-testing"]);

        let project = resolve_project(&args, &defaults, false).unwrap();
        assert_eq!(project.name(), "shop");
        assert_eq!(project.bundler(), CoreBundler::Vite);
        assert_eq!(project.css(), CoreCss::Bootstrap);
        assert_eq!(project.orm(), CoreOrm::Mongoose);
        assert!(!project.testing());
    }

    #[test]
    fn non_interactive_uses_config_defaults() {
        let defaults = Defaults {
            css: CoreCss::Tailwind,
            testing: true,
            ..Defaults::default()
        };
        let project = resolve_project(&new_args(&["shop", "--yes"]), &defaults, false).unwrap();
        assert_eq!(project.bundler(), CoreBundler::Vite);
        assert_eq!(project.css(), CoreCss::Tailwind);
        assert!(project.testing());
    }

    #[test]
    fn missing_name_without_prompts_is_user_error() {
        let err = resolve_project(&new_args(&[]), &Defaults::default(), false).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn hidden_name_is_rejected() {
        let err =
            resolve_project(&new_args(&[".hidden"]), &Defaults::default(), false).unwrap_err();
        assert!(matches!(err, CliError::InvalidProjectName { .. }));
    }

    #[test]
    fn yes_disables_prompts() {
        assert!(!wants_prompts(&new_args(&["shop", "--yes"])));
    }

    #[test]
    fn orm_choices_name_their_database() {
        let labels: Vec<String> = CoreOrm::ALL.iter().map(orm_label).collect();
        assert_eq!(labels, ["Mongoose (MongoDB)", "Sequelize (SQL)", "None"]);
    }

    #[test]
    fn conversions_cover_every_value() {
        assert_eq!(convert_bundler(Bundler::Webpack), CoreBundler::Webpack);
        assert_eq!(convert_css(Css::Tailwind), CoreCss::Tailwind);
        assert_eq!(convert_css(Css::None), CoreCss::None);
        assert_eq!(convert_orm(Orm::Sequelize), CoreOrm::Sequelize);
        assert_eq!(convert_orm(Orm::None), CoreOrm::None);
    }
}
