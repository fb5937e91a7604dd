//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "mernkit",
    bin_name = "mernkit",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} All-or-nothing MERN project generator",
    long_about = "mernkit creates a MERN project (React client, Express backend) \
                  and installs its dependencies. If any step fails, everything \
                  it created is rolled back.",
    after_help = "EXAMPLES:\n\
        \x20 mernkit new shop\n\
        \x20 mernkit new shop --bundler vite --css tailwind --orm mongoose --testing --yes\n\
        \x20 mernkit new blog --orm sequelize --dry-run\n\
        \x20 mernkit completions bash > /usr/share/bash-completion/completions/mernkit",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new MERN project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 mernkit new shop\n\
            \x20 mernkit new shop --bundler webpack --css bootstrap --yes\n\
            \x20 mernkit new shop --orm mongoose --testing --dry-run"
    )]
    New(NewArgs),

    /// Initialise a mernkit configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 mernkit init           # global config\n\
            \x20 mernkit init --local   # ./mernkit.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 mernkit completions bash > ~/.local/share/bash-completion/completions/mernkit\n\
            \x20 mernkit completions zsh  > ~/.zfunc/_mernkit\n\
            \x20 mernkit completions fish > ~/.config/fish/completions/mernkit.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the mernkit configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 mernkit config get defaults.bundler\n\
            \x20 mernkit config list\n\
            \x20 mernkit config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `mernkit new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name; becomes a directory under the current directory.
    /// Prompted for when omitted in an interactive terminal.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Frontend bundler.
    #[arg(short = 'b', long = "bundler", value_enum, help = "Frontend bundler")]
    pub bundler: Option<Bundler>,

    /// CSS framework.
    #[arg(long = "css", value_enum, help = "CSS framework")]
    pub css: Option<Css>,

    /// Backend ORM / database driver.
    #[arg(long = "orm", value_enum, help = "Backend ORM")]
    pub orm: Option<Orm>,

    /// Install mocha and jest in the backend.
    #[arg(long = "testing", conflicts_with = "no_testing", help = "Add backend testing tools")]
    pub testing: bool,

    /// Do not install backend testing tools.
    #[arg(long = "no-testing", help = "Skip backend testing tools")]
    pub no_testing: bool,

    /// Skip prompts and the confirmation; unset choices come from config.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip prompts and create immediately"
    )]
    pub yes: bool,

    /// Print the plan without touching the filesystem.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

impl NewArgs {
    /// The testing choice given on the command line, if any.
    pub fn testing_flag(&self) -> Option<bool> {
        match (self.testing, self.no_testing) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `mernkit init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `mernkit.toml` in the current directory instead of the global
    /// config location.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `mernkit completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `mernkit config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.bundler`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Supported frontend bundlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Bundler {
    Vite,
    Webpack,
}

/// Supported CSS frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Css {
    /// Also accepted as `tailwindcss`.
    #[value(alias = "tailwindcss")]
    Tailwind,
    Bootstrap,
    None,
}

/// Supported backend ORMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Orm {
    /// MongoDB via mongoose. Also accepted as `mongo`.
    #[value(alias = "mongo")]
    Mongoose,
    /// PostgreSQL via sequelize. Also accepted as `sql`.
    #[value(alias = "sql")]
    Sequelize,
    None,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "mernkit",
            "new",
            "shop",
            "--bundler",
            "webpack",
            "--css",
            "bootstrap",
            "--orm",
            "sequelize",
            "--testing",
            "--yes",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name.as_deref(), Some("shop"));
        assert_eq!(args.bundler, Some(Bundler::Webpack));
        assert_eq!(args.css, Some(Css::Bootstrap));
        assert_eq!(args.orm, Some(Orm::Sequelize));
        assert_eq!(args.testing_flag(), Some(true));
        assert!(args.yes);
    }

    #[test]
    fn name_and_choices_are_optional() {
        let cli = Cli::parse_from(["mernkit", "new"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert!(args.name.is_none());
        assert!(args.bundler.is_none());
        assert_eq!(args.testing_flag(), None);
    }

    #[test]
    fn value_aliases() {
        let cli = Cli::parse_from(["mernkit", "n", "x", "--css", "tailwindcss", "--orm", "mongo"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.css, Some(Css::Tailwind));
        assert_eq!(args.orm, Some(Orm::Mongoose));
    }

    #[test]
    fn testing_flags_conflict() {
        let result = Cli::try_parse_from(["mernkit", "new", "x", "--testing", "--no-testing"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_testing_flag() {
        let cli = Cli::parse_from(["mernkit", "new", "x", "--no-testing"]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.testing_flag(), Some(false));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["mernkit", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_file_is_global() {
        let cli = Cli::parse_from(["mernkit", "config", "list", "--log-file", "run.log"]);
        assert_eq!(
            cli.global.log_file.as_deref(),
            Some(std::path::Path::new("run.log"))
        );
    }
}
