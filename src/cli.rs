//! Command-line interface for PROJGEN

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pgen",
    version,
    about = "Create new projects from template directories",
    long_about = "PROJGEN copies a template directory to a target location and resolves \
                  placeholder tokens such as %year% or %project_name% in directory names, \
                  file names and README.md content.",
    after_help = "EXAMPLES:
  # Create a project using the saved settings
  pgen create --set project_name=Acme --set order_no=42

  # Override paths for one run
  pgen create --template ./templates/[%project_name%] --target ./out/%year% --set project_name=Acme

  # Show where a project would be created
  pgen create --set project_name=Acme --dry-run

  # Inspect placeholders
  pgen presets
  pgen resolve \"%date_iso%_%project_name%\" --set project_name=Acme

  # Manage settings
  pgen config init
  pgen config add-placeholder client \"Client name\"
  pgen config show"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Settings file path
    #[arg(short, long, global = true, value_name = "FILE", env = "PROJGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a project from the template
    Create(CreateArgs),

    /// List preset placeholders and their current values
    Presets,

    /// Substitute placeholders in a piece of text
    Resolve(ResolveArgs),

    /// Manage settings
    Config(ConfigCommand),

    /// Display version information
    Version,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Value for a user placeholder (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Template root directory (overrides settings)
    #[arg(short, long, value_name = "PATH")]
    pub template: Option<String>,

    /// Target base directory (overrides settings)
    #[arg(long, value_name = "PATH")]
    pub target: Option<String>,

    /// Rewrite README.md content
    #[arg(long, conflicts_with = "no_replace_readme")]
    pub replace_readme: bool,

    /// Leave README.md content untouched
    #[arg(long)]
    pub no_replace_readme: bool,

    /// Print the destination without creating anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Text to resolve
    pub text: String,

    /// Value for a placeholder (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current settings
    Show,

    /// Write default settings
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a settings file
    Validate {
        /// Settings file to validate (defaults to the active one)
        file: Option<PathBuf>,
    },

    /// Print the settings file location
    Path,

    /// Add a user placeholder
    AddPlaceholder {
        /// Key without % delimiters
        key: String,
        /// Label shown when asking for a value
        label: String,
    },

    /// Remove a user placeholder
    RemovePlaceholder {
        /// Key without % delimiters
        key: String,
    },
}
