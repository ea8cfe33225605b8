// PROJGEN: Template-based project scaffolding
// Copyright (c) 2024 PROJGEN Core Team

use clap::Parser;
use colored::Colorize;
use projgen::{
    config::{CustomPlaceholder, Settings},
    core::{ProjectCreator, RuntimeValues},
    error::{Error, Result},
    placeholder::{VariableMapping, VariableResolver, PRESETS},
    template::InstantiationReport,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
use cli::{Cli, Commands, ConfigAction, CreateArgs, ResolveArgs};

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        tracing::error!("Error: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Initialize logging system based on verbosity level
/// - 0: warnings and errors only
/// - 1 (-v): INFO
/// - 2 (-vv): DEBUG
/// - 3+ (-vvv): TRACE
fn init_logging(cli: &Cli) -> Result<()> {
    let filter_str = match cli.verbose {
        0 => "warn",
        1 => "projgen=info",
        2 => "projgen=debug",
        _ => "projgen=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::config(format!("logging already initialized: {}", e)))?;

    Ok(())
}

/// Run the CLI command
fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);

    match cli.command {
        Commands::Create(args) => run_create(args, &config_path),
        Commands::Presets => {
            print_presets();
            Ok(())
        }
        Commands::Resolve(args) => run_resolve(args),
        Commands::Config(cmd) => run_config_command(cmd.action, &config_path),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Create a project from settings plus command-line overrides
fn run_create(args: CreateArgs, config_path: &Path) -> Result<()> {
    let mut settings = Settings::load_or_init(config_path)?;

    if let Some(template) = args.template {
        settings.template_path = template;
    }
    if let Some(target) = args.target {
        settings.target_base_path = target;
    }
    if args.replace_readme {
        settings.replace_readme_content = true;
    }
    if args.no_replace_readme {
        settings.replace_readme_content = false;
    }

    let mut values = RuntimeValues::from_assignments(&args.set)?;
    prompt_missing_values(&settings, &mut values)?;

    let creator = ProjectCreator::new();
    if args.dry_run {
        let destination = creator.preview(&settings, &values)?;
        println!("Would create: {}", destination.display());
        return Ok(());
    }

    let report = creator.create(&settings, &values)?;
    print_report(&report);
    Ok(())
}

/// Ask for placeholder values not given on the command line
fn prompt_missing_values(settings: &Settings, values: &mut RuntimeValues) -> Result<()> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(());
    }

    for ph in &settings.user_placeholders {
        if values.get(&ph.key).is_some() {
            continue;
        }
        print!("{}: ", ph.label.bold());
        io::stdout().flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        values.set(&ph.key, line.trim());
    }
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    let resolver = VariableResolver::new();
    let mut user = VariableMapping::new();
    for assignment in &args.set {
        let (key, value) = RuntimeValues::parse_assignment(assignment)?;
        user.insert(key, value)?;
    }

    let mapping = resolver.merged_mapping(&resolver.preset_mapping(), &user);
    println!("{}", projgen::substitute(&args.text, &mapping)?);
    Ok(())
}

fn print_presets() {
    let mapping = VariableResolver::new().preset_mapping();
    for preset in PRESETS {
        let value = mapping.get(preset.token).unwrap_or_default();
        println!(
            "{:<22} {:<28} {}",
            preset.token.cyan(),
            value,
            preset.description.dimmed()
        );
    }
}

/// Run config commands
fn run_config_command(action: ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load_or_init(config_path)?;
            let json = serde_json::to_string_pretty(&settings)
                .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
            println!("{}", json);
            Ok(())
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                return Err(Error::config(format!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                )));
            }
            Settings::default().save(config_path)?;
            println!("Settings written: {}", config_path.display());
            Ok(())
        }
        ConfigAction::Validate { file } => {
            let path = file.unwrap_or_else(|| config_path.to_path_buf());
            let settings = Settings::from_file(&path)?;
            settings.validate()?;
            println!("{}", "Settings are valid".green());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigAction::AddPlaceholder { key, label } => {
            let mut settings = Settings::load_or_init(config_path)?;
            settings.add_placeholder(CustomPlaceholder::new(key.clone(), label))?;
            settings.save(config_path)?;
            println!("Added placeholder %{}%", key);
            Ok(())
        }
        ConfigAction::RemovePlaceholder { key } => {
            let mut settings = Settings::load_or_init(config_path)?;
            if !settings.remove_placeholder(&key) {
                return Err(Error::invalid_input(format!("no placeholder named '{}'", key)));
            }
            settings.save(config_path)?;
            println!("Removed placeholder %{}%", key);
            Ok(())
        }
    }
}

fn print_report(report: &InstantiationReport) {
    println!(
        "{} {}",
        "Project created:".green().bold(),
        report.destination.display()
    );
    println!(
        "  {} files copied, {} files renamed, {} directories renamed, {} README files rewritten",
        report.copy.files,
        report.files_renamed,
        report.directories_renamed,
        report.readmes_rewritten
    );
    for dir in &report.unrenamed_directories {
        println!(
            "  {} {} (access denied)",
            "kept unresolved:".yellow(),
            dir.display()
        );
    }
}

fn print_version() {
    println!("PROJGEN v{}", projgen::VERSION);
    println!("Template-based project scaffolding");
    println!();
    println!("Build Information:");
    println!("  Target: {}", std::env::consts::ARCH);
    println!("  OS: {}", std::env::consts::OS);
}
