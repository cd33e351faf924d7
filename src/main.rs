use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;

use folder_organiser::{
    config::Config,
    executor::PlanExecutor,
    models::{Plan, PlacementRecord},
    normalizer::PlanNormalizer,
    providers::LLMProvider,
    requester::{OpenAiRequester, PlanRequester},
    utils::print_tree,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("folder-organiser")
        .version("0.1.0")
        .about("Organize your files with AI - asks a model for a folder plan and materializes it")
        .subcommand_required(false)
        .subcommand(
            Command::new("organize")
                .about("Request a plan for a directory and create the proposed folders")
                .arg(
                    Arg::new("directory")
                        .help("Source directory to organize")
                        .index(1),
                )
                .arg(
                    Arg::new("dest")
                        .long("dest")
                        .help("Destination root for the organized folders"),
                )
                .arg(
                    Arg::new("goal")
                        .long("goal")
                        .help("Free-text description of the organization goal"),
                )
                .arg(
                    Arg::new("plan-file")
                        .long("plan-file")
                        .default_value("plan.json")
                        .help("Where to save the normalized plan"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Stop after saving the plan, without creating directories")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("show-tree")
                        .long("show-tree")
                        .help("Show the current directory tree before organizing")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("strict-json")
                        .long("strict-json")
                        .help("Fail on a double-encoded response that cannot be unwrapped")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .help("Suppress per-entry progress output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Execute a previously saved plan without contacting the model")
                .arg(
                    Arg::new("plan")
                        .help("Path to a saved plan file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("dest")
                        .long("dest")
                        .help("Destination root for the organized folders"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .help("Suppress per-entry progress output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration management")
                .subcommand(Command::new("edit").about("Edit the configuration interactively"))
                .subcommand(Command::new("show").about("Show current configuration"))
                .subcommand(Command::new("reset").about("Reset configuration")),
        )
        .arg(
            Arg::new("directory")
                .help("Source directory to organize (default mode)")
                .index(1),
        )
        .arg(
            Arg::new("dest")
                .long("dest")
                .help("Destination root for the organized folders"),
        )
        .arg(
            Arg::new("goal")
                .long("goal")
                .help("Free-text description of the organization goal"),
        )
        .arg(
            Arg::new("plan-file")
                .long("plan-file")
                .default_value("plan.json")
                .help("Where to save the normalized plan"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Stop after saving the plan, without creating directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-tree")
                .long("show-tree")
                .help("Show the current directory tree before organizing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict-json")
                .long("strict-json")
                .help("Fail on a double-encoded response that cannot be unwrapped")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress per-entry progress output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("organize", sub_matches)) => {
            run_organize_command(sub_matches).await?;
        }
        Some(("apply", sub_matches)) => {
            run_apply_command(sub_matches)?;
        }
        Some(("config", sub_matches)) => {
            run_config_command(sub_matches).await?;
        }
        None => {
            if matches.get_one::<String>("directory").is_some() {
                run_organize_command(&matches).await?;
            } else {
                println!("{}", "🤖 AI Folder Organizer".cyan().bold());
                println!("Use 'tidy --help' for usage information");
                println!("Quick start: tidy <directory>");
            }
        }
        _ => unreachable!(),
    }

    Ok(())
}

fn prompt_for(label: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .interact_text()?;
    Ok(value.trim().to_string())
}

async fn run_organize_command(matches: &clap::ArgMatches) -> Result<()> {
    let source = match matches.get_one::<String>("directory") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(prompt_for("Folder to organize")?),
    };

    if !source.exists() || !source.is_dir() {
        eprintln!(
            "{}: Not an existing directory: {}",
            "Error".red().bold(),
            source.display()
        );
        std::process::exit(1);
    }

    let dest = match matches.get_one::<String>("dest") {
        Some(dest) => PathBuf::from(dest),
        None => PathBuf::from(prompt_for("Destination folder")?),
    };

    let goal = match matches.get_one::<String>("goal") {
        Some(goal) => goal.clone(),
        None => prompt_for("Describe your organization goal")?,
    };

    println!("{}", "🤖 AI Folder Organizer".cyan().bold());
    println!(
        "Source: {}  →  Destination: {}\n",
        source.display().to_string().yellow(),
        dest.display().to_string().yellow()
    );

    if matches.get_flag("show-tree") {
        println!("{}", "Current Directory Structure:".green().bold());
        print_tree(&source, "", true);
        println!();
    }

    let plan_file = PathBuf::from(
        matches
            .get_one::<String>("plan-file")
            .map(String::as_str)
            .unwrap_or("plan.json"),
    );
    let strict_json = matches.get_flag("strict-json");
    let verbose = !matches.get_flag("quiet");
    let dry_run = matches.get_flag("dry-run");

    match run_organizer(&source, &dest, &goal, &plan_file, strict_json, verbose, dry_run).await {
        Ok(_) => {
            println!("\n{}", "🎉 Folder organization completed!".green().bold());
        }
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);

            if e.to_string().contains("OPENAI_API_KEY") {
                eprintln!("\n{}", "💡 Tip: Make sure to set your API key:".yellow());
                eprintln!("  export OPENAI_API_KEY=your_key_here");
            }

            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run_organizer(
    source: &PathBuf,
    dest: &PathBuf,
    goal: &str,
    plan_file: &PathBuf,
    strict_json: bool,
    verbose: bool,
    dry_run: bool,
) -> Result<()> {
    println!("{}", "Setting up AI provider...".green());
    let provider = LLMProvider::new().await?;
    println!(
        "Using: {} with model {}\n",
        provider.get_provider().to_string().cyan(),
        provider.get_model_name().yellow()
    );

    let requester = OpenAiRequester::new(
        LLMProvider::api_key()?,
        provider.get_model_name().to_string(),
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Waiting for the model's plan...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let raw = requester.request_plan(source, dest, goal).await;
    spinner.finish_and_clear();
    let raw = raw?;

    let normalizer = PlanNormalizer::new(strict_json, verbose);
    let plan = normalizer.normalize(&raw)?;

    plan.save(plan_file)?;
    println!("Plan saved to {}", plan_file.display().to_string().yellow());

    if dry_run {
        println!("{}", "Dry run: skipping directory creation.".yellow());
        return Ok(());
    }

    let executor = PlanExecutor::new(verbose);
    let log = executor.execute(&plan, dest)?;
    print_summary(&log);

    Ok(())
}

fn run_apply_command(matches: &clap::ArgMatches) -> Result<()> {
    let plan_path = PathBuf::from(matches.get_one::<String>("plan").unwrap());
    let dest = match matches.get_one::<String>("dest") {
        Some(dest) => PathBuf::from(dest),
        None => PathBuf::from(prompt_for("Destination folder")?),
    };
    let verbose = !matches.get_flag("quiet");

    let plan = Plan::load(&plan_path)?;
    println!(
        "Applying plan {} to {}\n",
        plan_path.display().to_string().yellow(),
        dest.display().to_string().yellow()
    );

    let executor = PlanExecutor::new(verbose);
    match executor.execute(&plan, &dest) {
        Ok(log) => {
            print_summary(&log);
            println!("\n{}", "🎉 Plan applied!".green().bold());
        }
        Err(e) => {
            eprintln!("\n{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(log: &[PlacementRecord]) {
    let dirs = log
        .iter()
        .filter(|r| matches!(r, PlacementRecord::DirCreated(_)))
        .count();
    let files = log.len() - dirs;
    println!(
        "\nCreated {} directories, planned {} file placements",
        dirs.to_string().green(),
        files.to_string().green()
    );
}

async fn run_config_command(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("edit", _)) => {
            config_edit().await?;
        }
        Some(("show", _)) => {
            config_show()?;
        }
        Some(("reset", _)) => {
            config_reset()?;
        }
        None => {
            println!("{}", "Configuration Management".cyan().bold());
            println!("Available commands:");
            println!("  edit  - Edit configuration interactively");
            println!("  show  - Show current configuration");
            println!("  reset - Reset configuration");
            println!("\nUse 'tidy config --help' for more information");
        }
        _ => unreachable!(),
    }

    Ok(())
}

async fn config_edit() -> Result<()> {
    println!("{}", "🔧 Configuration Editor".cyan().bold());

    let provider = LLMProvider::new_interactive().await?;

    let config = Config {
        provider: provider.get_provider().clone(),
        model_name: provider.get_model_name().to_string(),
    };

    config.save()?;
    println!("{}", "✅ Configuration updated successfully!".green().bold());

    Ok(())
}

fn config_show() -> Result<()> {
    println!("{}", "📋 Current Configuration".cyan().bold());

    match Config::load()? {
        Some(config) => {
            println!("Provider: {}", config.provider.to_string().green());
            println!("Model: {}", config.model_name.green());

            let config_path = Config::get_config_file_path()?;
            println!("Config file: {}", config_path.display().to_string().yellow());
        }
        None => {
            println!(
                "{}",
                "No configuration found. Run 'tidy config edit' to create one.".yellow()
            );
        }
    }

    Ok(())
}

fn config_reset() -> Result<()> {
    use dialoguer::Confirm;

    let config_path = Config::get_config_file_path()?;

    if !config_path.exists() {
        println!("{}", "No configuration file found.".yellow());
        return Ok(());
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Are you sure you want to reset the configuration?")
        .default(false)
        .interact()?;

    if confirmed {
        std::fs::remove_file(&config_path)?;
        println!("{}", "✅ Configuration reset successfully!".green().bold());
        println!("Next time you organize a folder, you'll be prompted to select a model.");
    } else {
        println!("Configuration reset cancelled.");
    }

    Ok(())
}
