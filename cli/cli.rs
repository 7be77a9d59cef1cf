mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::{Path, PathBuf};
use std::process;

use cli_args::{Cli, Commands, ExportArgs};
use repoexport_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = match core_err {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::InvalidArgument(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(AppError::DirCreation { .. }) => 2,
                Some(AppError::WalkDir(_)) => 2,
                Some(AppError::DataLoading(_)) => 2,
                Some(AppError::JsonSerialize(_)) => 6,
                Some(AppError::YamlError(_)) => 6,
                Some(_) => 1,
                None => 1,
            };

            // Fatal errors are always reported, even in quiet mode.
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        Some(Commands::Plan(args)) => {
            log::debug!("Executing 'plan' command...");
            commands::plan::handle_plan_command(args)?;
        }
        Some(Commands::Completion(args)) => {
            log::debug!("Executing 'completion' command...");
            commands::completion::handle_completion_command(&args)?;
        }
        None => match cli.project_path {
            Some(project_path) => {
                log::debug!("Executing export...");
                commands::export::handle_export_command(&project_path, &cli.export, quiet)?;
            }
            None => {
                Cli::command().print_help()?;
                anyhow::bail!(AppError::InvalidArgument(
                    "PROJECT_PATH is required".to_string()
                ));
            }
        },
    }
    Ok(())
}

fn merge_config_with_cli_overrides(mut config: Config, args: &ExportArgs) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(path) = &args.output.output {
        config.output.path = path.clone();
    }
    if let Some(path) = &args.output.large_files {
        config.output.large_files_path = path.clone();
    }
    if let Some(path) = &args.output.preamble {
        config.output.preamble_file = Some(path.clone());
    }

    if let Some(path) = &args.exclusion.exclusion_patterns {
        config.exclude.patterns_file = Some(path.clone());
    }
    if let Some(path) = &args.exclusion.fallback_ignore {
        config.general.fallback_ignore_file = Some(path.clone());
    }
    if args.exclusion.no_gitignore {
        config.general.use_gitignore = false;
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

pub fn load_config_for_command(project_root: &Path, args: &ExportArgs) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        args.project_config.config.as_ref(),
        args.project_config.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    Ok(merge_config_with_cli_overrides(config, args))
}

/// Directory holding the running executable; a shared exclusion list may be
/// installed there.
pub fn tool_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
