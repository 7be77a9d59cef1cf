use crate::cli_args::PlanArgs;
use crate::output::{self, print_plan_table, write_to_stdout};
use crate::{load_config_for_command, tool_dir};
use anyhow::{Context, Result};
use log;
use repoexport_core::output_formats::{serialize_to_json, serialize_to_yaml};
use repoexport_core::{Config, ExclusionMatcher, Exporter, PlanReport};

pub fn handle_plan_command(args: PlanArgs) -> Result<()> {
    let project_root = Config::determine_project_root(&args.project_path)
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, &args.export)
        .context("Failed to load configuration for plan command")?;

    let sources = config
        .pattern_sources(&project_root, tool_dir().as_deref())
        .context("Failed to load exclusion patterns")?;
    let patterns = sources.flatten();
    let matcher = ExclusionMatcher::new(&patterns);

    let mut exporter = Exporter::new(&project_root, &matcher);
    for sink in [&config.output.path, &config.output.large_files_path] {
        if let Some(path) = output::existing_path(sink) {
            exporter = exporter.with_own_output(path);
        }
    }

    log::debug!("Classifying files...");
    let files = exporter
        .plan()
        .context("Failed to classify project files")?;
    let report = PlanReport::new(
        project_root.display().to_string(),
        patterns.len(),
        files,
    );

    match args.format.as_deref().unwrap_or("table") {
        "json" => write_to_stdout(&serialize_to_json(&report, true)?),
        "yaml" => write_to_stdout(&serialize_to_yaml(&report)?),
        _ => print_plan_table(&report),
    }
}
