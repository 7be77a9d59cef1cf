use crate::cli_args::ExportArgs;
use crate::output;
use crate::{load_config_for_command, tool_dir};
use anyhow::{Context, Result};
use log;
use repoexport_core::{Config, ExclusionMatcher, Exporter};
use std::path::Path;

pub fn handle_export_command(project_path: &Path, args: &ExportArgs, quiet: bool) -> Result<()> {
    let project_root =
        Config::determine_project_root(project_path).context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config =
        load_config_for_command(&project_root, args).context("Failed to load configuration")?;

    let sources = config
        .pattern_sources(&project_root, tool_dir().as_deref())
        .context("Failed to load exclusion patterns")?;
    let matcher = ExclusionMatcher::new(&sources.flatten());

    let preamble = config
        .load_preamble()
        .context("Failed to read preamble file")?;

    let (output_sink, output_path) = output::create_sink(&config.output.path)
        .with_context(|| format!("Failed to open output file {}", config.output.path.display()))?;
    let (large_sink, large_path) = output::create_sink(&config.output.large_files_path)
        .with_context(|| {
            format!(
                "Failed to open large file report {}",
                config.output.large_files_path.display()
            )
        })?;

    let summary = Exporter::new(&project_root, &matcher)
        .with_own_output(output_path)
        .with_own_output(large_path)
        .export(output_sink, large_sink, preamble.as_deref())
        .with_context(|| format!("Failed to export project {}", project_root.display()))?;

    if !quiet {
        output::print_export_summary(
            &summary,
            &config.output.path,
            &config.output.large_files_path,
        );
    }
    Ok(())
}
