use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use repoexport_core::{
    AppError, ExportSummary, FileClass, LARGE_FILE_MAX_CHARS, LARGE_FILE_MAX_LINES, PlanReport,
};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Creates `path` (and any missing parent directories) for writing. Returns
/// the buffered writer and the canonical path of the new file.
pub fn create_sink(path: &Path) -> Result<(BufWriter<File>, PathBuf)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let file = File::create(path).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve output path {}", path.display()))?;
    Ok((BufWriter::new(file), canonical))
}

/// Canonical form of `path` if it already exists.
pub fn existing_path(path: &Path) -> Option<PathBuf> {
    path.canonicalize().ok()
}

pub fn readable_bytes(bytes: u64) -> String {
    Byte::from_u128(bytes as u128)
        .unwrap_or_default()
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

pub fn print_export_summary(summary: &ExportSummary, output_path: &Path, large_files_path: &Path) {
    println!(
        "{} Project contents written to {} ({})",
        "✅".green(),
        output_path.display().to_string().blue(),
        readable_bytes(summary.bytes_written).dimmed()
    );
    println!(
        "{:<12} {}   {:<12} {}   {:<12} {}",
        "Accepted:".green(),
        summary.accepted.to_string().cyan(),
        "Excluded:".green(),
        summary.excluded.to_string().cyan(),
        "Special:".green(),
        summary.special.to_string().cyan()
    );
    println!(
        "Files with more than {} lines of code or {} characters ({}) listed in {}",
        LARGE_FILE_MAX_LINES,
        LARGE_FILE_MAX_CHARS,
        summary.large.to_string().yellow(),
        large_files_path.display().to_string().blue()
    );
}

pub fn print_plan_table(report: &PlanReport) -> Result<()> {
    println!();
    println!("{}", " Export Plan ".green().bold().underline());
    println!("{:<20} {}", "Project Root:".green(), report.project_root.cyan());
    println!(
        "{:<20} {}",
        "Patterns:".green(),
        report.pattern_count.to_string().cyan()
    );

    if report.files.is_empty() {
        println!("\n{}", "(No files found under project root)".yellow());
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Path").fg(Color::Green),
            Cell::new("Decision").fg(Color::Green),
            Cell::new("Reason").fg(Color::Green),
            Cell::new("Size").fg(Color::Green),
        ]);
        for entry in &report.files {
            let decision_color = match entry.class {
                FileClass::Accepted => Color::Cyan,
                FileClass::Special => Color::Yellow,
                FileClass::Excluded => Color::DarkGrey,
            };
            let reason = match (&entry.matched_by, &entry.pattern) {
                (Some(by), Some(pattern)) => format!("{} `{}`", by, pattern),
                (Some(by), None) => by.clone(),
                _ => String::new(),
            };
            let size = entry.bytes.map(readable_bytes).unwrap_or_default();
            table.add_row(vec![
                Cell::new(&entry.path).fg(Color::Cyan),
                Cell::new(entry.class).fg(decision_color),
                Cell::new(reason).fg(Color::DarkGrey),
                Cell::new(size).set_alignment(comfy_table::CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }

    let totals = &report.totals;
    println!(
        "{:<20} {}",
        "Total Files:".green(),
        totals.files.to_string().cyan()
    );
    println!(
        "{:<20} {} ({})",
        "Accepted:".green(),
        totals.accepted.to_string().cyan(),
        readable_bytes(totals.accepted_bytes)
    );
    println!(
        "{:<20} {}",
        "Excluded:".green(),
        totals.excluded.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Special:".green(),
        totals.special.to_string().cyan()
    );
    println!();
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
