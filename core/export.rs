use crate::classify;
use crate::error::{AppError, Result};
use crate::matcher::{ExclusionMatcher, MatchStrategy};
use crate::sanitize::sanitize;
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_PREAMBLE: &str = "The following text represents a project with code. The structure of the text consists of sections beginning with ----, followed by a single line containing the file path and file name, and then a variable number of lines containing the file contents. The text representing the project ends when the symbols --END-- are encountered. Any further text beyond --END-- is meant to be interpreted as instructions using the aforementioned project as context.";
pub const RECORD_DELIMITER: &str = "----";
pub const END_SENTINEL: &str = "--END--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub relative_path: PathBuf,
}

/// Lists every file below `root` (dot-files included, nothing filtered),
/// sorted by name within each directory.
pub fn enumerate_files(root: &Path) -> Result<Vec<FileEntry>> {
    log::info!("Walking project directory: {}", root.display());
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        let file_type = entry.file_type();
        let is_file = file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        let relative_path = pathdiff::diff_paths(entry.path(), root).ok_or_else(|| {
            AppError::WalkDir(format!(
                "Could not get relative path for: {}",
                entry.path().display()
            ))
        })?;
        log::trace!("Walked path: {}", relative_path.display());
        files.push(FileEntry {
            path: entry.into_path(),
            relative_path,
        });
    }
    log::info!("Directory walk complete. Found {} files.", files.len());
    Ok(files)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Excluded {
        pattern: String,
        strategy: MatchStrategy,
    },
    /// The file is one of this run's own sinks.
    OwnOutput,
    Special,
    Accepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "snake_case"))]
pub enum FileClass {
    Excluded,
    Special,
    Accepted,
}

impl Decision {
    pub fn class(&self) -> FileClass {
        match self {
            Decision::Excluded { .. } | Decision::OwnOutput => FileClass::Excluded,
            Decision::Special => FileClass::Special,
            Decision::Accepted => FileClass::Accepted,
        }
    }
}

impl fmt::Display for FileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileClass::Excluded => "excluded",
            FileClass::Special => "special",
            FileClass::Accepted => "accepted",
        })
    }
}

/// One accepted file, sanitized and ready to append to the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub relative_path: String,
    pub content: String,
    pub large: bool,
}

impl ExportRecord {
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            RECORD_DELIMITER, self.relative_path, self.content
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "camelCase"))]
pub struct ExportSummary {
    pub accepted: usize,
    pub excluded: usize,
    pub special: usize,
    pub large: usize,
    pub bytes_written: u64,
}

impl ExportSummary {
    fn count(&mut self, class: FileClass) {
        match class {
            FileClass::Excluded => self.excluded += 1,
            FileClass::Special => self.special += 1,
            FileClass::Accepted => self.accepted += 1,
        }
    }
}

/// Classification of one file without reading its content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "camelCase"))]
pub struct PlanEntry {
    pub path: String,
    pub class: FileClass,
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub pattern: Option<String>,
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub matched_by: Option<String>,
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub bytes: Option<u64>,
}

pub struct Exporter<'a> {
    root: &'a Path,
    matcher: &'a ExclusionMatcher,
    own_outputs: Vec<PathBuf>,
}

impl<'a> Exporter<'a> {
    pub fn new(root: &'a Path, matcher: &'a ExclusionMatcher) -> Self {
        Self {
            root,
            matcher,
            own_outputs: Vec::new(),
        }
    }

    /// Marks an absolute path as one of this run's sinks so it is never read
    /// back into the export.
    pub fn with_own_output(mut self, path: PathBuf) -> Self {
        self.own_outputs.push(path);
        self
    }

    pub fn classify(&self, entry: &FileEntry) -> Decision {
        if let Some(hit) = self.matcher.explain(&entry.relative_path) {
            return Decision::Excluded {
                pattern: hit.pattern.to_string(),
                strategy: hit.strategy,
            };
        }
        if self.own_outputs.iter().any(|p| p == &entry.path) {
            return Decision::OwnOutput;
        }
        if classify::is_special(&entry.path) {
            return Decision::Special;
        }
        Decision::Accepted
    }

    pub fn plan(&self) -> Result<Vec<PlanEntry>> {
        let entries = enumerate_files(self.root)?;
        Ok(entries
            .iter()
            .map(|entry| {
                let decision = self.classify(entry);
                let (pattern, matched_by) = match &decision {
                    Decision::Excluded { pattern, strategy } => {
                        (Some(pattern.clone()), Some(strategy.to_string()))
                    }
                    Decision::OwnOutput => (None, Some("output".to_string())),
                    _ => (None, None),
                };
                let bytes = match decision {
                    Decision::Accepted => fs::metadata(&entry.path).map(|m| m.len()).ok(),
                    _ => None,
                };
                PlanEntry {
                    path: entry.relative_path.to_string_lossy().into_owned(),
                    class: decision.class(),
                    pattern,
                    matched_by,
                    bytes,
                }
            })
            .collect())
    }

    /// Walks the root and returns a lazy stream of accepted records.
    pub fn records(&self) -> Result<Records<'_, 'a>> {
        let entries = enumerate_files(self.root)?;
        Ok(Records {
            exporter: self,
            entries: entries.into_iter(),
            summary: ExportSummary::default(),
        })
    }

    /// Writes the preamble, one record per accepted file, and the end
    /// sentinel to `output`; large file paths go to `large_files`. Both sinks
    /// are flushed and dropped before returning.
    pub fn export<W: Write, L: Write>(
        &self,
        mut output: W,
        mut large_files: L,
        preamble: Option<&str>,
    ) -> Result<ExportSummary> {
        let preamble = preamble.unwrap_or(DEFAULT_PREAMBLE);
        let mut bytes_written = write_counted(&mut output, &format!("{}\n", preamble))?;

        let mut records = self.records()?;
        for record in records.by_ref() {
            let record = record?;
            bytes_written += write_counted(&mut output, &record.render())?;
            if record.large {
                log::debug!("Flagging large file: {}", record.relative_path);
                writeln!(large_files, "{}", record.relative_path)?;
            }
        }

        bytes_written += write_counted(&mut output, END_SENTINEL)?;
        output.flush()?;
        large_files.flush()?;

        let mut summary = *records.summary();
        summary.bytes_written = bytes_written;
        log::info!(
            "Export complete: {} accepted, {} excluded, {} special, {} large",
            summary.accepted,
            summary.excluded,
            summary.special,
            summary.large
        );
        Ok(summary)
    }

    fn read_record(&self, entry: &FileEntry) -> Result<ExportRecord> {
        let bytes = fs::read(&entry.path).map_err(|e| AppError::FileRead {
            path: entry.path.clone(),
            source: e,
        })?;
        let raw = String::from_utf8(bytes).map_err(|_| {
            AppError::DataLoading(format!(
                "File is not valid UTF-8 text: {}",
                entry.path.display()
            ))
        })?;
        let content = sanitize(&raw);
        let large = classify::is_large(&content);
        Ok(ExportRecord {
            relative_path: entry.relative_path.to_string_lossy().into_owned(),
            content,
            large,
        })
    }
}

/// Iterator over accepted files in walk order. Excluded and special files are
/// counted and skipped without being read.
pub struct Records<'e, 'a> {
    exporter: &'e Exporter<'a>,
    entries: std::vec::IntoIter<FileEntry>,
    summary: ExportSummary,
}

impl Records<'_, '_> {
    pub fn summary(&self) -> &ExportSummary {
        &self.summary
    }
}

impl Iterator for Records<'_, '_> {
    type Item = Result<ExportRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let decision = self.exporter.classify(&entry);
            log::trace!("{}: {:?}", entry.relative_path.display(), decision);
            self.summary.count(decision.class());
            if decision != Decision::Accepted {
                continue;
            }
            let record = self.exporter.read_record(&entry);
            if let Ok(record) = &record {
                if record.large {
                    self.summary.large += 1;
                }
            }
            return Some(record);
        }
        None
    }
}

fn write_counted<W: Write>(sink: &mut W, text: &str) -> Result<u64> {
    sink.write_all(text.as_bytes())?;
    Ok(text.len() as u64)
}
