use crate::error::{AppError, Result};
use log;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a list of exclusion patterns came from. Only used for logging and
/// reporting; matching treats every origin the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOrigin {
    IgnoreFile,
    ExtraPatternFile,
    ExclusionListConfig,
    ConfigInline,
}

impl fmt::Display for PatternOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternOrigin::IgnoreFile => "ignore file",
            PatternOrigin::ExtraPatternFile => "extra pattern file",
            PatternOrigin::ExclusionListConfig => "exclusion list config",
            PatternOrigin::ConfigInline => "config file",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct PatternSource {
    pub origin: PatternOrigin,
    pub location: Option<PathBuf>,
    pub patterns: Vec<String>,
}

/// Ordered collection of pattern lists, one entry per origin.
#[derive(Debug, Clone, Default)]
pub struct PatternSourceSet {
    sources: Vec<PatternSource>,
}

impl PatternSourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path` and records it under `origin`. A missing file adds an
    /// empty source.
    pub fn add_file(&mut self, origin: PatternOrigin, path: &Path) -> Result<&mut Self> {
        let patterns = load_patterns(path)?;
        log::debug!(
            "Loaded {} pattern(s) from {} at {}",
            patterns.len(),
            origin,
            path.display()
        );
        self.sources.push(PatternSource {
            origin,
            location: Some(path.to_path_buf()),
            patterns,
        });
        Ok(self)
    }

    pub fn add_patterns(&mut self, origin: PatternOrigin, patterns: Vec<String>) -> &mut Self {
        log::debug!("Added {} inline pattern(s) from {}", patterns.len(), origin);
        self.sources.push(PatternSource {
            origin,
            location: None,
            patterns,
        });
        self
    }

    pub fn sources(&self) -> &[PatternSource] {
        &self.sources
    }

    /// All patterns from every source, in source order. Origin is dropped.
    pub fn flatten(&self) -> Vec<String> {
        self.sources
            .iter()
            .flat_map(|s| s.patterns.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.iter().map(|s| s.patterns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads a pattern file. Blank lines and `#` comments are dropped; everything
/// else is kept in file order, trimmed but otherwise verbatim.
pub fn load_patterns(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        log::debug!("Pattern file not found, skipping: {}", path.display());
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_patterns(&content))
}

pub fn parse_patterns(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
