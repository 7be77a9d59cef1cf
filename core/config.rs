use crate::error::{AppError, Result};
use crate::patterns::{self, PatternOrigin, PatternSourceSet};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = ".repoexport.toml";
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";
pub const DEFAULT_EXCLUSION_LIST_FILE: &str = ".exclusionListConfig";
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";
pub const DEFAULT_LARGE_FILES_PATH: &str = "large_files_output.txt";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub exclude: ExcludeConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_true")]
    pub use_gitignore: bool,
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
    /// Consulted only when the project has no ignore file of its own.
    #[serde(default)]
    pub fallback_ignore_file: Option<PathBuf>,
    #[serde(default = "default_exclusion_list_file")]
    pub exclusion_list_file: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_large_files_path")]
    pub large_files_path: PathBuf,
    #[serde(default)]
    pub preamble_file: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ExcludeConfig {
    #[serde(default)]
    pub patterns_file: Option<PathBuf>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}
fn default_exclusion_list_file() -> String {
    DEFAULT_EXCLUSION_LIST_FILE.to_string()
}
fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}
fn default_large_files_path() -> PathBuf {
    PathBuf::from(DEFAULT_LARGE_FILES_PATH)
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            use_gitignore: default_true(),
            ignore_file: default_ignore_file(),
            fallback_ignore_file: None,
            exclusion_list_file: default_exclusion_list_file(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            large_files_path: default_large_files_path(),
            preamble_file: None,
        }
    }
}

/// Expands a leading `~` in a user supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

impl Config {
    pub fn determine_project_root(project_path: &Path) -> Result<PathBuf> {
        let path_to_resolve = expand_path(project_path);
        let canonical = path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })?;
        if !canonical.is_dir() {
            return Err(AppError::InvalidArgument(format!(
                "Project path is not a directory: {}",
                canonical.display()
            )));
        }
        Ok(canonical)
    }

    /// An explicit config path must exist; otherwise the project's default
    /// config file is used when present.
    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&PathBuf>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p) => {
                let path = expand_path(p);
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = project_root.join(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    /// The project's ignore file, or the fallback when the project has none.
    /// Never both.
    pub fn resolve_ignore_path(&self, project_root: &Path) -> Option<PathBuf> {
        if !self.general.use_gitignore {
            log::debug!("Ignore file disabled via configuration.");
            return None;
        }
        let primary = project_root.join(&self.general.ignore_file);
        if primary.is_file() {
            return Some(primary);
        }
        let fallback = self
            .general
            .fallback_ignore_file
            .as_deref()
            .map(expand_path)
            .filter(|p| p.is_file());
        if let Some(path) = &fallback {
            log::debug!(
                "No {} in project, using fallback ignore file: {}",
                self.general.ignore_file,
                path.display()
            );
        }
        fallback
    }

    /// The exclusion list in the project root wins over one installed next
    /// to the executable.
    pub fn resolve_exclusion_list_path(
        &self,
        project_root: &Path,
        tool_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        let in_project = project_root.join(&self.general.exclusion_list_file);
        if in_project.is_file() {
            return Some(in_project);
        }
        tool_dir
            .map(|dir| dir.join(&self.general.exclusion_list_file))
            .filter(|p| p.is_file())
    }

    pub fn pattern_sources(
        &self,
        project_root: &Path,
        tool_dir: Option<&Path>,
    ) -> Result<PatternSourceSet> {
        let mut sources = PatternSourceSet::new();
        if let Some(path) = self.resolve_ignore_path(project_root) {
            sources.add_file(PatternOrigin::IgnoreFile, &path)?;
        }
        if let Some(path) = &self.exclude.patterns_file {
            sources.add_file(PatternOrigin::ExtraPatternFile, &expand_path(path))?;
        }
        if let Some(path) = self.resolve_exclusion_list_path(project_root, tool_dir) {
            sources.add_file(PatternOrigin::ExclusionListConfig, &path)?;
        }
        if !self.exclude.patterns.is_empty() {
            let inline = patterns::parse_patterns(&self.exclude.patterns.join("\n"));
            sources.add_patterns(PatternOrigin::ConfigInline, inline);
        }
        log::info!(
            "Loaded {} exclusion pattern(s) from {} source(s)",
            sources.len(),
            sources.sources().len()
        );
        Ok(sources)
    }

    /// Reads the preamble file if one is configured and present. A missing
    /// file falls back to the default preamble.
    pub fn load_preamble(&self) -> Result<Option<String>> {
        let Some(path) = self.output.preamble_file.as_deref().map(expand_path) else {
            return Ok(None);
        };
        if !path.is_file() {
            log::warn!(
                "Preamble file not found, using default preamble: {}",
                path.display()
            );
            return Ok(None);
        }
        log::debug!("Reading preamble from: {}", path.display());
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| AppError::FileRead { path, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_documented_paths() {
        let config = Config::default();
        assert!(config.general.use_gitignore);
        assert_eq!(config.general.ignore_file, ".gitignore");
        assert_eq!(config.general.exclusion_list_file, ".exclusionListConfig");
        assert_eq!(config.output.path, PathBuf::from("output.txt"));
        assert_eq!(
            config.output.large_files_path,
            PathBuf::from("large_files_output.txt")
        );
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [output]
            path = "out/export.txt"

            [exclude]
            patterns = ["target/", "*.lock"]
            "#,
        )
        .unwrap();
        assert_eq!(config.output.path, PathBuf::from("out/export.txt"));
        assert_eq!(
            config.output.large_files_path,
            PathBuf::from(DEFAULT_LARGE_FILES_PATH)
        );
        assert_eq!(config.exclude.patterns, vec!["target/", "*.lock"]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, "[general]\nuse_gitignre = false\n").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::resolve_config_path(dir.path(), Some(&missing), false).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(
            Config::resolve_config_path(dir.path(), Some(&missing), true)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn primary_ignore_file_wins_over_fallback() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join("global_ignore");
        fs::write(&fallback, "*.bak\n").unwrap();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        let mut config = Config::default();
        config.general.fallback_ignore_file = Some(fallback.clone());
        assert_eq!(config.resolve_ignore_path(&project), Some(fallback));

        fs::write(project.join(".gitignore"), "build/\n").unwrap();
        assert_eq!(
            config.resolve_ignore_path(&project),
            Some(project.join(".gitignore"))
        );

        config.general.use_gitignore = false;
        assert_eq!(config.resolve_ignore_path(&project), None);
    }

    #[test]
    fn exclusion_list_prefers_project_root() {
        let dir = TempDir::new().unwrap();
        let tool_dir = dir.path().join("bin");
        let project = dir.path().join("project");
        fs::create_dir_all(&tool_dir).unwrap();
        fs::create_dir_all(&project).unwrap();
        fs::write(tool_dir.join(DEFAULT_EXCLUSION_LIST_FILE), "vendor/\n").unwrap();

        let config = Config::default();
        assert_eq!(
            config.resolve_exclusion_list_path(&project, Some(&tool_dir)),
            Some(tool_dir.join(DEFAULT_EXCLUSION_LIST_FILE))
        );

        fs::write(project.join(DEFAULT_EXCLUSION_LIST_FILE), ".git\n").unwrap();
        assert_eq!(
            config.resolve_exclusion_list_path(&project, Some(&tool_dir)),
            Some(project.join(DEFAULT_EXCLUSION_LIST_FILE))
        );
    }

    #[test]
    fn merges_every_pattern_source() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "build/\n").unwrap();
        fs::write(root.join(DEFAULT_EXCLUSION_LIST_FILE), "# vcs\n.git\n").unwrap();
        let extra = root.join("extra.txt");
        fs::write(&extra, "*.min.js\n").unwrap();

        let mut config = Config::default();
        config.exclude.patterns_file = Some(extra);
        config.exclude.patterns = vec!["docs/".to_string(), "  ".to_string()];

        let sources = config.pattern_sources(root, None).unwrap();
        assert_eq!(
            sources.flatten(),
            vec!["build/", "*.min.js", ".git", "docs/"]
        );
    }

    #[test]
    fn missing_preamble_file_uses_default() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.preamble_file = Some(dir.path().join("missing.txt"));
        assert_eq!(config.load_preamble().unwrap(), None);

        let preamble = dir.path().join("preamble.txt");
        fs::write(&preamble, "Custom header").unwrap();
        config.output.preamble_file = Some(preamble);
        assert_eq!(
            config.load_preamble().unwrap().as_deref(),
            Some("Custom header")
        );
    }
}
