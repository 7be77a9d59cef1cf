use globset::{GlobBuilder, GlobMatcher};
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "snake_case"))]
pub enum MatchStrategy {
    /// The path starts with the pattern text.
    Prefix,
    /// The whole relative path matches the pattern as a glob.
    Glob,
    /// A separator-free glob matched the final path segment.
    BaseName,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchStrategy::Prefix => "prefix",
            MatchStrategy::Glob => "glob",
            MatchStrategy::BaseName => "basename",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub pattern: &'a str,
    pub strategy: MatchStrategy,
}

#[derive(Debug, Clone)]
enum Rule {
    LiteralPrefix(String),
    Glob {
        pattern: String,
        matcher: GlobMatcher,
        base_name: bool,
    },
}

impl Rule {
    fn check(&self, path_str: &str, path: &Path) -> Option<PatternMatch<'_>> {
        match self {
            Rule::LiteralPrefix(prefix) => path_str.starts_with(prefix.as_str()).then_some(
                PatternMatch {
                    pattern: prefix,
                    strategy: MatchStrategy::Prefix,
                },
            ),
            Rule::Glob {
                pattern,
                matcher,
                base_name,
            } => {
                if matcher.is_match(path) {
                    return Some(PatternMatch {
                        pattern,
                        strategy: MatchStrategy::Glob,
                    });
                }
                if *base_name {
                    let file_name = path.file_name()?;
                    if matcher.is_match(file_name) {
                        return Some(PatternMatch {
                            pattern,
                            strategy: MatchStrategy::BaseName,
                        });
                    }
                }
                None
            }
        }
    }
}

/// Decides whether a relative path is excluded by any pattern in a merged
/// pattern set. Each pattern is tried as a literal prefix and as a glob; the
/// first hit wins and there is no negation.
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    rules: Vec<Rule>,
}

impl ExclusionMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut rules = Vec::with_capacity(patterns.len() * 2);
        for pattern in patterns {
            let pattern = pattern.as_ref();
            rules.push(Rule::LiteralPrefix(pattern.to_string()));
            match compile_glob(pattern) {
                Ok(matcher) => rules.push(Rule::Glob {
                    pattern: pattern.to_string(),
                    matcher,
                    base_name: !pattern.contains(is_separator),
                }),
                Err(e) => {
                    log::warn!(
                        "Invalid glob pattern \"{}\", only prefix matching applies: {}",
                        pattern,
                        e
                    );
                }
            }
        }
        log::trace!(
            "Exclusion matcher built with {} rule(s) from {} pattern(s)",
            rules.len(),
            patterns.len()
        );
        Self { rules }
    }

    pub fn is_excluded(&self, relative_path: &Path) -> bool {
        self.explain(relative_path).is_some()
    }

    /// Returns the first rule that excludes `relative_path`, if any.
    pub fn explain(&self, relative_path: &Path) -> Option<PatternMatch<'_>> {
        let path_str = relative_path.to_string_lossy();
        self.rules
            .iter()
            .find_map(|rule| rule.check(&path_str, relative_path))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One-shot form of [`ExclusionMatcher::is_excluded`].
pub fn is_excluded<S: AsRef<str>>(relative_path: &Path, patterns: &[S]) -> bool {
    ExclusionMatcher::new(patterns).is_excluded(relative_path)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    // `*` is allowed to cross separators and leading dots are matched.
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .build()
        .map(|glob| glob.compile_matcher())
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}
