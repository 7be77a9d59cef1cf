pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod matcher;
#[cfg(feature = "serde_support")]
pub mod output_formats;
pub mod patterns;
pub mod sanitize;

pub use classify::{LARGE_FILE_MAX_CHARS, LARGE_FILE_MAX_LINES, is_large, is_special};
pub use config::Config;
pub use error::{AppError, Result};
pub use export::{
    DEFAULT_PREAMBLE, Decision, END_SENTINEL, ExportRecord, ExportSummary, Exporter, FileClass,
    FileEntry, PlanEntry, enumerate_files,
};
pub use matcher::{ExclusionMatcher, MatchStrategy, PatternMatch, is_excluded};
#[cfg(feature = "serde_support")]
pub use output_formats::{PlanReport, PlanTotals};
pub use patterns::{PatternOrigin, PatternSource, PatternSourceSet, load_patterns};
pub use sanitize::sanitize;
