use crate::error::{AppError, Result};
use crate::export::PlanEntry;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTotals {
    pub files: usize,
    pub excluded: usize,
    pub special: usize,
    pub accepted: usize,
    pub accepted_bytes: u64,
}

/// Full dry-run report: every enumerated file plus per-class totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub project_root: String,
    pub pattern_count: usize,
    pub totals: PlanTotals,
    pub files: Vec<PlanEntry>,
}

impl PlanReport {
    pub fn new(project_root: String, pattern_count: usize, files: Vec<PlanEntry>) -> Self {
        use crate::export::FileClass;
        let mut totals = PlanTotals {
            files: files.len(),
            ..PlanTotals::default()
        };
        for entry in &files {
            match entry.class {
                FileClass::Excluded => totals.excluded += 1,
                FileClass::Special => totals.special += 1,
                FileClass::Accepted => {
                    totals.accepted += 1;
                    totals.accepted_bytes += entry.bytes.unwrap_or(0);
                }
            }
        }
        Self {
            project_root,
            pattern_count,
            totals,
            files,
        }
    }
}

pub fn serialize_to_json<T: Serialize>(data: &T, pretty: bool) -> Result<String, AppError> {
    if pretty {
        serde_json::to_string_pretty(data).map_err(AppError::JsonSerialize)
    } else {
        serde_json::to_string(data).map_err(AppError::JsonSerialize)
    }
}

pub fn serialize_to_yaml<T: Serialize>(data: &T) -> Result<String, AppError> {
    serde_yml::to_string(data).map_err(AppError::YamlError)
}
