use serde::{Deserialize, Serialize};

use super::recommendation::CRITICAL_THRESHOLD;
use super::DuplicateMatch;
use crate::api::ApiSpec;

/// Estimated consolidation saving per duplicate.
///
/// A flat planning figure, not a measured cost.
pub const DEFAULT_SAVINGS_PER_DUPLICATE: u64 = 5000;

const CLEAN_MESSAGE: &str = "No significant duplicates detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Clean,
    DuplicatesFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsolidationPriority {
    High,
    Medium,
}

/// Counters derived from a non-empty duplicate list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_duplicates: usize,
    pub critical_duplicates: usize,
    pub estimated_savings: u64,
    pub consolidation_priority: ConsolidationPriority,
}

/// Duplicate findings for one queried API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub status: ReportStatus,
    /// Set on clean reports only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub api: ApiSpec,
    /// Set when duplicates were found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReportSummary>,
    pub duplicates: Vec<DuplicateMatch>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.status == ReportStatus::Clean
    }
}

/// Builds [`Report`]s from duplicate lists
#[derive(Debug, Clone, Copy)]
pub struct ReportGenerator {
    savings_per_duplicate: u64,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        ReportGenerator::new(DEFAULT_SAVINGS_PER_DUPLICATE)
    }
}

impl ReportGenerator {
    pub fn new(savings_per_duplicate: u64) -> Self {
        ReportGenerator {
            savings_per_duplicate,
        }
    }

    pub fn generate(&self, api: &ApiSpec, duplicates: Vec<DuplicateMatch>) -> Report {
        if duplicates.is_empty() {
            return Report {
                status: ReportStatus::Clean,
                message: Some(CLEAN_MESSAGE.to_string()),
                api: api.clone(),
                summary: None,
                duplicates,
            };
        }

        let total_duplicates = duplicates.len();
        let critical_duplicates = duplicates
            .iter()
            .filter(|d| d.similarity.overall >= CRITICAL_THRESHOLD)
            .count();
        let consolidation_priority = if total_duplicates >= 2 {
            ConsolidationPriority::High
        } else {
            ConsolidationPriority::Medium
        };

        Report {
            status: ReportStatus::DuplicatesFound,
            message: None,
            api: api.clone(),
            summary: Some(ReportSummary {
                total_duplicates,
                critical_duplicates,
                estimated_savings: (total_duplicates as u64)
                    .saturating_mul(self.savings_per_duplicate),
                consolidation_priority,
            }),
            duplicates,
        }
    }
}
