use std::fmt;

use serde::{Deserialize, Serialize};

/// Composite score (percent) at which a match becomes critical
pub const CRITICAL_THRESHOLD: f64 = 80.0;

/// Composite score (percent) at which a match becomes a warning
pub const WARNING_THRESHOLD: f64 = 60.0;

/// Action tier for a duplicate match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Possible overlap; candidate for future rationalization
    Info,
    /// Likely duplicate; review for consolidation
    Warning,
    /// High duplicate probability; consolidate now
    Critical,
}

impl Severity {
    /// Tier for a composite score in percent; lower bounds are inclusive
    pub fn from_overall(overall: f64) -> Self {
        if overall >= CRITICAL_THRESHOLD {
            Severity::Critical
        } else if overall >= WARNING_THRESHOLD {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Severity::Critical => {
                "High duplicate probability. Immediate consolidation recommended."
            }
            Severity::Warning => "Likely duplicate. Review for consolidation opportunity.",
            Severity::Info => "Possible overlap. Consider for future API rationalization.",
        }
    }

    /// `"<TIER>: <advice>"`
    pub fn recommendation(&self) -> String {
        format!("{}: {}", self.as_str(), self.advice())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recommendation text for a composite score in percent
pub fn recommend(overall: f64) -> String {
    Severity::from_overall(overall).recommendation()
}
