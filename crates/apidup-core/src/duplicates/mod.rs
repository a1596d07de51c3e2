//! Duplicate finding, severity tiers and per-spec reports

mod recommendation;
mod report;

pub use recommendation::{recommend, Severity, CRITICAL_THRESHOLD, WARNING_THRESHOLD};
pub use report::{
    ConsolidationPriority, Report, ReportGenerator, ReportStatus, ReportSummary,
    DEFAULT_SAVINGS_PER_DUPLICATE,
};

use serde::{Deserialize, Serialize};

use crate::api::ApiSpec;
use crate::catalog::ApiDatabase;
use crate::embedding::EmbeddingProvider;
use crate::error::{ApidupError, Result};
use crate::logging::EmbeddingMetrics;
use crate::similarity::{SimilarityEngine, SimilarityScore};

/// Default minimum composite score, as a fraction
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// A database entry that scored at or above the duplicate threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub api: ApiSpec,
    pub similarity: SimilarityScore,
    pub severity: Severity,
    pub recommendation: String,
}

impl DuplicateMatch {
    pub fn new(api: ApiSpec, similarity: SimilarityScore) -> Self {
        let severity = Severity::from_overall(similarity.overall);
        DuplicateMatch {
            api,
            similarity,
            severity,
            recommendation: severity.recommendation(),
        }
    }
}

/// Reject a fraction outside `[0, 1]` (NaN included)
pub fn validate_threshold(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ApidupError::invalid_threshold(name, value))
    }
}

/// Scores query specs against an [`ApiDatabase`].
///
/// The finder holds no database of its own. Its embedding cache lives as
/// long as the finder, so one finder should serve one batch of queries.
pub struct DuplicateFinder<'a> {
    engine: SimilarityEngine<'a>,
    threshold: f64,
}

impl<'a> DuplicateFinder<'a> {
    pub fn new(provider: &'a dyn EmbeddingProvider, threshold: f64) -> Result<Self> {
        validate_threshold("threshold", threshold)?;
        Ok(DuplicateFinder {
            engine: SimilarityEngine::new(provider),
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn metrics(&self) -> &EmbeddingMetrics {
        self.engine.metrics()
    }

    /// Every entry scoring at least the threshold, best first.
    ///
    /// An entry is skipped only when both it and the query carry the same
    /// id. Equal scores keep database order.
    #[tracing::instrument(skip(self, query, database), fields(query = %query.display_name(), candidates = database.len()))]
    pub fn find(&mut self, query: &ApiSpec, database: &ApiDatabase) -> Result<Vec<DuplicateMatch>> {
        let cutoff = self.threshold * 100.0;
        let mut matches = Vec::new();

        for candidate in database {
            if is_same_spec(query, candidate) {
                continue;
            }
            let score = self.engine.score(query, candidate)?;
            if score.overall >= cutoff {
                matches.push(DuplicateMatch::new(candidate.clone(), score));
            }
        }

        // sort_by is stable
        matches.sort_by(|a, b| b.similarity.overall.total_cmp(&a.similarity.overall));
        tracing::debug!(matches = matches.len(), "duplicates_found");
        Ok(matches)
    }

    /// Find duplicates and wrap them in a [`Report`]
    pub fn check(
        &mut self,
        query: &ApiSpec,
        database: &ApiDatabase,
        reports: &ReportGenerator,
    ) -> Result<Report> {
        let duplicates = self.find(query, database)?;
        Ok(reports.generate(query, duplicates))
    }

    /// One report per registered spec, each checked against the rest.
    ///
    /// Descriptions are encoded once, in a single provider batch, before
    /// any pair is scored.
    #[tracing::instrument(skip_all, fields(specs = database.len()))]
    pub fn scan(&mut self, database: &ApiDatabase, reports: &ReportGenerator) -> Result<Vec<Report>> {
        self.engine
            .prime(database.iter().map(|spec| spec.description.as_str()))?;

        let mut out = Vec::with_capacity(database.len());
        for spec in database {
            out.push(self.check(spec, database, reports)?);
        }

        crate::log_embedding_metrics!(self.metrics(), "scan");
        Ok(out)
    }
}

fn is_same_spec(query: &ApiSpec, candidate: &ApiSpec) -> bool {
    matches!((&query.id, &candidate.id), (Some(a), Some(b)) if a == b)
}

/// Scan a whole catalog with a fresh finder
pub fn scan_catalog(
    provider: &dyn EmbeddingProvider,
    database: &ApiDatabase,
    threshold: f64,
    reports: &ReportGenerator,
) -> Result<Vec<Report>> {
    DuplicateFinder::new(provider, threshold)?.scan(database, reports)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::embedding::testing::FixedEmbedder;
    use crate::embedding::HashingEmbedder;

    fn spec(id: Option<&str>, path: &str, description: &str) -> ApiSpec {
        ApiSpec {
            id: id.map(str::to_string),
            path: path.to_string(),
            method: "GET".to_string(),
            description: description.to_string(),
            domain: "user-management".to_string(),
            ..Default::default()
        }
    }

    fn user_database() -> ApiDatabase {
        let mut db = ApiDatabase::new();
        db.add(spec(Some("users-get"), "/api/v1/users/{id}", "Retrieve user"))
            .unwrap();
        db.add(spec(Some("profile-get"), "/api/user/profile/{id}", "Get user profile"))
            .unwrap();
        db.add(spec(Some("orders-list"), "/orders", "List orders"))
            .unwrap();
        db
    }

    #[test]
    fn test_empty_database_returns_nothing() {
        let provider = HashingEmbedder::default();
        let mut finder = DuplicateFinder::new(&provider, 0.0).unwrap();
        let query = spec(Some("q"), "/users", "Retrieve user");

        let matches = finder.find(&query, &ApiDatabase::new()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_zero_threshold_returns_everything_but_self() {
        let provider = HashingEmbedder::default();
        let db = user_database();
        let mut finder = DuplicateFinder::new(&provider, 0.0).unwrap();

        let query = db.require("users-get").unwrap().clone();
        let matches = finder.find(&query, &db).unwrap();

        assert_eq!(matches.len(), 2);
        assert!(matches
            .iter()
            .all(|m| m.api.id.as_deref() != Some("users-get")));
    }

    #[test]
    fn test_results_sorted_descending() {
        let provider = HashingEmbedder::default();
        let db = user_database();
        let mut finder = DuplicateFinder::new(&provider, 0.0).unwrap();

        let query = spec(None, "/api/users/{id}", "Retrieve user");
        let matches = finder.find(&query, &db).unwrap();

        assert_eq!(matches.len(), 3);
        for pair in matches.windows(2) {
            assert!(pair[0].similarity.overall >= pair[1].similarity.overall);
        }
        assert_eq!(matches[0].api.id.as_deref(), Some("users-get"));
    }

    #[test]
    fn test_ties_keep_registration_order() {
        // Empty descriptions keep the provider out of it
        let provider = FixedEmbedder::new(3);
        let mut db = ApiDatabase::new();
        for id in ["c", "a", "b"] {
            db.add(spec(Some(id), "/items/{id}", "")).unwrap();
        }
        let mut finder = DuplicateFinder::new(&provider, 0.0).unwrap();

        let query = spec(Some("q"), "/items/{id}", "");
        let matches = finder.find(&query, &db).unwrap();

        let ids: Vec<_> = matches.iter().filter_map(|m| m.api.id.as_deref()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_anonymous_specs_are_never_skipped() {
        let provider = FixedEmbedder::new(3);
        let mut db = ApiDatabase::new();
        db.add(spec(None, "/items", "")).unwrap();
        let mut finder = DuplicateFinder::new(&provider, 0.0).unwrap();

        let matches = finder.find(&spec(None, "/items", ""), &db).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_threshold_cutoff() {
        let provider = FixedEmbedder::new(3);
        let mut db = ApiDatabase::new();
        // Same path and method, different domain: 0.25 * 1.0 + 0.25 * 0.3
        let mut other = spec(Some("b"), "/items", "");
        other.domain = "billing".to_string();
        db.add(other).unwrap();

        let query = spec(Some("a"), "/items", "");
        let below = DuplicateFinder::new(&provider, 0.32)
            .unwrap()
            .find(&query, &db)
            .unwrap();
        assert_eq!(below.len(), 1);

        let above = DuplicateFinder::new(&provider, 0.33)
            .unwrap()
            .find(&query, &db)
            .unwrap();
        assert!(above.is_empty());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let provider = HashingEmbedder::default();
        for bad in [-0.1, 1.01, f64::NAN] {
            let err = DuplicateFinder::new(&provider, bad).err().unwrap();
            assert!(matches!(err, ApidupError::InvalidThreshold { .. }));
        }
        assert!(DuplicateFinder::new(&provider, 1.0).is_ok());
    }

    #[test]
    fn test_match_carries_recommendation() {
        let provider = FixedEmbedder::new(3);
        let mut db = ApiDatabase::new();
        let mut twin = spec(Some("twin"), "/items/{id}", "");
        twin.parameters = ["id".to_string()].into();
        twin.response_schema = BTreeMap::from([("id".to_string(), "string".to_string())]);
        db.add(twin.clone()).unwrap();

        let mut query = twin.clone();
        query.id = Some("query".to_string());
        let matches = DuplicateFinder::new(&provider, 0.6)
            .unwrap()
            .find(&query, &db)
            .unwrap();

        // No descriptions: everything but the 0.35 semantic share
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity.rounded().overall, 65.0);
        assert_eq!(matches[0].severity, Severity::Warning);
        assert!(matches[0].recommendation.starts_with("WARNING: "));
    }

    #[test]
    fn test_provider_failure_aborts_find() {
        let provider = FixedEmbedder::new(3);
        let db = user_database();
        let mut finder = DuplicateFinder::new(&provider, 0.0).unwrap();

        let query = spec(Some("q"), "/users", "Unknown text");
        assert!(matches!(
            finder.find(&query, &db),
            Err(ApidupError::Embedding { .. })
        ));
    }

    #[test]
    fn test_scan_reports_every_spec_with_one_batch() {
        let provider = FixedEmbedder::new(2)
            .with("Retrieve user", vec![1.0, 0.0])
            .with("Get user profile", vec![0.9, 0.1])
            .with("List orders", vec![0.0, 1.0]);
        let db = user_database();

        let mut finder = DuplicateFinder::new(&provider, 0.5).unwrap();
        let reports = finder.scan(&db, &ReportGenerator::default()).unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].api.id.as_deref(), Some("users-get"));
        // Three descriptions through the default per-item encode_batch
        assert_eq!(provider.calls.get(), 3);
        assert_eq!(finder.metrics().provider_calls(), 1);
    }

    #[test]
    fn test_scan_catalog_empty_database() {
        let provider = HashingEmbedder::default();
        let reports = scan_catalog(
            &provider,
            &ApiDatabase::new(),
            DEFAULT_THRESHOLD,
            &ReportGenerator::default(),
        )
        .unwrap();
        assert!(reports.is_empty());
    }
}
