//! API catalogs: file loading and the in-memory database
//!
//! A catalog file is a JSON or YAML list of already-normalized API records,
//! either at the top level or under an `apis` key. Translating raw OpenAPI
//! documents into this shape is left to upstream tooling.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::api::{normalize, ApiSpec, RawApiSpec};
use crate::error::{ApidupError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<RawApiSpec>),
    Wrapped { apis: Vec<RawApiSpec> },
}

impl CatalogFile {
    fn into_records(self) -> Vec<RawApiSpec> {
        match self {
            CatalogFile::List(records) | CatalogFile::Wrapped { apis: records } => records,
        }
    }
}

/// Read raw API records from a `.json`, `.yaml` or `.yml` catalog file
pub fn load_catalog(path: &Path) -> Result<Vec<RawApiSpec>> {
    if !path.is_file() {
        return Err(ApidupError::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );

    let parsed: CatalogFile = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| invalid_catalog(path, e))?
    } else {
        serde_json::from_str(&content).map_err(|e| invalid_catalog(path, e))?
    };

    let records = parsed.into_records();
    tracing::debug!(path = %path.display(), records = records.len(), "catalog_loaded");
    Ok(records)
}

/// Load a catalog file straight into an [`ApiDatabase`]
pub fn load_database(path: &Path) -> Result<ApiDatabase> {
    ApiDatabase::from_raw(load_catalog(path)?)
}

fn invalid_catalog(path: &Path, error: impl std::fmt::Display) -> ApidupError {
    ApidupError::InvalidCatalog {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Registered API definitions, in registration order.
///
/// Ids are unique among the entries; anonymous entries are always accepted.
/// The database is owned by the caller and handed to the duplicate finder
/// by reference.
#[derive(Debug, Clone, Default)]
pub struct ApiDatabase {
    specs: Vec<ApiSpec>,
}

impl ApiDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and register every record, in order
    pub fn from_raw(records: impl IntoIterator<Item = RawApiSpec>) -> Result<Self> {
        let mut database = ApiDatabase::new();
        for raw in records {
            database.add(normalize(raw))?;
        }
        Ok(database)
    }

    /// Register a spec; fails if another entry already uses its id
    pub fn add(&mut self, spec: ApiSpec) -> Result<()> {
        if let Some(id) = &spec.id {
            if self.get(id).is_some() {
                return Err(ApidupError::DuplicateId { id: id.clone() });
            }
        }
        tracing::trace!(api = %spec, "api_registered");
        self.specs.push(spec);
        Ok(())
    }

    /// Normalize and register a raw record
    pub fn add_raw(&mut self, raw: RawApiSpec) -> Result<()> {
        self.add(normalize(raw))
    }

    pub fn get(&self, id: &str) -> Option<&ApiSpec> {
        self.specs.iter().find(|spec| spec.id.as_deref() == Some(id))
    }

    /// Look up a spec by id, failing with `SpecNotFound`
    pub fn require(&self, id: &str) -> Result<&ApiSpec> {
        self.get(id).ok_or_else(|| ApidupError::SpecNotFound { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApiSpec> {
        self.specs.iter()
    }

    pub fn specs(&self) -> &[ApiSpec] {
        &self.specs
    }
}

impl<'a> IntoIterator for &'a ApiDatabase {
    type Item = &'a ApiSpec;
    type IntoIter = std::slice::Iter<'a, ApiSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
