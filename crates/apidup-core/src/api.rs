//! API definition records and feature normalization
//!
//! Catalog entries arrive as [`RawApiSpec`] records where every field is
//! optional. [`normalize`] turns them into [`ApiSpec`] values with every
//! field populated so the similarity calculators never see a missing key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An API definition as it appears in a catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawApiSpec {
    /// Identifier, accepted as a string or an integer
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Vec<String>>,
    pub response_schema: Option<serde_json::Map<String, Value>>,
    pub domain: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A normalized API definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSpec {
    /// Unique within a database; `None` marks an anonymous spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// URL template, may contain `{param}` or `:param` placeholders
    #[serde(default)]
    pub path: String,
    /// Upper-cased HTTP verb
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeSet<String>,
    /// Field name to type tag
    #[serde(default)]
    pub response_schema: BTreeMap<String, String>,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ApiSpec {
    /// Name used in logs and cluster output: the id, or `METHOD path`
    pub fn display_name(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.endpoint(),
        }
    }

    /// `METHOD path`, the way endpoints are listed in service descriptions
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path).trim().to_string()
    }
}

impl fmt::Display for ApiSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "[{}] {}", id, self.endpoint()),
            None => write!(f, "{}", self.endpoint()),
        }
    }
}

impl From<RawApiSpec> for ApiSpec {
    fn from(raw: RawApiSpec) -> Self {
        normalize(raw)
    }
}

/// Convert a raw catalog record into a fully-populated [`ApiSpec`]
///
/// Missing fields become empty values. The method is trimmed and
/// upper-cased so verb comparison is case-insensitive for callers.
/// Response schema types that are not plain strings keep their JSON text.
pub fn normalize(raw: RawApiSpec) -> ApiSpec {
    let response_schema = raw
        .response_schema
        .unwrap_or_default()
        .into_iter()
        .map(|(field, ty)| {
            let ty = match ty {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (field, ty)
        })
        .collect();

    ApiSpec {
        id: raw.id,
        path: raw.path.unwrap_or_default(),
        method: raw
            .method
            .map(|m| m.trim().to_uppercase())
            .unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        parameters: raw.parameters.unwrap_or_default().into_iter().collect(),
        response_schema,
        domain: raw.domain.unwrap_or_default(),
        tags: raw.tags.unwrap_or_default().into_iter().collect(),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(
        Option::<IdRepr>::deserialize(deserializer)?.map(|id| match id {
            IdRepr::Text(s) => s,
            IdRepr::Signed(n) => n.to_string(),
            IdRepr::Unsigned(n) => n.to_string(),
        }),
    )
}
