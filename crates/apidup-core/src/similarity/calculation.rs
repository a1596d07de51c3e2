use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use crate::api::ApiSpec;

/// Token that replaces every `{param}` / `:param` path segment
pub const PARAM_TOKEN: &str = "PARAM";

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`; 0.0 when either set is empty
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Normalized segment set of a URL template.
///
/// Empty segments are dropped, any segment starting with `v` counts as a
/// version marker and is dropped too (so `/videos` loses its segment),
/// placeholders become [`PARAM_TOKEN`]. Segment order is not kept.
pub fn path_segments(path: &str) -> HashSet<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| !segment.starts_with('v'))
        .map(|segment| {
            if segment.starts_with('{') || segment.starts_with(':') {
                PARAM_TOKEN
            } else {
                segment
            }
        })
        .collect()
}

/// Structural similarity of two URL templates (0.0-1.0)
pub fn path_similarity(path_a: &str, path_b: &str) -> f64 {
    jaccard(&path_segments(path_a), &path_segments(path_b))
}

/// Method, domain and parameter overlap (0.0-1.0)
///
/// - +0.3 when the methods are equal, including two empty methods
/// - +0.4 when both domains are set and equal; two empty domains never match
/// - +0.3 × Jaccard overlap of the parameter names, when both sets are non-empty
pub fn structural_similarity(a: &ApiSpec, b: &ApiSpec) -> f64 {
    let mut score = 0.0;

    if a.method == b.method {
        score += 0.3;
    }

    if !a.domain.is_empty() && a.domain == b.domain {
        score += 0.4;
    }

    score += 0.3 * set_overlap(&a.parameters, &b.parameters);

    score
}

/// Overlap of response-schema field names (0.0-1.0); field types are ignored
pub fn behavioral_similarity(
    schema_a: &BTreeMap<String, String>,
    schema_b: &BTreeMap<String, String>,
) -> f64 {
    let keys_a: HashSet<&str> = schema_a.keys().map(String::as_str).collect();
    let keys_b: HashSet<&str> = schema_b.keys().map(String::as_str).collect();
    jaccard(&keys_a, &keys_b)
}

fn set_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    jaccard(&a, &b)
}
