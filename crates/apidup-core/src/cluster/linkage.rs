use super::{GroupingStrategy, SimilarityMatrix};
use crate::duplicates::validate_threshold;
use crate::error::Result;

/// Agglomerative grouping with average linkage over `1 - similarity`.
///
/// Starting from singletons, the two closest groups are merged as long as
/// their average pairwise distance is strictly below `distance_threshold`,
/// so a threshold of 0.0 keeps even exact twins apart. A threshold of 1.0
/// merges everything into one group. The number of groups falls out of the
/// threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdLinkage {
    distance_threshold: f64,
}

impl ThresholdLinkage {
    fn merges(&self, distance: f64) -> bool {
        distance < self.distance_threshold || self.distance_threshold >= 1.0
    }

    pub fn new(distance_threshold: f64) -> Result<Self> {
        validate_threshold("distance threshold", distance_threshold)?;
        Ok(ThresholdLinkage { distance_threshold })
    }

    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }
}

fn average_distance(matrix: &SimilarityMatrix, a: &[usize], b: &[usize]) -> f64 {
    let mut total = 0.0;
    for &i in a {
        for &j in b {
            total += matrix.distance(i, j);
        }
    }
    total / (a.len() * b.len()) as f64
}

/// Closest pair of groups; earlier pairs win ties
fn closest_pair(matrix: &SimilarityMatrix, groups: &[Vec<usize>]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for a in 0..groups.len() {
        for b in (a + 1)..groups.len() {
            let d = average_distance(matrix, &groups[a], &groups[b]);
            if best.map_or(true, |(_, _, current)| d < current) {
                best = Some((a, b, d));
            }
        }
    }
    best
}

impl GroupingStrategy for ThresholdLinkage {
    fn name(&self) -> &'static str {
        "linkage"
    }

    #[tracing::instrument(skip_all, fields(items = matrix.len(), threshold = self.distance_threshold))]
    fn group(&self, matrix: &SimilarityMatrix) -> Result<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = (0..matrix.len()).map(|i| vec![i]).collect();

        while let Some((a, b, distance)) = closest_pair(matrix, &groups) {
            if !self.merges(distance) {
                break;
            }
            // b > a, so removing b leaves a in place
            let absorbed = groups.remove(b);
            groups[a].extend(absorbed);
            tracing::trace!(distance, groups = groups.len(), "groups_merged");
        }

        let mut labels = vec![0; matrix.len()];
        for (label, members) in groups.iter().enumerate() {
            for &i in members {
                labels[i] = label;
            }
        }
        tracing::debug!(clusters = groups.len(), "linkage_complete");
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::relabel_by_first_appearance;

    fn matrix(values: &[&[f64]]) -> SimilarityMatrix {
        let n = values.len();
        SimilarityMatrix::from_pairs(n, |i, j| Ok(values[i][j])).unwrap()
    }

    fn two_blocks() -> SimilarityMatrix {
        matrix(&[
            &[1.0, 0.9, 0.1, 0.2],
            &[0.9, 1.0, 0.15, 0.1],
            &[0.1, 0.15, 1.0, 0.85],
            &[0.2, 0.1, 0.85, 1.0],
        ])
    }

    fn count(labels: &[usize]) -> usize {
        let mut distinct = labels.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.len()
    }

    #[test]
    fn test_zero_threshold_gives_singletons() {
        let labels = ThresholdLinkage::new(0.0).unwrap().group(&two_blocks()).unwrap();
        assert_eq!(count(&labels), 4);
    }

    #[test]
    fn test_zero_threshold_keeps_twins_apart() {
        let m = matrix(&[&[1.0, 1.0, 0.1], &[1.0, 1.0, 0.1], &[0.1, 0.1, 1.0]]);
        let labels = ThresholdLinkage::new(0.0).unwrap().group(&m).unwrap();
        assert_eq!(relabel_by_first_appearance(&labels), vec![0, 1, 2]);
    }

    #[test]
    fn test_merge_requires_distance_below_threshold() {
        // distance 0-1 is exactly 0.5
        let m = matrix(&[&[1.0, 0.5, 0.0], &[0.5, 1.0, 0.0], &[0.0, 0.0, 1.0]]);
        let at = ThresholdLinkage::new(0.5).unwrap().group(&m).unwrap();
        assert_eq!(count(&at), 3);
        let above = ThresholdLinkage::new(0.6).unwrap().group(&m).unwrap();
        assert_eq!(relabel_by_first_appearance(&above), vec![0, 0, 1]);
    }

    #[test]
    fn test_full_threshold_merges_disjoint_items() {
        let labels = ThresholdLinkage::new(1.0)
            .unwrap()
            .group(&SimilarityMatrix::identity(3))
            .unwrap();
        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_full_threshold_gives_one_cluster() {
        let labels = ThresholdLinkage::new(1.0).unwrap().group(&two_blocks()).unwrap();
        assert_eq!(count(&labels), 1);
    }

    #[test]
    fn test_blocks_separate_at_moderate_threshold() {
        let labels = ThresholdLinkage::new(0.3).unwrap().group(&two_blocks()).unwrap();
        let labels = relabel_by_first_appearance(&labels);
        assert_eq!(labels, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_average_linkage_not_single_linkage() {
        // 0-1 close, 2 close to 1 only: average distance from {0,1} to 2 is 0.55
        let m = matrix(&[&[1.0, 0.9, 0.0], &[0.9, 1.0, 0.9], &[0.0, 0.9, 1.0]]);
        let labels = ThresholdLinkage::new(0.5).unwrap().group(&m).unwrap();
        assert_eq!(relabel_by_first_appearance(&labels), vec![0, 0, 1]);
    }

    #[test]
    fn test_degenerate_matrices() {
        let ones = matrix(&[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]]);
        let zeros = SimilarityMatrix::identity(3);
        let linkage = ThresholdLinkage::new(0.5).unwrap();

        assert_eq!(count(&linkage.group(&ones).unwrap()), 1);
        assert_eq!(count(&linkage.group(&zeros).unwrap()), 3);
    }

    #[test]
    fn test_empty_and_single() {
        let linkage = ThresholdLinkage::new(0.5).unwrap();
        assert!(linkage
            .group(&SimilarityMatrix::identity(0))
            .unwrap()
            .is_empty());
        assert_eq!(linkage.group(&SimilarityMatrix::identity(1)).unwrap(), vec![0]);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(ThresholdLinkage::new(1.5).is_err());
        assert!(ThresholdLinkage::new(-0.1).is_err());
    }
}
