use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{GroupingStrategy, SimilarityMatrix};
use crate::error::{ApidupError, Result};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// Partition into exactly `min(k, N)` groups with k-means over matrix rows.
///
/// Each item's similarity row is its feature vector. Centers are seeded
/// with k-means++ from a fixed RNG seed, so identical input and seed give
/// identical labels.
#[derive(Debug, Clone, Copy)]
pub struct FixedK {
    k: usize,
    seed: u64,
    max_iterations: usize,
}

impl FixedK {
    pub fn new(k: usize) -> Self {
        FixedK {
            k,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// k-means++ seeding; falls back to the first unused point once every
/// remaining point sits on a center
fn initial_centers(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut chosen = vec![rng.gen_range(0..points.len())];

    while chosen.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                chosen
                    .iter()
                    .map(|&c| squared_distance(p, &points[c]))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        let next = if total > 0.0 {
            let mut target = rng.gen::<f64>() * total;
            let mut pick = None;
            for (i, w) in weights.iter().enumerate() {
                if *w <= 0.0 {
                    continue;
                }
                pick = Some(i);
                if target < *w {
                    break;
                }
                target -= w;
            }
            pick
        } else {
            None
        };

        let next = next.or_else(|| (0..points.len()).find(|i| !chosen.contains(i)));
        match next {
            Some(i) => chosen.push(i),
            None => break,
        }
    }

    chosen.into_iter().map(|i| points[i].clone()).collect()
}

/// Nearest center per point; lower center index wins ties
fn assign(points: &[Vec<f64>], centers: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (c, center) in centers.iter().enumerate() {
                let d = squared_distance(p, center);
                if d < best_distance {
                    best = c;
                    best_distance = d;
                }
            }
            best
        })
        .collect()
}

/// Give every empty cluster the point farthest from its center, taken
/// from a cluster that can spare one
fn repair_empty(points: &[Vec<f64>], centers: &[Vec<f64>], labels: &mut [usize]) {
    let k = centers.len();
    let mut sizes = vec![0usize; k];
    for &label in labels.iter() {
        sizes[label] += 1;
    }

    for empty in 0..k {
        if sizes[empty] > 0 {
            continue;
        }
        let donor = (0..points.len())
            .filter(|&i| sizes[labels[i]] > 1)
            .max_by(|&a, &b| {
                let da = squared_distance(&points[a], &centers[labels[a]]);
                let db = squared_distance(&points[b], &centers[labels[b]]);
                da.total_cmp(&db)
            });
        if let Some(i) = donor {
            sizes[labels[i]] -= 1;
            labels[i] = empty;
            sizes[empty] = 1;
        }
    }
}

fn update_centers(points: &[Vec<f64>], labels: &[usize], centers: &mut [Vec<f64>]) {
    let dims = points.first().map_or(0, Vec::len);
    for (c, center) in centers.iter_mut().enumerate() {
        let members: Vec<&Vec<f64>> = points
            .iter()
            .zip(labels)
            .filter(|(_, &label)| label == c)
            .map(|(p, _)| p)
            .collect();
        if members.is_empty() {
            continue;
        }
        let mut mean = vec![0.0; dims];
        for p in &members {
            for (m, x) in mean.iter_mut().zip(p.iter()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= members.len() as f64;
        }
        *center = mean;
    }
}

impl GroupingStrategy for FixedK {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    #[tracing::instrument(skip_all, fields(items = matrix.len(), k = self.k, seed = self.seed))]
    fn group(&self, matrix: &SimilarityMatrix) -> Result<Vec<usize>> {
        let n = matrix.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if self.k == 0 {
            return Err(ApidupError::InvalidClusterCount { k: 0, items: n });
        }

        let k = self.k.min(n);
        let points = matrix.rows();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centers = initial_centers(points, k, &mut rng);

        let mut labels = assign(points, &centers);
        repair_empty(points, &centers, &mut labels);

        for iteration in 0..self.max_iterations {
            update_centers(points, &labels, &mut centers);
            let mut next = assign(points, &centers);
            repair_empty(points, &centers, &mut next);
            if next == labels {
                tracing::debug!(iterations = iteration + 1, "kmeans_converged");
                break;
            }
            labels = next;
        }

        Ok(labels)
    }
}
