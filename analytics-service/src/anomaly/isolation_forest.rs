//! Isolation forest over a one-dimensional sample.
//!
//! The forest is fitted and discarded inside [`fit_and_score`]; nothing
//! survives the call. Reproducibility comes from the explicit seed.

use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use serde::Deserialize;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Parameters of one forest fit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForestSettings {
    /// A-priori share of points treated as outliers, in (0, 0.5].
    pub contamination: f64,
    pub seed: u64,
    pub n_trees: usize,
    /// Upper bound on the points each tree is trained on.
    pub max_samples: usize,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            contamination: 0.1,
            seed: 42,
            n_trees: 100,
            max_samples: 256,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("need at least 2 samples, got {0}")]
    TooFewSamples(usize),
    #[error("sample contains a non-finite value at index {0}")]
    NonFinite(usize),
    #[error("contamination must be in (0, 0.5], got {0}")]
    InvalidContamination(f64),
    #[error("n_trees and max_samples must be positive")]
    EmptyForest,
    #[error("sample range [{min}, {max}] is too wide to split")]
    RangeOverflow { min: f64, max: f64 },
}

/// Per-point anomaly scores plus the decision threshold derived from the
/// contamination fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestScores {
    /// `2^(-E[h(x)] / c(n))`, in (0, 1]; larger is more anomalous.
    pub scores: Vec<f64>,
    pub threshold: f64,
}

impl ForestScores {
    pub fn is_outlier(&self, idx: usize) -> bool {
        self.scores[idx] > self.threshold
    }

    pub fn outliers(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, s)| *s > self.threshold)
    }
}

#[derive(Debug)]
enum Node {
    Split { threshold: f64, left: usize, right: usize },
    Leaf { size: usize },
}

struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn fit(sample: Vec<f64>, height_limit: usize, rng: &mut StdRng) -> Self {
        let mut tree = IsolationTree { nodes: Vec::new() };
        tree.grow(sample, 0, height_limit, rng);
        tree
    }

    fn grow(&mut self, sample: Vec<f64>, depth: usize, height_limit: usize, rng: &mut StdRng) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { size: sample.len() });

        if depth >= height_limit || sample.len() <= 1 {
            return idx;
        }

        let (min, max) = value_range(&sample);
        if min >= max {
            return idx;
        }

        let threshold = rng.gen_range(min..max);
        let (left_sample, right_sample): (Vec<f64>, Vec<f64>) =
            sample.into_iter().partition(|&v| v <= threshold);

        let left = self.grow(left_sample, depth + 1, height_limit, rng);
        let right = self.grow(right_sample, depth + 1, height_limit, rng);
        self.nodes[idx] = Node::Split { threshold, left, right };
        idx
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[idx] {
                Node::Split { threshold, left, right } => {
                    idx = if x <= threshold { left } else { right };
                    depth += 1.0;
                }
                Node::Leaf { size } => return depth + average_path_length(size),
            }
        }
    }
}

fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Average path length of an unsuccessful search in a binary search tree of
/// `n` nodes.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolation quantile of an unsorted sample, `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Fit a forest over `values` and score every point against it.
pub fn fit_and_score(values: &[f64], settings: &ForestSettings) -> Result<ForestScores, FitError> {
    if values.len() < 2 {
        return Err(FitError::TooFewSamples(values.len()));
    }
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(FitError::NonFinite(idx));
    }
    // Every split draws from a sub-range of this one.
    let (min, max) = value_range(values);
    if !(max - min).is_finite() {
        return Err(FitError::RangeOverflow { min, max });
    }
    if !(settings.contamination > 0.0 && settings.contamination <= 0.5) {
        return Err(FitError::InvalidContamination(settings.contamination));
    }
    if settings.n_trees == 0 || settings.max_samples == 0 {
        return Err(FitError::EmptyForest);
    }

    let sample_size = settings.max_samples.min(values.len()).max(2);
    let height_limit = (sample_size as f64).log2().ceil() as usize;
    let mut rng = StdRng::seed_from_u64(settings.seed);

    let trees: Vec<IsolationTree> = (0..settings.n_trees)
        .map(|_| {
            let sample = index::sample(&mut rng, values.len(), sample_size)
                .into_iter()
                .map(|i| values[i])
                .collect();
            IsolationTree::fit(sample, height_limit, &mut rng)
        })
        .collect();

    let normaliser = average_path_length(sample_size);
    let scores: Vec<f64> = values
        .iter()
        .map(|&x| {
            let mean_depth =
                trees.iter().map(|t| t.path_length(x)).sum::<f64>() / trees.len() as f64;
            2f64.powf(-mean_depth / normaliser)
        })
        .collect();

    let threshold = quantile(&scores, 1.0 - settings.contamination);

    Ok(ForestScores { scores, threshold })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_path_length_matches_reference_values() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // 2 * (ln(255) + gamma) - 2 * 255 / 256
        let expected = 2.0 * (255f64.ln() + EULER_GAMMA) - 2.0 * 255.0 / 256.0;
        assert!((average_path_length(256) - expected).abs() < 1e-12);
    }

    #[test]
    fn quantile_interpolates_between_neighbours() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 1.0), 5.0);
        assert_eq!(quantile(&values, 0.5), 3.0);
        assert!((quantile(&values, 0.9) - 4.6).abs() < 1e-12);
    }

    #[test]
    fn isolated_point_scores_highest() {
        let mut values: Vec<f64> = (0..50).map(|i| 20.0 + (i % 7) as f64 * 0.1).collect();
        values[17] = 400.0;

        let fit = fit_and_score(&values, &ForestSettings::default()).unwrap();
        let (max_idx, _) = fit
            .scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();

        assert_eq!(max_idx, 17);
        assert!(fit.is_outlier(17));
    }

    #[test]
    fn identical_values_produce_no_outliers() {
        let values = vec![3.5; 30];
        let fit = fit_and_score(&values, &ForestSettings::default()).unwrap();

        assert!(fit.scores.iter().all(|s| *s == fit.scores[0]));
        assert_eq!(fit.outliers().count(), 0);
    }

    #[test]
    fn same_seed_gives_same_scores() {
        let values: Vec<f64> = (0..40).map(|i| ((i * 37) % 11) as f64).collect();
        let settings = ForestSettings::default();

        let a = fit_and_score(&values, &settings).unwrap();
        let b = fit_and_score(&values, &settings).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unusable_input() {
        let settings = ForestSettings::default();
        assert_eq!(fit_and_score(&[1.0], &settings), Err(FitError::TooFewSamples(1)));
        assert_eq!(
            fit_and_score(&[1.0, f64::NAN, 2.0], &settings),
            Err(FitError::NonFinite(1))
        );

        let bad = ForestSettings {
            contamination: 0.0,
            ..ForestSettings::default()
        };
        assert_eq!(
            fit_and_score(&[1.0, 2.0, 3.0], &bad),
            Err(FitError::InvalidContamination(0.0))
        );
    }

    #[test]
    fn rejects_range_wider_than_f64() {
        let mut values = vec![1.0; 12];
        values[0] = f64::MAX;
        values[1] = -f64::MAX;

        assert_eq!(
            fit_and_score(&values, &ForestSettings::default()),
            Err(FitError::RangeOverflow { min: -f64::MAX, max: f64::MAX })
        );
    }

    #[test]
    fn extreme_but_representable_range_still_fits() {
        let mut values = vec![0.0; 20];
        values[3] = f64::MAX;

        let fit = fit_and_score(&values, &ForestSettings::default()).unwrap();
        assert!(fit.is_outlier(3));
    }
}
