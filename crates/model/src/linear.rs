//! Ridge linear regression with a versioned JSON snapshot.
//!
//! Fitting solves the normal equations `(XᵀX + λI) w = Xᵀy` directly, with an
//! unregularized intercept. That is plenty for the feature counts a config
//! file names, and it is deterministic.

use std::fs;
use std::path::PathBuf;

use data_loader::atomic_write;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ModelError, Result};
use crate::vectorizer::FeatureVector;

/// Snapshot format written by [`LinearRegression`]'s `dump`.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

const PIVOT_EPSILON: f64 = 1e-12;

/// Persisted model state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub format_version: u32,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Fitted coefficients.
#[derive(Debug, Clone, PartialEq)]
struct Coefficients {
    weights: Vec<f64>,
    bias: f64,
}

/// Linear model over [`FeatureVector`]s.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    snapshot_path: PathBuf,
    l2: f64,
    coefficients: Option<Coefficients>,
}

impl LinearRegression {
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            l2: 0.0,
            coefficients: None,
        }
    }

    /// Set the L2 penalty on the weights (builder pattern).
    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2.max(0.0);
        self
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.coefficients.as_ref().map(|c| c.weights.as_slice())
    }

    pub fn bias(&self) -> Option<f64> {
        self.coefficients.as_ref().map(|c| c.bias)
    }

    /// Fit on every vector that carries a target.
    pub fn fit_vectors(&mut self, vectors: &[FeatureVector]) -> Result<()> {
        let labelled: Vec<(&[f64], f64)> = vectors
            .iter()
            .filter_map(|v| v.target.map(|t| (v.features.as_slice(), t)))
            .collect();

        let Some((first, _)) = labelled.first() else {
            return Err(ModelError::NoTrainingData);
        };
        let dims = first.len();
        if let Some((features, _)) = labelled.iter().find(|(f, _)| f.len() != dims) {
            return Err(ModelError::DimensionMismatch {
                expected: dims,
                found: features.len(),
            });
        }

        // Augmented system: the last column is the intercept
        let n = dims + 1;
        let mut a = vec![vec![0.0; n]; n];
        let mut b = vec![0.0; n];
        for (features, target) in &labelled {
            for i in 0..n {
                let xi = if i < dims { features[i] } else { 1.0 };
                b[i] += xi * target;
                for j in 0..n {
                    let xj = if j < dims { features[j] } else { 1.0 };
                    a[i][j] += xi * xj;
                }
            }
        }
        for (i, row) in a.iter_mut().enumerate().take(dims) {
            row[i] += self.l2;
        }

        let mut solution = solve(a, b)?;
        let bias = solution.pop().unwrap_or(0.0);
        debug!(
            "Fitted {} weights on {} labelled vectors",
            solution.len(),
            labelled.len()
        );

        self.coefficients = Some(Coefficients {
            weights: solution,
            bias,
        });
        Ok(())
    }

    pub fn score(&self, vector: &FeatureVector) -> Result<f64> {
        let coefficients = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        if vector.features.len() != coefficients.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: coefficients.weights.len(),
                found: vector.features.len(),
            });
        }

        let dot: f64 = coefficients
            .weights
            .iter()
            .zip(&vector.features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + coefficients.bias)
    }

    /// Write the snapshot, replacing any previous one atomically.
    pub fn write_snapshot(&self) -> Result<()> {
        let coefficients = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        let snapshot = ModelSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            weights: coefficients.weights.clone(),
            bias: coefficients.bias,
        };

        atomic_write(&self.snapshot_path, &serde_json::to_vec_pretty(&snapshot)?)?;
        Ok(())
    }

    pub fn read_snapshot(&mut self) -> Result<()> {
        let bytes = fs::read(&self.snapshot_path)?;
        let snapshot: ModelSnapshot = serde_json::from_slice(&bytes)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                expected: SNAPSHOT_FORMAT_VERSION,
                found: snapshot.format_version,
            });
        }

        self.coefficients = Some(Coefficients {
            weights: snapshot.weights,
            bias: snapshot.bias,
        });
        Ok(())
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ModelError::SingularSystem);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

impl pipeline::RegressionModel<FeatureVector> for LinearRegression {
    fn name(&self) -> &str {
        "linear-regression"
    }

    fn fit(&mut self, vectors: &[FeatureVector]) -> anyhow::Result<()> {
        Ok(self.fit_vectors(vectors)?)
    }

    fn predict(&self, vector: &FeatureVector) -> anyhow::Result<f64> {
        Ok(self.score(vector)?)
    }

    fn dump(&self) -> anyhow::Result<()> {
        self.write_snapshot()?;
        info!("Wrote model snapshot to {}", self.snapshot_path.display());
        Ok(())
    }

    fn load(&mut self) -> anyhow::Result<()> {
        self.read_snapshot()?;
        info!("Loaded model snapshot from {}", self.snapshot_path.display());
        Ok(())
    }
}
