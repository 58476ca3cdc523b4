//! Ranking of scored vectors.
//!
//! A ranking is the full set of scored vectors sorted by score, highest
//! first. The sort is stable: vectors with equal scores keep the order the
//! vectorizer produced them in, so selecting the top `k` is deterministic.

use std::cmp::Ordering;

/// A vector together with the score the regression model gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredVector<V> {
    pub vector: V,
    pub score: f64,
}

impl<V> ScoredVector<V> {
    pub fn new(vector: V, score: f64) -> Self {
        Self { vector, score }
    }
}

/// Descending order on scores.
///
/// NaN sorts after every real score and equal to other NaNs, so a model
/// emitting NaN never pushes real results out of the top `k`.
fn by_score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Pair vectors with their scores and sort them, highest score first.
///
/// `scores[i]` belongs to `vectors[i]`. Extra entries on either side are
/// dropped by the zip.
pub fn rank<V>(vectors: Vec<V>, scores: Vec<f64>) -> Vec<ScoredVector<V>> {
    let mut ranking: Vec<ScoredVector<V>> = vectors
        .into_iter()
        .zip(scores)
        .map(|(vector, score)| ScoredVector::new(vector, score))
        .collect();

    // `sort_by` is stable
    ranking.sort_by(|a, b| by_score_desc(a.score, b.score));
    ranking
}

/// Take the first `k` vectors of a ranking, in ranked order.
///
/// Returns every vector when the ranking holds fewer than `k`.
pub fn select_top<V>(ranking: Vec<ScoredVector<V>>, k: usize) -> Vec<V> {
    ranking
        .into_iter()
        .take(k)
        .map(|scored| scored.vector)
        .collect()
}
