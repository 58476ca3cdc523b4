//! Collaborator traits the recommendation pipeline depends on.
//!
//! The pipeline never implements any of these itself. Concrete loaders,
//! models, vectorizers and handlers are plugged in at startup and held for
//! the lifetime of the pipeline.
//!
//! ## Design Note
//! - `Send + Sync` allows collaborators to be moved into the scheduler task
//!   and shared with the scoring workers
//! - Every operation returns `anyhow::Result`; the pipeline propagates those
//!   errors unchanged with `?`
//! - `R` is the domain record type, `V` the vector type a `Vectorizer`
//!   produces from it

use anyhow::Result;

/// Loads a batch of domain records, either for training or for prediction.
pub trait DataLoader<R>: Send + Sync {
    /// Returns the name of this loader (for logging/debugging)
    fn name(&self) -> &str;

    /// Load all records currently available from the source.
    fn load(&self) -> Result<Vec<R>>;
}

/// A scoring model that is periodically refitted.
///
/// The persistence format behind `dump`/`load` belongs entirely to the
/// implementation.
pub trait RegressionModel<V>: Send + Sync {
    fn name(&self) -> &str;

    /// Refit the model from the given training vectors.
    fn fit(&mut self, vectors: &[V]) -> Result<()>;

    /// Score a single vector; higher means more relevant.
    ///
    /// Must be a pure function of the currently fitted state.
    fn predict(&self, vector: &V) -> Result<f64>;

    /// Persist the fitted state.
    fn dump(&self) -> Result<()>;

    /// Restore the last persisted state.
    fn load(&mut self) -> Result<()>;
}

/// Converts domain records to vectors and back.
pub trait Vectorizer<R, V>: Send + Sync {
    fn name(&self) -> &str;

    /// Turn records into vectors, one per record, preserving order.
    fn vectorize(&self, records: Vec<R>) -> Result<Vec<V>>;

    /// Approximate inverse of [`Vectorizer::vectorize`], preserving order.
    fn interpret(&self, vectors: Vec<V>) -> Result<Vec<R>>;
}

/// Consumes the final ranked recommendation result.
pub trait ResultHandler<R>: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver the result, highest-scored record first.
    fn handle(&self, result: &[R]) -> Result<()>;
}
