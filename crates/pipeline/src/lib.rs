//! Recommendation pipeline: vectorize, score, rank and interpret.
//!
//! This crate provides:
//! - Collaborator traits the pipeline calls out to (data loaders, the
//!   regression model, the vectorizer and the result handler)
//! - Stable ranking and top-k selection of scored vectors
//! - RecommendationPipeline, which runs train and recommend cycles
//!
//! ## Architecture
//! A train cycle:
//! 1. The training loader produces raw records
//! 2. The vectorizer turns them into vectors
//! 3. The regression model is fitted and dumped
//!
//! A recommend cycle:
//! 1. The prediction loader produces raw records
//! 2. The vectorizer turns them into vectors, the model scores each one
//! 3. Vectors are ranked (stable, highest score first) and the top
//!    `prediction_count` are interpreted back into records
//! 4. The result handler receives those records
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::RecommendationPipeline;
//!
//! let mut pipeline = RecommendationPipeline::new(
//!     model, vectorizer, training_loader, prediction_loader, handler,
//! )
//! .with_prediction_count(10);
//!
//! pipeline.train()?;
//! pipeline.recommend_preemptively()?;
//! ```

pub mod traits;
pub mod ranking;
pub mod recommendation_pipeline;

// Re-export main types
pub use traits::{DataLoader, RegressionModel, ResultHandler, Vectorizer};
pub use ranking::{rank, select_top, ScoredVector};
pub use recommendation_pipeline::{RecommendationPipeline, DEFAULT_PREDICTION_COUNT};
