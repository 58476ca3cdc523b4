//! The two workflows the scheduler fires.

use anyhow::Result;
use pipeline::RecommendationPipeline;

/// Something the scheduler can run train and recommend cycles against.
///
/// Calls are always sequential; an implementation never sees a train cycle
/// and a recommend cycle at the same time.
pub trait Cycles: Send {
    /// Run one train cycle.
    fn train(&mut self) -> Result<()>;

    /// Run one recommend cycle, returning how many records were delivered.
    fn recommend(&mut self) -> Result<usize>;
}

impl<R, V> Cycles for RecommendationPipeline<R, V>
where
    R: Send + 'static,
    V: Send + Sync + 'static,
{
    fn train(&mut self) -> Result<()> {
        RecommendationPipeline::train(self)
    }

    fn recommend(&mut self) -> Result<usize> {
        self.recommend_preemptively()
    }
}
