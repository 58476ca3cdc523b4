//! The RecommendationPipeline drives train and recommend cycles.
//!
//! It owns one instance of every collaborator and calls them in a fixed
//! order. Nothing is retried and nothing is rolled back: a failing
//! collaborator aborts the current call and its error is returned as-is.

use std::time::Instant;

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::ranking::{rank, select_top};
use crate::traits::{DataLoader, RegressionModel, ResultHandler, Vectorizer};

/// Number of records a recommendation returns when not configured otherwise.
pub const DEFAULT_PREDICTION_COUNT: usize = 10;

/// Orchestrates vectorize → score → rank → interpret against injected
/// collaborators.
///
/// ## Usage
/// ```ignore
/// let mut pipeline = RecommendationPipeline::new(
///     model,
///     vectorizer,
///     training_loader,
///     prediction_loader,
///     result_handler,
/// )
/// .with_prediction_count(5);
///
/// pipeline.train()?;
/// let delivered = pipeline.recommend_preemptively()?;
/// ```
pub struct RecommendationPipeline<R, V> {
    model: Box<dyn RegressionModel<V>>,
    vectorizer: Box<dyn Vectorizer<R, V>>,
    training_loader: Box<dyn DataLoader<R>>,
    prediction_loader: Box<dyn DataLoader<R>>,
    result_handler: Box<dyn ResultHandler<R>>,
    prediction_count: usize,
}

impl<R, V> RecommendationPipeline<R, V>
where
    R: Send + 'static,
    V: Send + Sync + 'static,
{
    /// Create a pipeline returning [`DEFAULT_PREDICTION_COUNT`] records per
    /// recommendation.
    pub fn new(
        model: impl RegressionModel<V> + 'static,
        vectorizer: impl Vectorizer<R, V> + 'static,
        training_loader: impl DataLoader<R> + 'static,
        prediction_loader: impl DataLoader<R> + 'static,
        result_handler: impl ResultHandler<R> + 'static,
    ) -> Self {
        Self {
            model: Box::new(model),
            vectorizer: Box::new(vectorizer),
            training_loader: Box::new(training_loader),
            prediction_loader: Box::new(prediction_loader),
            result_handler: Box::new(result_handler),
            prediction_count: DEFAULT_PREDICTION_COUNT,
        }
    }

    /// Set how many records a recommendation returns (builder pattern).
    pub fn with_prediction_count(mut self, prediction_count: usize) -> Self {
        self.prediction_count = prediction_count;
        self
    }

    pub fn prediction_count(&self) -> usize {
        self.prediction_count
    }

    /// Run one train cycle: load → vectorize → fit → dump.
    ///
    /// A failure at any step stops the cycle there; the model keeps whatever
    /// state the failing step left it in.
    pub fn train(&mut self) -> Result<()> {
        let start = Instant::now();

        let raw_data = self.training_loader.load()?;
        debug!(
            "Loaded {} training records from {}",
            raw_data.len(),
            self.training_loader.name()
        );

        let vectors = self.vectorizer.vectorize(raw_data)?;
        debug!("Vectorized {} training records", vectors.len());

        self.model.fit(&vectors)?;
        self.model.dump()?;

        info!(
            "Trained {} on {} vectors in {:.2?}",
            self.model.name(),
            vectors.len(),
            start.elapsed()
        );
        Ok(())
    }

    /// Rank `input_data` with the current model and return the top records.
    ///
    /// The result holds `min(prediction_count, input_data.len())` records,
    /// highest score first. Records with equal scores keep their input order.
    pub fn recommend(&self, input_data: Vec<R>) -> Result<Vec<R>> {
        let start = Instant::now();

        let vectors = self.vectorizer.vectorize(input_data)?;
        let scores = self.score(&vectors)?;
        let ranking = rank(vectors, scores);
        let selected = select_top(ranking, self.prediction_count);
        let records = self.vectorizer.interpret(selected)?;

        debug!(
            "Selected {} recommendations in {:.2?}",
            records.len(),
            start.elapsed()
        );
        Ok(records)
    }

    /// Load prediction data, recommend, and hand the result to the result
    /// handler unchanged.
    ///
    /// Returns the number of records delivered.
    pub fn recommend_preemptively(&self) -> Result<usize> {
        let raw_data = self.prediction_loader.load()?;
        debug!(
            "Loaded {} prediction records from {}",
            raw_data.len(),
            self.prediction_loader.name()
        );

        let result = self.recommend(raw_data)?;
        self.result_handler.handle(&result)?;

        info!(
            "Delivered {} recommendations to {}",
            result.len(),
            self.result_handler.name()
        );
        Ok(result.len())
    }

    /// Restore the model from its last dump.
    pub fn restore(&mut self) -> Result<()> {
        self.model.load()?;
        info!("Restored {} from its last dump", self.model.name());
        Ok(())
    }

    /// Score every vector; `predict` is pure so this runs in parallel.
    ///
    /// The returned scores are in the same order as `vectors`.
    fn score(&self, vectors: &[V]) -> Result<Vec<f64>> {
        let model = &self.model;
        vectors
            .par_iter()
            .map(|vector| model.predict(vector))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<String>>>;

    /// Records are plain scores; the "model" returns the vector itself.
    struct EchoModel {
        calls: Calls,
        fail_fit: bool,
    }

    impl RegressionModel<f64> for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        fn fit(&mut self, _vectors: &[f64]) -> Result<()> {
            self.calls.lock().unwrap().push("fit".into());
            if self.fail_fit {
                return Err(anyhow!("fit failed"));
            }
            Ok(())
        }

        fn predict(&self, vector: &f64) -> Result<f64> {
            Ok(*vector)
        }

        fn dump(&self) -> Result<()> {
            self.calls.lock().unwrap().push("dump".into());
            Ok(())
        }

        fn load(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push("load".into());
            Ok(())
        }
    }

    /// Passes scores through; negative scores cannot be vectorized.
    struct IdentityVectorizer {
        calls: Calls,
    }

    impl Vectorizer<f64, f64> for IdentityVectorizer {
        fn name(&self) -> &str {
            "identity"
        }

        fn vectorize(&self, records: Vec<f64>) -> Result<Vec<f64>> {
            self.calls.lock().unwrap().push("vectorize".into());
            if let Some(bad) = records.iter().find(|r| **r < 0.0) {
                return Err(anyhow!("cannot vectorize {}", bad));
            }
            Ok(records)
        }

        fn interpret(&self, vectors: Vec<f64>) -> Result<Vec<f64>> {
            self.calls.lock().unwrap().push("interpret".into());
            Ok(vectors)
        }
    }

    struct FixedLoader {
        calls: Calls,
        records: Option<Vec<f64>>,
    }

    impl DataLoader<f64> for FixedLoader {
        fn name(&self) -> &str {
            "fixed"
        }

        fn load(&self) -> Result<Vec<f64>> {
            self.calls.lock().unwrap().push("load_data".into());
            self.records
                .clone()
                .ok_or_else(|| anyhow!("source unavailable"))
        }
    }

    struct CapturingHandler {
        received: Arc<Mutex<Vec<Vec<f64>>>>,
    }

    impl ResultHandler<f64> for CapturingHandler {
        fn name(&self) -> &str {
            "capture"
        }

        fn handle(&self, result: &[f64]) -> Result<()> {
            self.received.lock().unwrap().push(result.to_vec());
            Ok(())
        }
    }

    struct Fixture {
        pipeline: RecommendationPipeline<f64, f64>,
        calls: Calls,
        received: Arc<Mutex<Vec<Vec<f64>>>>,
    }

    fn build_fixture(training: Option<Vec<f64>>, fail_fit: bool) -> Fixture {
        let calls: Calls = Arc::default();
        let received = Arc::new(Mutex::new(Vec::new()));
        let pipeline = RecommendationPipeline::new(
            EchoModel {
                calls: calls.clone(),
                fail_fit,
            },
            IdentityVectorizer {
                calls: calls.clone(),
            },
            FixedLoader {
                calls: calls.clone(),
                records: training,
            },
            FixedLoader {
                calls: calls.clone(),
                records: Some(vec![0.3, 0.8, 0.1, 0.8]),
            },
            CapturingHandler {
                received: received.clone(),
            },
        );
        Fixture {
            pipeline,
            calls,
            received,
        }
    }

    fn calls(fixture: &Fixture) -> Vec<String> {
        fixture.calls.lock().unwrap().clone()
    }

    #[test]
    fn test_train_runs_steps_in_order() {
        let mut fixture = build_fixture(Some(vec![1.0, 2.0]), false);

        fixture.pipeline.train().unwrap();

        assert_eq!(calls(&fixture), vec!["load_data", "vectorize", "fit", "dump"]);
    }

    #[test]
    fn test_train_stops_at_failing_loader() {
        let mut fixture = build_fixture(None, false);

        let err = fixture.pipeline.train().unwrap_err();

        assert_eq!(err.to_string(), "source unavailable");
        assert_eq!(calls(&fixture), vec!["load_data"]);
    }

    #[test]
    fn test_train_stops_when_vectorize_fails() {
        let mut fixture = build_fixture(Some(vec![1.0, -2.0]), false);

        let err = fixture.pipeline.train().unwrap_err();

        assert_eq!(err.to_string(), "cannot vectorize -2");
        assert_eq!(calls(&fixture), vec!["load_data", "vectorize"]);
    }

    #[test]
    fn test_train_skips_dump_when_fit_fails() {
        let mut fixture = build_fixture(Some(vec![1.0]), true);

        assert!(fixture.pipeline.train().is_err());
        assert_eq!(calls(&fixture), vec!["load_data", "vectorize", "fit"]);
    }

    #[test]
    fn test_recommend_returns_top_records() {
        let fixture = build_fixture(None, false);
        let pipeline = fixture.pipeline.with_prediction_count(2);

        let result = pipeline.recommend(vec![0.9, 0.1, 0.95, 0.5]).unwrap();

        assert_eq!(result, vec![0.95, 0.9]);
    }

    #[test]
    fn test_recommend_with_fewer_records_than_count() {
        let fixture = build_fixture(None, false);

        let result = fixture.pipeline.recommend(vec![0.2, 0.4]).unwrap();

        assert_eq!(result, vec![0.4, 0.2]);
    }

    #[test]
    fn test_recommend_empty_input() {
        let fixture = build_fixture(None, false);

        let result = fixture.pipeline.recommend(vec![]).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_recommend_preemptively_hands_off_recommend_result() {
        let fixture = build_fixture(None, false);
        let pipeline = fixture.pipeline.with_prediction_count(3);

        let expected = pipeline.recommend(vec![0.3, 0.8, 0.1, 0.8]).unwrap();
        let delivered = pipeline.recommend_preemptively().unwrap();

        assert_eq!(delivered, 3);
        let received = fixture.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0], expected);
    }

    #[test]
    fn test_restore_loads_model() {
        let mut fixture = build_fixture(None, false);

        fixture.pipeline.restore().unwrap();

        assert_eq!(calls(&fixture), vec!["load"]);
    }

    #[test]
    fn test_default_prediction_count() {
        let fixture = build_fixture(None, false);
        assert_eq!(fixture.pipeline.prediction_count(), DEFAULT_PREDICTION_COUNT);
    }
}
