//! Service configuration file.
//!
//! ```json
//! {
//!   "scheduler": {
//!     "training_period_hours": 24,
//!     "recommending_period_hours": 1,
//!     "first_run_time_of_day": "03:00"
//!   },
//!   "prediction_count": 10,
//!   "training_data": "data/training.jsonl",
//!   "prediction_data": "data/candidates.jsonl",
//!   "output": "out/recommendations.json",
//!   "model_snapshot": "out/model.json",
//!   "features": ["clicks", "views"],
//!   "target": "rating"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use data_loader::{JsonFileHandler, JsonLinesLoader, Record};
use model::{FeatureVector, FeatureVectorizer, LinearRegression};
use pipeline::{RecommendationPipeline, ResultHandler, DEFAULT_PREDICTION_COUNT};
use scheduler::SchedulerConfig;

fn default_prediction_count() -> usize {
    DEFAULT_PREDICTION_COUNT
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub scheduler: SchedulerConfig,
    #[serde(default = "default_prediction_count")]
    pub prediction_count: usize,
    pub training_data: PathBuf,
    pub prediction_data: PathBuf,
    pub output: PathBuf,
    pub model_snapshot: PathBuf,
    pub features: Vec<String>,
    pub target: String,
    /// L2 penalty on the regression weights.
    #[serde(default)]
    pub l2: f64,
}

impl ServiceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.features.is_empty() {
            anyhow::bail!("at least one feature field is required");
        }
        Ok(config)
    }

    /// Wire the file-backed collaborators into a pipeline.
    pub fn build_pipeline(
        &self,
        handler: impl ResultHandler<Record> + 'static,
    ) -> RecommendationPipeline<Record, FeatureVector> {
        RecommendationPipeline::new(
            LinearRegression::new(&self.model_snapshot).with_l2(self.l2),
            FeatureVectorizer::new(self.features.clone()).with_target(self.target.clone()),
            JsonLinesLoader::new(&self.training_data),
            JsonLinesLoader::new(&self.prediction_data),
            handler,
        )
        .with_prediction_count(self.prediction_count)
    }

    pub fn output_handler(&self) -> JsonFileHandler {
        JsonFileHandler::new(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "scheduler": {"training_period_hours": 24, "recommending_period_hours": 1},
        "training_data": "train.jsonl",
        "prediction_data": "candidates.jsonl",
        "output": "out.json",
        "model_snapshot": "model.json",
        "features": ["clicks"],
        "target": "rating"
    }"#;

    #[test]
    fn test_parse_applies_defaults() {
        let config = ServiceConfig::parse(MINIMAL).unwrap();

        assert_eq!(config.prediction_count, DEFAULT_PREDICTION_COUNT);
        assert_eq!(config.l2, 0.0);
        assert_eq!(config.scheduler.training_period_hours, 24);
        assert!(config.scheduler.first_run_time_of_day.is_none());
    }

    #[test]
    fn test_parse_rejects_empty_features() {
        let content = MINIMAL.replace(r#"["clicks"]"#, "[]");
        assert!(ServiceConfig::parse(&content).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(ServiceConfig::parse(r#"{"prediction_count": 3}"#).is_err());
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let err = ServiceConfig::load(Path::new("/nonexistent/recsys.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/recsys.json"));
    }

    #[test]
    fn test_train_then_recommend_through_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("train.jsonl"),
            "{\"clicks\": 1, \"rating\": 3}\n{\"clicks\": 2, \"rating\": 5}\n{\"clicks\": 3, \"rating\": 7}\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("candidates.jsonl"),
            "{\"id\": \"a\", \"clicks\": 1}\n{\"id\": \"b\", \"clicks\": 9}\n{\"id\": \"c\", \"clicks\": 4}\n",
        )
        .unwrap();

        let mut config = ServiceConfig::parse(MINIMAL).unwrap();
        config.prediction_count = 2;
        config.training_data = dir.path().join("train.jsonl");
        config.prediction_data = dir.path().join("candidates.jsonl");
        config.output = dir.path().join("out.json");
        config.model_snapshot = dir.path().join("model.json");

        let mut trainer = config.build_pipeline(config.output_handler());
        trainer.train().unwrap();
        assert!(config.model_snapshot.exists());

        let mut recommender = config.build_pipeline(config.output_handler());
        recommender.restore().unwrap();
        assert_eq!(recommender.recommend_preemptively().unwrap(), 2);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&config.output).unwrap()).unwrap();
        let ids: Vec<&str> = written
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
