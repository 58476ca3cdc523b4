//! Turns JSON records into numeric feature vectors.

use data_loader::Record;
use serde_json::Value;

use crate::error::{ModelError, Result};

/// Numeric features of one record, plus the record itself.
///
/// Keeping the record makes `interpret` an exact inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub features: Vec<f64>,
    /// Training label; `None` for records without the target field.
    pub target: Option<f64>,
    pub record: Record,
}

/// Reads a fixed list of numeric fields from every record.
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    feature_fields: Vec<String>,
    target_field: Option<String>,
}

impl FeatureVectorizer {
    pub fn new(feature_fields: Vec<String>) -> Self {
        Self {
            feature_fields,
            target_field: None,
        }
    }

    /// Read training labels from `target_field` (builder pattern).
    pub fn with_target(mut self, target_field: impl Into<String>) -> Self {
        self.target_field = Some(target_field.into());
        self
    }

    fn to_vector(&self, index: usize, record: Record) -> Result<FeatureVector> {
        let features = self
            .feature_fields
            .iter()
            .map(|field| match record.get(field) {
                None | Some(Value::Null) => Err(ModelError::MissingFeature {
                    index,
                    field: field.clone(),
                }),
                Some(value) => numeric(value).ok_or_else(|| ModelError::NonNumericFeature {
                    index,
                    field: field.clone(),
                }),
            })
            .collect::<Result<Vec<f64>>>()?;

        // A present but non-numeric target is an error; an absent one is not
        let target = match &self.target_field {
            Some(field) => match record.get(field) {
                None | Some(Value::Null) => None,
                Some(value) => Some(numeric(value).ok_or_else(|| {
                    ModelError::NonNumericFeature {
                        index,
                        field: field.clone(),
                    }
                })?),
            },
            None => None,
        };

        Ok(FeatureVector {
            features,
            target,
            record,
        })
    }
}

/// Numbers and booleans are numeric; everything else is not.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

impl pipeline::Vectorizer<Record, FeatureVector> for FeatureVectorizer {
    fn name(&self) -> &str {
        "feature-vectorizer"
    }

    fn vectorize(&self, records: Vec<Record>) -> anyhow::Result<Vec<FeatureVector>> {
        let vectors = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| self.to_vector(index, record))
            .collect::<Result<Vec<_>>>()?;
        Ok(vectors)
    }

    fn interpret(&self, vectors: Vec<FeatureVector>) -> anyhow::Result<Vec<Record>> {
        Ok(vectors.into_iter().map(|vector| vector.record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::Vectorizer;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test records are objects"),
        }
    }

    fn vectorizer() -> FeatureVectorizer {
        FeatureVectorizer::new(vec!["clicks".into(), "fresh".into()]).with_target("rating")
    }

    #[test]
    fn test_vectorize_reads_fields_in_order() {
        let records = vec![
            record(json!({"id": 1, "clicks": 12, "fresh": true, "rating": 4.5})),
            record(json!({"id": 2, "clicks": 3.5, "fresh": false})),
        ];

        let vectors = vectorizer().vectorize(records).unwrap();

        assert_eq!(vectors[0].features, vec![12.0, 1.0]);
        assert_eq!(vectors[0].target, Some(4.5));
        assert_eq!(vectors[1].features, vec![3.5, 0.0]);
        assert_eq!(vectors[1].target, None);
    }

    #[test]
    fn test_missing_feature_is_an_error() {
        let records = vec![
            record(json!({"clicks": 1, "fresh": true})),
            record(json!({"clicks": 1})),
        ];

        let err = vectorizer().vectorize(records).unwrap_err();

        assert_eq!(err.to_string(), "record 1 is missing feature 'fresh'");
    }

    #[test]
    fn test_non_numeric_feature_is_an_error() {
        let records = vec![record(json!({"clicks": "many", "fresh": true}))];

        let err = vectorizer().vectorize(records).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::NonNumericFeature { index: 0, .. })
        ));
    }

    #[test]
    fn test_interpret_returns_original_records() {
        let records = vec![
            record(json!({"id": "a", "clicks": 1, "fresh": true})),
            record(json!({"id": "b", "clicks": 2, "fresh": false})),
        ];
        let v = vectorizer();

        let mut vectors = v.vectorize(records.clone()).unwrap();
        vectors.reverse();
        let interpreted = v.interpret(vectors).unwrap();

        assert_eq!(interpreted, vec![records[1].clone(), records[0].clone()]);
    }
}
