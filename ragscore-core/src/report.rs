// Copyright 2025 Ragscore Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Evaluation outcomes and reports

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Wire form of [`EvalOutcome::NoAnswer`].
pub const NO_ANSWER_SENTINEL: &str = "No answer in dataset";

/// Outcome of one aggregation pass.
///
/// A missing reference answer is a recognized result, not an error: the
/// pass yields [`EvalOutcome::NoAnswer`] instead of a numeric score, and
/// serializes to the sentinel string so reports stay compatible with
/// consumers expecting "float or explanatory string".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalOutcome {
    /// Aggregate score, in [0, 1] for the built-in metrics.
    Score(f64),
    /// At least one record had no reference answer; the pass was aborted.
    NoAnswer,
}

impl EvalOutcome {
    /// Numeric score, if the pass produced one.
    pub fn as_score(&self) -> Option<f64> {
        match self {
            Self::Score(score) => Some(*score),
            Self::NoAnswer => None,
        }
    }

    pub fn is_no_answer(&self) -> bool {
        matches!(self, Self::NoAnswer)
    }
}

impl fmt::Display for EvalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{score}"),
            Self::NoAnswer => f.write_str(NO_ANSWER_SENTINEL),
        }
    }
}

impl Serialize for EvalOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(score) => serializer.serialize_f64(*score),
            Self::NoAnswer => serializer.serialize_str(NO_ANSWER_SENTINEL),
        }
    }
}

impl<'de> Deserialize<'de> for EvalOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Score)
                .ok_or_else(|| D::Error::custom("score is not representable as f64")),
            serde_json::Value::String(s) if s == NO_ANSWER_SENTINEL => Ok(Self::NoAnswer),
            other => Err(D::Error::custom(format!(
                "expected a score or \"{NO_ANSWER_SENTINEL}\", got {other}"
            ))),
        }
    }
}

/// Result of one evaluation run: metric name to aggregate outcome, plus the
/// run-configuration parameters echoed for provenance.
///
/// Written once at the end of a scoring pass, never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvaluationReport {
    pub scores: BTreeMap<String, EvalOutcome>,

    /// Run parameters (model, concurrency cap, dataset path, ...).
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
}

impl EvaluationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one metric outcome.
    pub fn with_score(mut self, metric: impl Into<String>, outcome: EvalOutcome) -> Self {
        self.scores.insert(metric.into(), outcome);
        self
    }

    /// Echo a configuration parameter into the report.
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Echo every field of a serializable configuration struct.
    pub fn with_config<T: Serialize>(mut self, config: &T) -> Result<Self, serde_json::Error> {
        use serde::ser::Error as _;

        match serde_json::to_value(config)? {
            serde_json::Value::Object(fields) => {
                for (name, value) in fields {
                    self.config.insert(name, value);
                }
                Ok(self)
            }
            _ => Err(<serde_json::Error as serde::ser::Error>::custom(
                "configuration must serialize to a JSON object",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_value(EvalOutcome::Score(0.5)).unwrap(), json!(0.5));
        assert_eq!(
            serde_json::to_value(EvalOutcome::NoAnswer).unwrap(),
            json!("No answer in dataset")
        );
    }

    #[test]
    fn test_outcome_round_trip() {
        let outcome: EvalOutcome = serde_json::from_value(json!(1.0)).unwrap();
        assert_eq!(outcome, EvalOutcome::Score(1.0));

        let outcome: EvalOutcome = serde_json::from_value(json!("No answer in dataset")).unwrap();
        assert!(outcome.is_no_answer());

        assert!(serde_json::from_value::<EvalOutcome>(json!("something else")).is_err());
    }

    #[test]
    fn test_report_echoes_config() {
        #[derive(Serialize)]
        struct RunConfig {
            max_concurrent: usize,
            model: String,
        }

        let report = EvaluationReport::new()
            .with_score("accuracy", EvalOutcome::Score(0.75))
            .with_config(&RunConfig {
                max_concurrent: 100,
                model: "gpt-4o-mini".to_string(),
            })
            .unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["scores"]["accuracy"], json!(0.75));
        assert_eq!(value["config"]["max_concurrent"], json!(100));
        assert_eq!(value["config"]["model"], json!("gpt-4o-mini"));
    }
}
