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

//! Inference record schema
//!
//! A record couples a question with its reference answer and the generation
//! produced by the pipeline. The reference answer arrives in heterogeneous
//! JSON shapes (string, list of strings, bool, null/missing); the shape is
//! resolved into [`AnswerField`] exactly once, at ingestion, so downstream
//! code pattern-matches a tagged variant instead of re-inspecting raw JSON.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Reference-answer field of a record.
///
/// Exactly one variant is populated. Any JSON shape outside
/// {string, list-of-strings, bool, null} is rejected at construction with
/// [`AnswerTypeError`]; it never reaches the metric or judge paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnswerField {
    /// Single reference answer.
    Text(String),
    /// Multiple acceptable answers, order preserved.
    List(Vec<String>),
    /// Boolean gold label (yes/no style datasets).
    Flag(bool),
    /// No reference answer in the dataset.
    #[default]
    Absent,
}

/// The answer field held a JSON shape outside the supported set.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "invalid answer type: expected string, list of strings, bool, or null, got {got}. \
     Check the answer field in your raw data."
)]
pub struct AnswerTypeError {
    /// Human-readable description of the offending shape.
    pub got: String,
}

impl AnswerField {
    /// Resolve a raw JSON value into a tagged answer variant.
    pub fn from_json(value: serde_json::Value) -> Result<Self, AnswerTypeError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Absent),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Bool(b) => Ok(Self::Flag(b)),
            Value::Array(items) => {
                let mut answers = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => answers.push(s),
                        other => {
                            return Err(AnswerTypeError {
                                got: format!("array containing {}", json_type_name(&other)),
                            })
                        }
                    }
                }
                Ok(Self::List(answers))
            }
            other => Err(AnswerTypeError {
                got: json_type_name(&other).to_string(),
            }),
        }
    }

    /// Whether the dataset carried no reference answer.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Serialize for AnswerField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::List(xs) => xs.serialize(serializer),
            Self::Flag(b) => serializer.serialize_bool(*b),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(D::Error::custom)
    }
}

/// One question/reference/generation triple produced by the inference stage.
///
/// Immutable once recorded; every metric and judge operation consumes it
/// read-only. Field names on the wire match the dataset convention
/// (`question`, `answers`, `generation`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceRecord {
    pub question: String,

    /// Reference answer(s); a missing key deserializes as [`AnswerField::Absent`].
    #[serde(rename = "answers", default)]
    pub answer: AnswerField,

    /// Final prediction emitted by the pipeline.
    pub generation: String,
}

impl InferenceRecord {
    /// Create a new record.
    pub fn new(
        question: impl Into<String>,
        answer: AnswerField,
        generation: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer,
            generation: generation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_field_shapes() {
        assert_eq!(
            AnswerField::from_json(json!("yes")).unwrap(),
            AnswerField::Text("yes".to_string())
        );
        assert_eq!(
            AnswerField::from_json(json!(["a", "b"])).unwrap(),
            AnswerField::List(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            AnswerField::from_json(json!(true)).unwrap(),
            AnswerField::Flag(true)
        );
        assert_eq!(AnswerField::from_json(json!(null)).unwrap(), AnswerField::Absent);
    }

    #[test]
    fn test_answer_field_rejects_other_shapes() {
        let err = AnswerField::from_json(json!(42)).unwrap_err();
        assert!(err.to_string().contains("number"));

        let err = AnswerField::from_json(json!({"text": "yes"})).unwrap_err();
        assert!(err.to_string().contains("object"));

        let err = AnswerField::from_json(json!(["a", 1])).unwrap_err();
        assert!(err.to_string().contains("array containing number"));
    }

    #[test]
    fn test_record_missing_answer_key_is_absent() {
        let record: InferenceRecord =
            serde_json::from_value(json!({"question": "q", "generation": "g"})).unwrap();
        assert!(record.answer.is_absent());
    }

    #[test]
    fn test_record_round_trip() {
        let record = InferenceRecord::new(
            "Is the sky blue?",
            AnswerField::List(vec!["yes".to_string()]),
            "Yes, the sky is blue.",
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["answers"], json!(["yes"]));

        let back: InferenceRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_rejects_integer_answer() {
        let err = serde_json::from_value::<InferenceRecord>(json!({
            "question": "q",
            "answers": 42,
            "generation": "g"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid answer type"));
    }

    #[test]
    fn test_flag_serializes_as_bool() {
        let record = InferenceRecord::new("q", AnswerField::Flag(false), "g");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["answers"], json!(false));
    }
}
