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

//! Metric aggregation
//!
//! Applies one metric across a record set and reduces to the arithmetic
//! mean. A record without a reference answer aborts the pass immediately:
//! the result is [`EvalOutcome::NoAnswer`] for the whole set, regardless of
//! how many records were already scored.

use crate::metrics::{exact_match, f1_score, soft_match};
use crate::normalize::accepted_answers;
use crate::EvalError;
use ragscore_core::{EvalOutcome, InferenceRecord};
use tracing::warn;

/// Mean of `metric` over all records, or [`EvalOutcome::NoAnswer`] if any
/// record's reference answer is absent.
pub fn aggregate<F>(records: &[InferenceRecord], metric: F) -> Result<EvalOutcome, EvalError>
where
    F: Fn(&str, &[String]) -> f64,
{
    if records.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    let mut scores = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let Some(accepted) = accepted_answers(&record.answer) else {
            warn!("record {} has no reference answer; aborting aggregation", index);
            return Ok(EvalOutcome::NoAnswer);
        };
        scores.push(metric(&record.generation, &accepted));
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    Ok(EvalOutcome::Score(mean))
}

/// Soft-match accuracy: fraction of generations containing an accepted answer.
pub fn eval_accuracy(records: &[InferenceRecord]) -> Result<EvalOutcome, EvalError> {
    aggregate(records, |generation, accepted| {
        if soft_match(generation, accepted) {
            1.0
        } else {
            0.0
        }
    })
}

/// Exact-match accuracy under shared normalization.
pub fn eval_exact_match(records: &[InferenceRecord]) -> Result<EvalOutcome, EvalError> {
    aggregate(records, |generation, accepted| {
        if exact_match(generation, accepted) {
            1.0
        } else {
            0.0
        }
    })
}

/// Mean token-level F1 against the best accepted answer per record.
pub fn eval_f1_score(records: &[InferenceRecord]) -> Result<EvalOutcome, EvalError> {
    aggregate(records, f1_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragscore_core::AnswerField;

    fn record(question: &str, answer: AnswerField, generation: &str) -> InferenceRecord {
        InferenceRecord::new(question, answer, generation)
    }

    #[test]
    fn test_sky_blue_scenario() {
        let records = vec![record(
            "Is sky blue?",
            AnswerField::Text("yes".to_string()),
            "Yes, the sky is blue.",
        )];

        assert_eq!(eval_accuracy(&records).unwrap(), EvalOutcome::Score(1.0));
        assert_eq!(eval_exact_match(&records).unwrap(), EvalOutcome::Score(0.0));

        let f1 = eval_f1_score(&records).unwrap().as_score().unwrap();
        assert!(f1 > 0.0 && f1 < 1.0);
    }

    #[test]
    fn test_boolean_answer_matches_generation() {
        let records = vec![record("X", AnswerField::Flag(true), "true")];
        assert_eq!(eval_exact_match(&records).unwrap(), EvalOutcome::Score(1.0));
    }

    #[test]
    fn test_mean_over_multiple_records() {
        let records = vec![
            record("q1", AnswerField::Text("paris".to_string()), "Paris"),
            record("q2", AnswerField::Text("london".to_string()), "Berlin"),
        ];
        assert_eq!(eval_exact_match(&records).unwrap(), EvalOutcome::Score(0.5));
    }

    #[test]
    fn test_absent_answer_short_circuits_at_any_position() {
        let valid = || record("q", AnswerField::Text("yes".to_string()), "yes");
        let absent = || record("q", AnswerField::Absent, "anything");

        for records in [
            vec![absent(), valid(), valid()],
            vec![valid(), absent(), valid()],
            vec![valid(), valid(), absent()],
        ] {
            assert!(eval_accuracy(&records).unwrap().is_no_answer());
            assert!(eval_exact_match(&records).unwrap().is_no_answer());
            assert!(eval_f1_score(&records).unwrap().is_no_answer());
        }
    }

    #[test]
    fn test_no_answer_serializes_to_sentinel() {
        let records = vec![record("X", AnswerField::Absent, "anything")];
        let outcome = eval_accuracy(&records).unwrap();
        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            serde_json::json!("No answer in dataset")
        );
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(eval_accuracy(&[]), Err(EvalError::EmptyInput)));
        assert!(matches!(eval_f1_score(&[]), Err(EvalError::EmptyInput)));
    }
}
