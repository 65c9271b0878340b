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

//! Answer normalization
//!
//! Turns the tagged answer field into the form each evaluation path wants:
//! the full accepted-answer set for string metrics, or one representative
//! string for the judge. `None` is the no-answer sentinel; callers must
//! abort their pass and report
//! [`EvalOutcome::NoAnswer`](ragscore_core::EvalOutcome) instead of a score.

use ragscore_core::AnswerField;

/// Accepted answers for the string-metric path.
///
/// Booleans are coerced to their canonical lowercase form; list order is
/// preserved.
pub fn accepted_answers(answer: &AnswerField) -> Option<Vec<String>> {
    match answer {
        AnswerField::Text(s) => Some(vec![s.clone()]),
        AnswerField::List(xs) => Some(xs.clone()),
        AnswerField::Flag(b) => Some(vec![b.to_string()]),
        AnswerField::Absent => None,
    }
}

/// Single representative answer for the judge path.
///
/// A list is represented by its first element; an empty list yields the
/// empty string, which the judge treats as a firm non-match without an
/// oracle call.
pub fn representative_answer(answer: &AnswerField) -> Option<String> {
    match answer {
        AnswerField::Text(s) => Some(s.clone()),
        AnswerField::List(xs) => Some(xs.first().cloned().unwrap_or_default()),
        AnswerField::Flag(b) => Some(b.to_string()),
        AnswerField::Absent => None,
    }
}
