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

//! Matching metrics
//!
//! Deterministic string metrics between a generation and an accepted-answer
//! set. All three share one normalization (lowercase, punctuation stripped,
//! whitespace collapsed) so that exact match implies soft match, and all
//! are invariant under permutation of the accepted set.

use std::collections::HashSet;

/// Canonical form used by every metric: lowercase, ASCII punctuation
/// replaced by spaces, runs of whitespace collapsed to single spaces.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c.is_ascii_punctuation() {
            cleaned.push(' ');
        } else {
            cleaned.push(c);
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokenize(text: &str) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// True if the normalized generation contains any accepted answer as a
/// substring.
pub fn soft_match(generation: &str, accepted: &[String]) -> bool {
    let generation = normalize_text(generation);
    accepted
        .iter()
        .any(|answer| generation.contains(&normalize_text(answer)))
}

/// True if the normalized generation equals some accepted answer exactly.
pub fn exact_match(generation: &str, accepted: &[String]) -> bool {
    let generation = normalize_text(generation);
    accepted.iter().any(|answer| generation == normalize_text(answer))
}

/// Token-level F1 against the best-matching accepted answer, in [0, 1].
pub fn f1_score(generation: &str, accepted: &[String]) -> f64 {
    let generation_tokens = tokenize(generation);
    accepted
        .iter()
        .map(|answer| token_f1(&generation_tokens, &tokenize(answer)))
        .fold(0.0, f64::max)
}

fn token_f1(prediction: &[String], gold: &[String]) -> f64 {
    if prediction.is_empty() && gold.is_empty() {
        return 1.0;
    }
    if prediction.is_empty() || gold.is_empty() {
        return 0.0;
    }

    let prediction_set: HashSet<&String> = prediction.iter().collect();
    let gold_set: HashSet<&String> = gold.iter().collect();

    let overlap = prediction_set.intersection(&gold_set).count();
    if overlap == 0 {
        return 0.0;
    }

    let precision = overlap as f64 / prediction_set.len() as f64;
    let recall = overlap as f64 / gold_set.len() as f64;

    2.0 * precision * recall / (precision + recall)
}
