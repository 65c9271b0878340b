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

//! # Ragscore Evaluation
//!
//! Scores question-answering predictions against reference answers.
//!
//! ## Features
//!
//! - **String metrics**: soft match, exact match, and token-level F1,
//!   aggregated to a mean over a record set
//! - **LLM-as-judge**: semantic-consistency accuracy with bounded
//!   concurrent oracle calls
//! - **No-answer propagation**: a record without a reference answer turns
//!   the whole pass into [`EvalOutcome::NoAnswer`](ragscore_core::EvalOutcome)
//!   instead of a score
//!
//! ## Example
//!
//! ```rust,ignore
//! use ragscore_evals::{eval_accuracy, ConsistencyJudge, JudgeConfig};
//! use ragscore_evals::llm_client::OpenAIClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let records = ragscore_core::load_records("rag_output.jsonl").unwrap();
//!
//!     let accuracy = eval_accuracy(&records).unwrap();
//!
//!     let client = Arc::new(OpenAIClient::from_key_file("api.key", "gpt-4o-mini").unwrap());
//!     let judge = ConsistencyJudge::new(client).with_config(JudgeConfig::default());
//!     let judged = judge.judge_records(&records).await.unwrap();
//!
//!     println!("accuracy={accuracy} judge={}", judged.accuracy);
//! }
//! ```

use thiserror::Error;

pub mod aggregate;
pub mod judge;
pub mod llm_client;
pub mod metrics;
pub mod normalize;

pub use aggregate::{aggregate, eval_accuracy, eval_exact_match, eval_f1_score};
pub use judge::{ConsistencyJudge, JudgeConfig, JudgeReport, RecordVerdict};
pub use llm_client::{LLMClient, LLMError, OpenAIClient};
pub use metrics::{exact_match, f1_score, normalize_text, soft_match};
pub use normalize::{accepted_answers, representative_answer};

/// Errors from an evaluation pass.
///
/// A missing reference answer is not represented here: it is the
/// [`EvalOutcome::NoAnswer`](ragscore_core::EvalOutcome) result value.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Aggregating over zero records has no defined mean.
    #[error("cannot evaluate an empty record set")]
    EmptyInput,

    /// A judge task aborted instead of returning a verdict.
    #[error("judge task panicked: {0}")]
    TaskPanic(String),
}
