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

//! LLM-as-judge consistency evaluation
//!
//! For each record the judge asks an external LLM whether the reference
//! answer and the generation are consistent, then aggregates the binary
//! verdicts to an accuracy ratio. Oracle calls dominate latency and are
//! independent, so records are judged concurrently under a semaphore cap;
//! verdicts stay index-aligned with the input so the denominator is exact.

use crate::llm_client::LLMClient;
use crate::normalize::representative_answer;
use crate::EvalError;
use ragscore_core::{EvalOutcome, InferenceRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, warn};

/// Tunables for a judge pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Maximum simultaneously in-flight oracle calls. A resource-protection
    /// cap, not a correctness requirement.
    pub max_concurrent: usize,

    /// Per-call timeout; a timeout counts as a failed call, not an aborted
    /// pass.
    pub timeout_secs: u64,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 100,
            timeout_secs: 30,
        }
    }
}

/// Verdict for one record, index-aligned with the judged input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordVerdict {
    pub index: usize,

    /// Whether the oracle judged reference and generation consistent.
    pub verdict: bool,

    /// True when the verdict is `false` because the call errored or timed
    /// out rather than because the oracle answered.
    pub failed: bool,
}

/// Outcome of a judge pass: accuracy plus the per-record verdicts.
#[derive(Debug, Clone)]
pub struct JudgeReport {
    pub accuracy: EvalOutcome,
    pub verdicts: Vec<RecordVerdict>,
}

impl JudgeReport {
    /// Number of records whose oracle call failed or timed out.
    pub fn failed_calls(&self) -> usize {
        self.verdicts.iter().filter(|v| v.failed).count()
    }
}

/// Judges semantic consistency between reference answers and generations.
pub struct ConsistencyJudge {
    client: Arc<dyn LLMClient>,
    config: JudgeConfig,
}

impl ConsistencyJudge {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            config: JudgeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: JudgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the judgment prompt for one record.
    pub fn build_prompt(question: &str, answer: &str, generation: &str) -> String {
        format!(
            "Given a question, determine whether the two answers are consistent, \
             and output True or False.\n\
             Question: {question}\n\
             Answer 1: {answer}\n\
             Answer 2: {generation}\n\
             Result:"
        )
    }

    /// Judge every record and reduce to `count(true) / total`.
    ///
    /// Any record without a reference answer turns the whole pass into
    /// [`EvalOutcome::NoAnswer`] before a single oracle call is made.
    pub async fn judge_records(
        &self,
        records: &[InferenceRecord],
    ) -> Result<JudgeReport, EvalError> {
        if records.is_empty() {
            return Err(EvalError::EmptyInput);
        }

        // Resolve representatives up front: the no-answer short-circuit must
        // not depend on how far concurrent dispatch has progressed.
        let mut prompts = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let Some(answer) = representative_answer(&record.answer) else {
                warn!("record {} has no reference answer; aborting judge pass", index);
                return Ok(JudgeReport {
                    accuracy: EvalOutcome::NoAnswer,
                    verdicts: Vec::new(),
                });
            };
            // An empty reference is a firm non-match; skip the oracle call.
            let prompt = (!answer.is_empty())
                .then(|| Self::build_prompt(&record.question, &answer, &record.generation));
            prompts.push(prompt);
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let timeout = Duration::from_secs(self.config.timeout_secs);

        let mut tasks = Vec::with_capacity(prompts.len());
        for (index, prompt) in prompts.into_iter().enumerate() {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);

            tasks.push(tokio::spawn(async move {
                let Some(prompt) = prompt else {
                    return RecordVerdict {
                        index,
                        verdict: false,
                        failed: false,
                    };
                };

                let _permit = semaphore.acquire().await.unwrap();
                match tokio::time::timeout(timeout, client.complete(prompt)).await {
                    Ok(Ok(response)) => RecordVerdict {
                        index,
                        verdict: parse_verdict(&response),
                        failed: false,
                    },
                    Ok(Err(e)) => {
                        error!("judge call for record {} failed: {}", index, e);
                        RecordVerdict {
                            index,
                            verdict: false,
                            failed: true,
                        }
                    }
                    Err(_) => {
                        error!("judge call for record {} timed out", index);
                        RecordVerdict {
                            index,
                            verdict: false,
                            failed: true,
                        }
                    }
                }
            }));
        }

        // Tasks complete in any order; collecting in spawn order keeps the
        // verdict list aligned with the input records.
        let joined = futures::future::join_all(tasks).await;
        let mut verdicts = Vec::with_capacity(joined.len());
        for task in joined {
            match task {
                Ok(verdict) => verdicts.push(verdict),
                Err(e) => return Err(EvalError::TaskPanic(e.to_string())),
            }
        }

        let hits = verdicts.iter().filter(|v| v.verdict).count();
        let accuracy = hits as f64 / verdicts.len() as f64;

        Ok(JudgeReport {
            accuracy: EvalOutcome::Score(accuracy),
            verdicts,
        })
    }
}

/// The oracle's text answer counts as consistent iff it contains "true"
/// case-insensitively; refusals, errors, and everything else are false.
fn parse_verdict(response: &str) -> bool {
    response.trim().to_lowercase().contains("true")
}
