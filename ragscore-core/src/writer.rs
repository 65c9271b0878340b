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

//! Result persistence
//!
//! Raw inference results go to `rag_output-<name>time=<timestamp>.jsonl`,
//! one record per line; the evaluation report goes to the same name with an
//! `.evaluation` suffix. Both files belong to one run and are written once.

use crate::record::{AnswerField, InferenceRecord};
use crate::report::EvaluationReport;
use chrono::Utc;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors from persisting results.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append one structured record to an in-memory result collection.
pub fn record_result(
    results: &mut Vec<InferenceRecord>,
    question: impl Into<String>,
    answer: AnswerField,
    final_prediction: impl Into<String>,
) {
    results.push(InferenceRecord::new(question, answer, final_prediction));
}

/// Writes a run's result and evaluation files under one output directory.
pub struct ResultWriter {
    output_dir: PathBuf,
    file_name: String,
    timestamp: String,
}

impl ResultWriter {
    /// Create a writer with an explicit run timestamp.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: file_name.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Create a writer stamped with the current UTC time.
    pub fn stamped(output_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        let timestamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        Self::new(output_dir, file_name, timestamp)
    }

    /// Path of the raw-results file for this run.
    pub fn results_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "rag_output-{}time={}.jsonl",
            self.file_name, self.timestamp
        ))
    }

    /// Path of the evaluation-report file for this run.
    pub fn evaluation_path(&self) -> PathBuf {
        let mut name = self
            .results_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push_str(".evaluation");
        self.output_dir.join(name)
    }

    /// Persist inference results as line-delimited JSON.
    pub fn write_results(&self, records: &[InferenceRecord]) -> Result<PathBuf, WriteError> {
        let path = self.results_path();
        info!("storing inference results");
        self.write_lines(&path, records)?;
        info!("output file path: {}", path.display());
        Ok(path)
    }

    /// Persist the evaluation report as a single-line JSON file.
    pub fn write_evaluation(&self, report: &EvaluationReport) -> Result<PathBuf, WriteError> {
        let path = self.evaluation_path();
        self.write_lines(&path, std::slice::from_ref(report))?;
        info!("evaluation file path: {}", path.display());
        Ok(path)
    }

    fn write_lines<T: serde::Serialize>(
        &self,
        path: &Path,
        items: &[T],
    ) -> Result<(), WriteError> {
        let io_err = |source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.output_dir).map_err(io_err)?;
        let file = fs::File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        for item in items {
            let line = serde_json::to_string(item)?;
            writeln!(out, "{line}").map_err(io_err)?;
        }
        out.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::EvalOutcome;

    #[test]
    fn test_file_naming_convention() {
        let writer = ResultWriter::new("/tmp/out", "pubhealth", "2026-08-07_12-00-00");
        assert_eq!(
            writer.results_path(),
            PathBuf::from("/tmp/out/rag_output-pubhealthtime=2026-08-07_12-00-00.jsonl")
        );
        assert_eq!(
            writer.evaluation_path(),
            PathBuf::from("/tmp/out/rag_output-pubhealthtime=2026-08-07_12-00-00.jsonl.evaluation")
        );
    }

    #[test]
    fn test_write_results_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::stamped(dir.path(), "run");

        let mut results = Vec::new();
        record_result(&mut results, "q1", AnswerField::Text("a1".to_string()), "g1");
        record_result(&mut results, "q2", AnswerField::Absent, "g2");

        let path = writer.write_results(&results).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: InferenceRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, results[0]);
    }

    #[test]
    fn test_write_evaluation_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::stamped(dir.path(), "run");

        let report = EvaluationReport::new()
            .with_score("exact_match", EvalOutcome::Score(1.0))
            .with_score("llm_judge", EvalOutcome::NoAnswer);

        let path = writer.write_evaluation(&report).unwrap();
        assert!(path.to_string_lossy().ends_with(".jsonl.evaluation"));

        let contents = fs::read_to_string(path).unwrap();
        let back: EvaluationReport = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(back, report);
    }
}
