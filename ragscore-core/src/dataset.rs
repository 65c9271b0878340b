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

//! Dataset loading
//!
//! Gold data and stored inference results share one on-disk convention: a
//! `.json` file holds a single JSON array of records, anything else is
//! line-delimited JSON with one record per line. Ingestion is all-or-nothing:
//! a single malformed record aborts the load with its position, rather than
//! being skipped.

use crate::record::InferenceRecord;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors from loading a record file.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON array: {0}")]
    MalformedArray(#[source] serde_json::Error),

    #[error("malformed JSON on line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Load records from a `.json` array file or a line-delimited JSON file.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<InferenceRecord>, DatasetError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let values = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str::<Vec<serde_json::Value>>(&contents)
            .map_err(DatasetError::MalformedArray)?
    } else {
        let mut values = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value = serde_json::from_str(line).map_err(|source| {
                DatasetError::MalformedLine {
                    line: number + 1,
                    source,
                }
            })?;
            values.push(value);
        }
        values
    };

    let records = parse_records(values)?;
    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Convert raw JSON objects into typed records.
///
/// Every evaluation path consumes records through this boundary, so an
/// unsupported answer shape fails here, once, with the record's position.
pub fn parse_records(
    values: Vec<serde_json::Value>,
) -> Result<Vec<InferenceRecord>, DatasetError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|source| DatasetError::InvalidRecord { index, source })
        })
        .collect()
}
