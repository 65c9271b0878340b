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

//! Ragscore Core
//!
//! Record schema, dataset loading, and result persistence for the ragscore
//! evaluation harness. The inference stage produces [`InferenceRecord`]s;
//! the evaluation crate consumes them read-only and produces an
//! [`EvaluationReport`].

pub mod dataset;
pub mod record;
pub mod report;
pub mod writer;

pub use dataset::{load_records, parse_records, DatasetError};
pub use record::{AnswerField, AnswerTypeError, InferenceRecord};
pub use report::{EvalOutcome, EvaluationReport, NO_ANSWER_SENTINEL};
pub use writer::{record_result, ResultWriter, WriteError};
