// Copyright 2025 Lablup Inc. and Jeongkyu Shin
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

//! Unified error types for the exporter.
//!
//! Only a small set of conditions are errors at all. A missing sysfs root,
//! vanished device directories and malformed table rows are normal operating
//! states and never surface here; see [`crate::topology`] and
//! [`crate::translate`] for how they degrade.
//!
//! # Example
//!
//! ```rust,no_run
//! use bcachefs_exporter::collector::{Collector, ScrapeConfig};
//! use bcachefs_exporter::Result;
//!
//! async fn count_samples() -> Result<usize> {
//!     let collector = Collector::new(ScrapeConfig::default());
//!     Ok(collector.collect().await?.len())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for exporter operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The sysfs root exists but cannot be listed.
    ///
    /// This indicates a misconfiguration (wrong `--root`, missing
    /// permissions) rather than a transient race, so it is the one
    /// condition that fails a whole scrape.
    #[error("bcachefs sysfs root {} is unreachable: {source}", path.display())]
    RootUnreachable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking scrape task panicked or was cancelled.
    #[error("Scrape task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The HTTP server could not be started or failed while serving.
    #[error("Server error: {0}")]
    Server(String),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for exporter operations.
pub type Result<T> = std::result::Result<T, Error>;
