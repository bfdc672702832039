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

//! One scrape pass: discover, translate every device, merge.
//!
//! Nothing is cached between passes. Devices are translated on tokio's
//! blocking pool, one task per device, and merged after all of them finish.
//! Dropping the returned future drops the task set, which aborts whatever
//! has not started yet and discards any partial results.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::common::config::AppConfig;
use crate::error::Result;
use crate::topology::{DeviceHandle, Discoverer, FilesystemInstance};
use crate::translate::{MetricSample, Translator};

/// Runtime settings for a scrape pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub root: PathBuf,
    pub usage_file: String,
    pub capacity_file: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(AppConfig::DEFAULT_SYSFS_ROOT),
            usage_file: AppConfig::DEFAULT_USAGE_FILE.to_string(),
            capacity_file: AppConfig::DEFAULT_CAPACITY_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Collector {
    discoverer: Discoverer,
    translator: Arc<Translator>,
}

impl Collector {
    pub fn new(config: ScrapeConfig) -> Self {
        Self {
            discoverer: Discoverer::new(config.root),
            translator: Arc::new(Translator::new(config.usage_file, config.capacity_file)),
        }
    }

    pub fn discoverer(&self) -> &Discoverer {
        &self.discoverer
    }

    /// Run one full scrape pass.
    ///
    /// Fails only when the sysfs root is unreachable. Everything else
    /// degrades to fewer samples.
    pub async fn collect(&self) -> Result<Vec<MetricSample>> {
        let discoverer = self.discoverer.clone();
        let filesystems: Vec<FilesystemInstance> = tokio::task::spawn_blocking(move || {
            discoverer.discover().map(|found| found.collect::<Vec<_>>())
        })
        .await??;

        let devices: Vec<DeviceHandle> = filesystems
            .iter()
            .flat_map(|fs| fs.devices.iter().cloned())
            .collect();

        let mut per_device: Vec<Vec<MetricSample>> = vec![Vec::new(); devices.len()];
        let mut tasks = JoinSet::new();
        for (index, device) in devices.into_iter().enumerate() {
            let translator = Arc::clone(&self.translator);
            tasks.spawn_blocking(move || (index, translator.translate(&device)));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, device_samples)) => per_device[index] = device_samples,
                Err(e) => tracing::warn!("device translation task failed: {e}"),
            }
        }

        let samples: Vec<MetricSample> = per_device.into_iter().flatten().collect();
        tracing::debug!(
            filesystems = filesystems.len(),
            samples = samples.len(),
            "scrape complete"
        );
        Ok(samples)
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(ScrapeConfig::default())
    }
}
