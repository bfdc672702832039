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

//! Per-device read, parse and map.
//!
//! Every pseudo-file is optional. A file that cannot be read or parsed
//! contributes no samples and is logged at debug level at most. If the
//! device directory itself is gone once the reads are done, the whole
//! device is dropped so a half-removed device never exports partial data.

use std::fs;

use crate::common::config::AppConfig;
use crate::parsing::{parse_alloc_debug, parse_capacity, parse_size, parse_usage_table};
use crate::topology::DeviceHandle;
use crate::translate::sample::{Labels, MetricKind, MetricSample};

/// Raw contents of a device's pseudo-files, read in one pass.
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    pub usage: Option<String>,
    pub capacity: Option<String>,
    pub alloc_debug: Option<String>,
    pub bucket_size: Option<String>,
    pub label: Option<String>,
    pub block_device: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Translator {
    usage_file: String,
    capacity_file: String,
}

impl Translator {
    pub fn new(usage_file: impl Into<String>, capacity_file: impl Into<String>) -> Self {
        Self {
            usage_file: usage_file.into(),
            capacity_file: capacity_file.into(),
        }
    }

    /// Read, parse and map one device. Never fails; see the module docs.
    pub fn translate(&self, device: &DeviceHandle) -> Vec<MetricSample> {
        let snapshot = self.read_snapshot(device);

        if !device.path.is_dir() {
            tracing::debug!(
                filesystem = %device.filesystem,
                device = %device.device,
                "device vanished during scrape, dropping its samples"
            );
            return Vec::new();
        }

        map_snapshot(device, &snapshot)
    }

    pub fn read_snapshot(&self, device: &DeviceHandle) -> DeviceSnapshot {
        DeviceSnapshot {
            usage: read_pseudo_file(device, &self.usage_file),
            capacity: read_pseudo_file(device, &self.capacity_file),
            alloc_debug: read_pseudo_file(device, AppConfig::ALLOC_DEBUG_FILE),
            bucket_size: read_pseudo_file(device, AppConfig::BUCKET_SIZE_FILE),
            label: read_pseudo_file(device, AppConfig::LABEL_FILE)
                .map(|s| s.trim().to_string()),
            block_device: read_block_device(device),
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(AppConfig::DEFAULT_USAGE_FILE, AppConfig::DEFAULT_CAPACITY_FILE)
    }
}

/// Map the raw file contents of one device into samples.
pub fn map_snapshot(device: &DeviceHandle, snapshot: &DeviceSnapshot) -> Vec<MetricSample> {
    let base = device_labels(device);
    let mut samples = Vec::new();

    if let Some(text) = &snapshot.usage {
        let records = parse_usage_table(text);
        if records.is_empty() {
            tracing::debug!(device = %device.device, "usage table had no parseable rows");
        }
        for record in records {
            samples.push(MetricSample::new(
                MetricKind::UsageBytes,
                with_label(&base, "category", record.category),
                record.bytes,
            ));
        }
    }

    match snapshot.capacity.as_deref().map(parse_capacity) {
        Some(Some(capacity)) => {
            if let Some(total) = capacity.total {
                samples.push(MetricSample::new(
                    MetricKind::CapacityTotalBytes,
                    base.clone(),
                    total,
                ));
            }
            if let Some(available) = capacity.available {
                samples.push(MetricSample::new(
                    MetricKind::CapacityAvailableBytes,
                    base.clone(),
                    available,
                ));
            }
        }
        Some(None) => {
            tracing::debug!(device = %device.device, "capacity file had no parseable fields")
        }
        None => {}
    }

    let bucket_size = snapshot.bucket_size.as_deref().and_then(parse_size);
    if let Some(bucket_size) = bucket_size {
        samples.push(MetricSample::new(
            MetricKind::BucketSizeBytes,
            base.clone(),
            bucket_size,
        ));
    }

    if let Some(text) = &snapshot.alloc_debug {
        let table = parse_alloc_debug(text);
        if table.is_empty() {
            tracing::debug!(device = %device.device, "alloc_debug had no parseable rows");
        }
        for record in &table.records {
            let labels = with_label(&base, "type", record.data_type.clone());
            samples.push(MetricSample::new(
                MetricKind::AllocBytes,
                labels.clone(),
                record.bytes(),
            ));
            samples.push(MetricSample::new(
                MetricKind::AllocBuckets,
                labels.clone(),
                record.buckets,
            ));
            samples.push(MetricSample::new(
                MetricKind::FragmentedBytes,
                labels,
                record.fragmented_bytes(),
            ));
        }
        if let (Some(buckets), Some(bucket_size)) = (table.capacity_buckets, bucket_size) {
            samples.push(MetricSample::new(
                MetricKind::AllocCapacityBytes,
                base.clone(),
                buckets.saturating_mul(bucket_size),
            ));
        }
    }

    if snapshot.label.is_some() || snapshot.block_device.is_some() {
        let mut labels = base;
        labels.push((
            "block_device",
            snapshot.block_device.clone().unwrap_or_default(),
        ));
        labels.push(("label", snapshot.label.clone().unwrap_or_default()));
        samples.push(MetricSample::new(MetricKind::DeviceInfo, labels, 1));
    }

    samples
}

fn device_labels(device: &DeviceHandle) -> Labels {
    vec![
        ("filesystem", device.filesystem.clone()),
        ("device", device.device.clone()),
    ]
}

fn with_label(base: &Labels, key: &'static str, value: String) -> Labels {
    let mut labels = base.clone();
    labels.push((key, value));
    labels
}

fn read_pseudo_file(device: &DeviceHandle, name: &str) -> Option<String> {
    match fs::read_to_string(device.file(name)) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(
                filesystem = %device.filesystem,
                device = %device.device,
                file = name,
                "pseudo-file unavailable: {e}"
            );
            None
        }
    }
}

fn read_block_device(device: &DeviceHandle) -> Option<String> {
    let target = fs::read_link(device.file(AppConfig::BLOCK_LINK)).ok()?;
    Some(target.file_name()?.to_str()?.to_string())
}
