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

/// Every metric family the exporter can produce.
///
/// Declaration order is the order families appear in the exposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    UsageBytes,
    CapacityTotalBytes,
    CapacityAvailableBytes,
    AllocBytes,
    AllocBuckets,
    FragmentedBytes,
    BucketSizeBytes,
    AllocCapacityBytes,
    DeviceInfo,
}

impl MetricKind {
    pub const ALL: [MetricKind; 9] = [
        MetricKind::UsageBytes,
        MetricKind::CapacityTotalBytes,
        MetricKind::CapacityAvailableBytes,
        MetricKind::AllocBytes,
        MetricKind::AllocBuckets,
        MetricKind::FragmentedBytes,
        MetricKind::BucketSizeBytes,
        MetricKind::AllocCapacityBytes,
        MetricKind::DeviceInfo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::UsageBytes => "bcachefs_device_usage_bytes",
            MetricKind::CapacityTotalBytes => "bcachefs_device_capacity_total_bytes",
            MetricKind::CapacityAvailableBytes => "bcachefs_device_capacity_available_bytes",
            MetricKind::AllocBytes => "bcachefs_device_alloc_bytes",
            MetricKind::AllocBuckets => "bcachefs_device_alloc_buckets",
            MetricKind::FragmentedBytes => "bcachefs_device_fragmented_bytes",
            MetricKind::BucketSizeBytes => "bcachefs_device_bucket_size_bytes",
            MetricKind::AllocCapacityBytes => "bcachefs_device_alloc_capacity_bytes",
            MetricKind::DeviceInfo => "bcachefs_device_info",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            MetricKind::UsageBytes => "Bytes allocated on the device per usage category",
            MetricKind::CapacityTotalBytes => "Total capacity of the device in bytes",
            MetricKind::CapacityAvailableBytes => "Available capacity of the device in bytes",
            MetricKind::AllocBytes => "Bytes allocated per data type from alloc_debug",
            MetricKind::AllocBuckets => "Buckets allocated per data type from alloc_debug",
            MetricKind::FragmentedBytes => "Fragmented bytes per data type from alloc_debug",
            MetricKind::BucketSizeBytes => "Bucket size of the device in bytes",
            MetricKind::AllocCapacityBytes => {
                "Device capacity in bytes computed from alloc_debug buckets"
            }
            MetricKind::DeviceInfo => "Device metadata, value is always 1",
        }
    }

    pub fn metric_type(self) -> &'static str {
        "gauge"
    }
}

pub type Labels = Vec<(&'static str, String)>;

/// One exported value: metric family, ordered label pairs and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    pub kind: MetricKind,
    pub labels: Labels,
    pub value: u64,
}

impl MetricSample {
    pub fn new(kind: MetricKind, labels: Labels, value: u64) -> Self {
        Self {
            kind,
            labels,
            value,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Value of a label, if the sample carries it.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}
