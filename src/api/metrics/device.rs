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

use super::{MetricBuilder, MetricExporter};
use crate::translate::{MetricKind, MetricSample};

/// Renders the samples of one scrape pass.
///
/// Families are written in [`MetricKind::ALL`] order with a single HELP and
/// TYPE header each; families without samples are omitted.
pub struct DeviceMetricExporter<'a> {
    samples: &'a [MetricSample],
}

impl<'a> DeviceMetricExporter<'a> {
    pub fn new(samples: &'a [MetricSample]) -> Self {
        Self { samples }
    }

    fn export_family(&self, builder: &mut MetricBuilder, kind: MetricKind) {
        let mut family = self.samples.iter().filter(|s| s.kind == kind).peekable();
        if family.peek().is_none() {
            return;
        }

        builder
            .help(kind.name(), kind.help())
            .type_(kind.name(), kind.metric_type());

        for sample in family {
            let labels: Vec<(&str, &str)> = sample
                .labels
                .iter()
                .map(|(key, value)| (*key, value.as_str()))
                .collect();
            builder.metric(sample.name(), &labels, sample.value);
        }
    }
}

impl<'a> MetricExporter for DeviceMetricExporter<'a> {
    fn export_metrics(&self) -> String {
        let mut builder = MetricBuilder::new();

        for kind in MetricKind::ALL {
            self.export_family(&mut builder, kind);
        }

        builder.build()
    }
}
