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

//! Parser for the per-device usage breakdown table.
//!
//! The table is meant for humans and has no stable layout. A row we can use
//! looks like `user_data: 12.3 GiB`; anything else (headers, rulers, blank
//! lines, rows with an unknown unit) is skipped and the rest of the table is
//! still parsed.

use crate::parsing::common::parse_size;

/// Bytes allocated on a device for one data category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    /// Category label exactly as printed by the kernel.
    pub category: String,
    pub bytes: u64,
}

/// Parse a usage breakdown table into one record per category.
///
/// A category printed more than once is summed into a single record so the
/// exported label sets stay unique. Records keep first-seen order.
pub fn parse_usage_table(text: &str) -> Vec<UsageRecord> {
    let mut records: Vec<UsageRecord> = Vec::new();

    for line in text.lines() {
        let Some(record) = parse_usage_line(line) else {
            if !line.trim().is_empty() {
                tracing::trace!(line, "skipping unrecognised usage row");
            }
            continue;
        };

        match records.iter_mut().find(|r| r.category == record.category) {
            Some(existing) => existing.bytes = existing.bytes.saturating_add(record.bytes),
            None => records.push(record),
        }
    }

    records
}

/// Parse one `<label>: <size>` row. Returns None for any other shape.
pub fn parse_usage_line(line: &str) -> Option<UsageRecord> {
    let (label, size) = line.split_once(':')?;
    let category = label.trim();
    if category.is_empty() {
        return None;
    }

    Some(UsageRecord {
        category: category.to_string(),
        bytes: parse_size(size)?,
    })
}
