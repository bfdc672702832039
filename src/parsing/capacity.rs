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

//! Parser for the per-device capacity file.
//!
//! Accepts `total=2000000000000 avail=450000000000` (whitespace or comma
//! separated, spaces around `=` allowed) as well as one `key: value` pair
//! per line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::common::parse_size;

static PAIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*=\s*([^\s,]+)").expect("valid capacity pair regex"));

/// Total and available bytes of one device.
///
/// A field is None when the file did not carry a parseable value for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapacityRecord {
    pub total: Option<u64>,
    pub available: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CapacityField {
    Total,
    Available,
}

impl CapacityField {
    fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "total" | "capacity" | "size" => Some(Self::Total),
            "avail" | "available" | "free" => Some(Self::Available),
            _ => None,
        }
    }
}

/// Parse a capacity file. Returns None when neither field could be read.
///
/// Unknown keys are ignored. When a field appears twice the first
/// parseable value wins.
pub fn parse_capacity(text: &str) -> Option<CapacityRecord> {
    let mut record = CapacityRecord::default();

    for (key, value) in capacity_pairs(text) {
        let Some(field) = CapacityField::from_key(key) else {
            continue;
        };
        let Some(bytes) = parse_size(value) else {
            tracing::trace!(key, value, "skipping malformed capacity field");
            continue;
        };
        let slot = match field {
            CapacityField::Total => &mut record.total,
            CapacityField::Available => &mut record.available,
        };
        slot.get_or_insert(bytes);
    }

    (record.total.is_some() || record.available.is_some()).then_some(record)
}

fn capacity_pairs(text: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    for line in text.lines() {
        if line.contains('=') {
            pairs.extend(PAIR_RE.captures_iter(line).map(|caps| {
                let (_, [key, value]) = caps.extract();
                (key, value)
            }));
        } else if let Some((key, value)) = line.split_once(':') {
            pairs.push((key, value.trim()));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_tokens() {
        let record = parse_capacity("total=2000000000000 avail=450000000000\n").unwrap();
        assert_eq!(record.total, Some(2_000_000_000_000));
        assert_eq!(record.available, Some(450_000_000_000));
    }

    #[test]
    fn test_comma_separated_and_aliases() {
        let record = parse_capacity("capacity=1T, free=512G").unwrap();
        assert_eq!(record.total, Some(1 << 40));
        assert_eq!(record.available, Some(512 << 30));
    }

    #[test]
    fn test_colon_lines() {
        let text = "total:     1.5 TiB\navailable: 200 GiB\nbuckets:   1000\n";
        let record = parse_capacity(text).unwrap();
        assert_eq!(record.total, Some(1_649_267_441_664));
        assert_eq!(record.available, Some(214_748_364_800));
    }

    #[test]
    fn test_spaces_around_equals() {
        let record = parse_capacity("total = 5 avail= 3 , size =9\n").unwrap();
        assert_eq!(record.total, Some(5));
        assert_eq!(record.available, Some(3));
    }

    #[test]
    fn test_partial_record() {
        let record = parse_capacity("total=100 avail=lots").unwrap();
        assert_eq!(record.total, Some(100));
        assert_eq!(record.available, None);
    }

    #[test]
    fn test_first_value_wins() {
        let record = parse_capacity("total=1 total=2 avail=3").unwrap();
        assert_eq!(record.total, Some(1));
    }

    #[test]
    fn test_unparseable_file() {
        assert_eq!(parse_capacity(""), None);
        assert_eq!(parse_capacity("nbuckets=100 first_bucket=8"), None);
        assert_eq!(parse_capacity("garbage"), None);
    }
}
