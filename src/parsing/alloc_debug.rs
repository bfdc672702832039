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

//! Parser for the `alloc_debug` table.
//!
//! The first block of the file is a fixed-width table:
//!
//! ```text
//!                  buckets         sectors      fragmented
//! free                3771               0               0
//! sb                     7            6152             520
//! user               10340        20563552          611360
//! capacity           14348
//! ```
//!
//! Later blocks (reserves, open buckets, ...) follow after a blank line and
//! are not part of the table.

use crate::common::config::AppConfig;
use crate::parsing::common::parse_number;

const HEADER: [&str; 3] = ["buckets", "sectors", "fragmented"];

/// Convert a sector count into bytes, saturating on overflow.
pub fn sectors_to_bytes(sectors: u64) -> u64 {
    sectors.saturating_mul(1 << AppConfig::SECTOR_SHIFT)
}

/// One data type row of the allocator table. Sector counts are 512 byte units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocRecord {
    pub data_type: String,
    pub buckets: u64,
    pub sectors: u64,
    pub fragmented: u64,
}

impl AllocRecord {
    pub fn bytes(&self) -> u64 {
        sectors_to_bytes(self.sectors)
    }

    pub fn fragmented_bytes(&self) -> u64 {
        sectors_to_bytes(self.fragmented)
    }

    fn merge(&mut self, other: &AllocRecord) {
        self.buckets = self.buckets.saturating_add(other.buckets);
        self.sectors = self.sectors.saturating_add(other.sectors);
        self.fragmented = self.fragmented.saturating_add(other.fragmented);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocTable {
    pub records: Vec<AllocRecord>,
    /// Bucket count from the `capacity` row, if present.
    pub capacity_buckets: Option<u64>,
}

impl AllocTable {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.capacity_buckets.is_none()
    }

    /// Add a row, folding it into an earlier row of the same data type.
    fn insert(&mut self, record: AllocRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.data_type == record.data_type)
        {
            Some(existing) => existing.merge(&record),
            None => self.records.push(record),
        }
    }
}

/// Parse the first block of `alloc_debug`.
///
/// Rows for the same data type are summed so that each type maps to one
/// series.
pub fn parse_alloc_debug(text: &str) -> AllocTable {
    let mut table = AllocTable::default();
    let mut in_table = false;

    for line in text.lines() {
        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.is_empty() {
            if in_table {
                break;
            }
            continue;
        }
        if cells[..] == HEADER {
            in_table = true;
            continue;
        }

        match cells[..] {
            ["capacity", buckets] => match parse_number::<u64>(buckets) {
                Some(buckets) => {
                    table.capacity_buckets.get_or_insert(buckets);
                    in_table = true;
                }
                None => tracing::trace!(line, "skipping malformed alloc_debug capacity row"),
            },
            [data_type, buckets, sectors, fragmented] => {
                let parsed = (
                    parse_number::<u64>(buckets),
                    parse_number::<u64>(sectors),
                    parse_number::<u64>(fragmented),
                );
                if let (Some(buckets), Some(sectors), Some(fragmented)) = parsed {
                    table.insert(AllocRecord {
                        data_type: data_type.to_string(),
                        buckets,
                        sectors,
                        fragmented,
                    });
                    in_table = true;
                } else {
                    tracing::trace!(line, "skipping malformed alloc_debug row");
                }
            }
            _ => tracing::trace!(line, "skipping unrecognised alloc_debug row"),
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "\
                 buckets         sectors      fragmented
free                3771               0               0
sb                     7            6152             520
journal              512         1048576               0
btree                120          245760           19456
user               10340        20563552          611360
cached                 0               0               0
parity                 0               0               0
stripe                 0               0               0
need_gc_gens           0               0               0
need_discard           0               0               0
capacity           14750

reserves:
btree                  0
copygc               147
";

    #[test]
    fn test_parse_fixture() {
        let table = parse_alloc_debug(FIXTURE);
        assert_eq!(table.records.len(), 10);
        assert_eq!(table.capacity_buckets, Some(14750));

        let user = table
            .records
            .iter()
            .find(|r| r.data_type == "user")
            .unwrap();
        assert_eq!(user.buckets, 10340);
        assert_eq!(user.sectors, 20_563_552);
        assert_eq!(user.fragmented, 611_360);
    }

    #[test]
    fn test_stops_at_first_blank_line() {
        let table = parse_alloc_debug(FIXTURE);
        assert!(table.records.iter().all(|r| r.data_type != "copygc"));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "\
buckets sectors fragmented
user 10 x 0
btree 1 2 3
this row has five cells
capacity many
";
        let table = parse_alloc_debug(text);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].data_type, "btree");
        assert_eq!(table.capacity_buckets, None);
    }

    #[test]
    fn test_header_is_optional() {
        let table = parse_alloc_debug("user 1 8 0\ncapacity 2\n");
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.capacity_buckets, Some(2));
    }

    #[test]
    fn test_repeated_type_is_summed() {
        let text = "\
buckets sectors fragmented
user 1 8 0
btree 1 1 1
user 2 16 4
";
        let table = parse_alloc_debug(text);
        assert_eq!(table.records.len(), 2);
        assert_eq!(
            table.records[0],
            AllocRecord {
                data_type: "user".to_string(),
                buckets: 3,
                sectors: 24,
                fragmented: 4,
            }
        );
        assert_eq!(table.records[0].bytes(), 12_288);
        assert_eq!(table.records[0].fragmented_bytes(), 2048);
    }

    #[test]
    fn test_sectors_to_bytes() {
        assert_eq!(sectors_to_bytes(0), 0);
        assert_eq!(sectors_to_bytes(1), 512);
        assert_eq!(sectors_to_bytes(8), 4096);
        assert_eq!(sectors_to_bytes(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_alloc_debug("").is_empty());
        assert!(parse_alloc_debug("\n\nnot a table\n").is_empty());
    }
}
