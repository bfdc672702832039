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

//! Text parsers for the bcachefs sysfs pseudo-files.
//!
//! None of these files are a committed kernel ABI, so every parser here
//! skips what it does not recognise instead of failing. All of them work on
//! plain strings and never touch the filesystem.

pub mod alloc_debug;
pub mod capacity;
pub mod common;
pub mod usage;

pub use alloc_debug::{parse_alloc_debug, AllocRecord, AllocTable};
pub use capacity::{parse_capacity, CapacityRecord};
pub use common::parse_size;
pub use usage::{parse_usage_table, UsageRecord};
