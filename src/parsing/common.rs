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

// Common parsing utilities for number extraction and human-readable size conversion.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*([A-Za-z]*)$").expect("valid size regex"));

/// Parse a number from a string after sanitizing by removing commas, underscores, and trimming.
/// Returns None if parsing fails.
pub fn parse_number<T: FromStr>(s: &str) -> Option<T> {
    let cleaned = s.trim().replace([',', '_'], "");
    cleaned.parse::<T>().ok()
}

/// Multiplier for a size unit suffix, or None if the suffix is unknown.
///
/// bcachefs prints human-readable sizes in powers of 1024, with either a
/// bare letter (`12.3G`) or an IEC suffix (`12.3 GiB`). Two-letter SI
/// suffixes (`GB`) are honoured as powers of 1000.
pub fn unit_multiplier(unit: &str) -> Option<u64> {
    let mul = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KIB" => 1 << 10,
        "M" | "MIB" => 1 << 20,
        "G" | "GIB" => 1 << 30,
        "T" | "TIB" => 1 << 40,
        "P" | "PIB" => 1 << 50,
        "E" | "EIB" => 1 << 60,
        "KB" => 1_000,
        "MB" => 1_000_000,
        "GB" => 1_000_000_000,
        "TB" => 1_000_000_000_000,
        "PB" => 1_000_000_000_000_000,
        "EB" => 1_000_000_000_000_000_000,
        _ => return None,
    };
    Some(mul)
}

/// Convert a floating-point quantity with a unit into bytes, rounded to the nearest byte.
pub fn to_bytes(value: f64, unit: &str) -> Option<u64> {
    let mul = unit_multiplier(unit)?;
    let bytes = (value * mul as f64).round();
    if bytes.is_finite() && bytes >= 0.0 && bytes < u64::MAX as f64 {
        Some(bytes as u64)
    } else {
        None
    }
}

/// Parse a size such as `4096`, `256k`, `12.3 GiB` or `1.5TB` into bytes.
///
/// Whole numbers are multiplied in integer arithmetic so large plain byte
/// counts keep full precision.
pub fn parse_size(s: &str) -> Option<u64> {
    let cap = SIZE_RE.captures(s.trim())?;
    let magnitude = cap.get(1)?.as_str();
    let unit = cap.get(2).map_or("", |m| m.as_str());

    if let Ok(whole) = magnitude.parse::<u64>() {
        return whole.checked_mul(unit_multiplier(unit)?);
    }
    to_bytes(magnitude.parse::<f64>().ok()?, unit)
}
