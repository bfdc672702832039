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

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::collector::ScrapeConfig;
use crate::common::config::AppConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The address to serve Prometheus metrics on.
    #[arg(long, default_value = AppConfig::DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,
    /// The bcachefs sysfs root. Override to point at a fixture tree.
    #[arg(long, default_value = AppConfig::DEFAULT_SYSFS_ROOT)]
    pub root: PathBuf,
    /// Name of the per-device usage breakdown file.
    #[arg(long, default_value = AppConfig::DEFAULT_USAGE_FILE)]
    pub usage_file: String,
    /// Name of the per-device capacity file.
    #[arg(long, default_value = AppConfig::DEFAULT_CAPACITY_FILE)]
    pub capacity_file: String,
    /// Log filter directive, e.g. "debug" or "bcachefs_exporter=trace".
    /// RUST_LOG takes precedence when set.
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            root: self.root.clone(),
            usage_file: self.usage_file.clone(),
            capacity_file: self.capacity_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bcachefs-exporter"]).unwrap();
        assert_eq!(cli.listen, AppConfig::DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(cli.scrape_config(), ScrapeConfig::default());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "bcachefs-exporter",
            "--listen",
            "0.0.0.0:9100",
            "--root",
            "/tmp/fake",
            "--usage-file",
            "data_usage",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.listen.port(), 9100);
        let config = cli.scrape_config();
        assert_eq!(config.root, PathBuf::from("/tmp/fake"));
        assert_eq!(config.usage_file, "data_usage");
        assert_eq!(config.capacity_file, AppConfig::DEFAULT_CAPACITY_FILE);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_rejects_bad_listen_address() {
        assert!(Cli::try_parse_from(["bcachefs-exporter", "--listen", "nope"]).is_err());
    }
}
