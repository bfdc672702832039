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

//! Filesystem and device discovery over the bcachefs sysfs tree.
//!
//! The tree looks like `<root>/<fs-uuid>/dev-<n>/`. Filesystems can be
//! unmounted and devices removed while we walk it, so anything that
//! disappears or is not a directory is skipped rather than reported.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::config::AppConfig;
use crate::error::{Error, Result};
use crate::topology::types::{DeviceHandle, FilesystemInstance};

/// Walks the sysfs root. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Discoverer {
    root: PathBuf,
}

impl Discoverer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the filesystems currently registered under the root.
    ///
    /// The root listing happens here so that an unreachable root fails the
    /// call. Device directories are listed lazily as the returned iterator
    /// advances. A root that does not exist at all yields an empty iterator:
    /// that is a host with no bcachefs mounted, not a misconfiguration.
    pub fn discover(&self) -> Result<Filesystems> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(root = %self.root.display(), "sysfs root absent, no filesystems");
                return Ok(Filesystems::default());
            }
            Err(source) => {
                return Err(Error::RootUnreachable {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut candidates: Vec<(String, PathBuf)> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("skipping unreadable sysfs root entry: {e}");
                    None
                }
            })
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_owned();
                let path = entry.path();
                path.is_dir().then_some((name, path))
            })
            .collect();
        candidates.sort();

        Ok(Filesystems {
            pending: candidates.into_iter(),
        })
    }
}

impl Default for Discoverer {
    fn default() -> Self {
        Self::new(AppConfig::DEFAULT_SYSFS_ROOT)
    }
}

/// Lazy sequence of discovered filesystems, sorted by id.
#[derive(Debug, Default)]
pub struct Filesystems {
    pending: std::vec::IntoIter<(String, PathBuf)>,
}

impl Iterator for Filesystems {
    type Item = FilesystemInstance;

    fn next(&mut self) -> Option<Self::Item> {
        for (id, path) in self.pending.by_ref() {
            if let Some(devices) = list_devices(&id, &path) {
                return Some(FilesystemInstance { id, path, devices });
            }
        }
        None
    }
}

fn list_devices(fs_id: &str, fs_path: &Path) -> Option<Vec<DeviceHandle>> {
    let entries = match fs::read_dir(fs_path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(filesystem = fs_id, "skipping filesystem, cannot list devices: {e}");
            return None;
        }
    };

    let mut devices: Vec<DeviceHandle> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_owned();
            if !name.starts_with(AppConfig::DEVICE_DIR_PREFIX) {
                return None;
            }
            let path = entry.path();
            path.is_dir().then(|| DeviceHandle::new(fs_id, name, path))
        })
        .collect();
    devices.sort();

    Some(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_helpers::SysfsFixture;
    use std::collections::HashSet;

    #[test]
    fn test_absent_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let discoverer = Discoverer::new(dir.path().join("bcachefs"));
        assert_eq!(discoverer.discover().unwrap().count(), 0);
    }

    #[test]
    fn test_empty_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let discoverer = Discoverer::new(dir.path());
        assert_eq!(discoverer.discover().unwrap().count(), 0);
    }

    #[test]
    fn test_root_that_is_a_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("bcachefs");
        fs::write(&root, "").unwrap();

        let err = Discoverer::new(&root).discover().unwrap_err();
        assert!(matches!(err, Error::RootUnreachable { ref path, .. } if *path == root));
    }

    #[test]
    fn test_discovers_filesystems_and_devices() {
        let dir = tempfile::tempdir().unwrap();
        let sysfs = SysfsFixture::new(dir.path());
        sysfs.device("fs-b", "dev-1");
        sysfs.device("fs-a", "dev-0");
        sysfs.device("fs-a", "dev-2");

        let found: Vec<_> = Discoverer::new(dir.path()).discover().unwrap().collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "fs-a");
        let devices: Vec<_> = found[0].devices.iter().map(|d| d.device.as_str()).collect();
        assert_eq!(devices, ["dev-0", "dev-2"]);
        assert_eq!(found[0].devices[0].filesystem, "fs-a");
        assert_eq!(found[1].id, "fs-b");
    }

    #[test]
    fn test_ignores_non_device_entries() {
        let dir = tempfile::tempdir().unwrap();
        let sysfs = SysfsFixture::new(dir.path());
        sysfs.device("fs-a", "dev-0");
        fs::create_dir_all(dir.path().join("fs-a/internal")).unwrap();
        fs::create_dir_all(dir.path().join("fs-a/options")).unwrap();
        fs::write(dir.path().join("fs-a/dev-9"), "not a directory").unwrap();
        fs::write(dir.path().join("stray-file"), "").unwrap();

        let found: Vec<_> = Discoverer::new(dir.path()).discover().unwrap().collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].devices.len(), 1);
        assert_eq!(found[0].devices[0].device, "dev-0");
    }

    #[test]
    fn test_filesystem_removed_after_root_listing_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sysfs = SysfsFixture::new(dir.path());
        sysfs.device("fs-a", "dev-0");
        sysfs.device("fs-b", "dev-0");

        let mut filesystems = Discoverer::new(dir.path()).discover().unwrap();
        fs::remove_dir_all(dir.path().join("fs-a")).unwrap();

        let remaining: Vec<_> = filesystems.by_ref().map(|f| f.id).collect();
        assert_eq!(remaining, ["fs-b"]);
    }

    #[test]
    fn test_discover_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let sysfs = SysfsFixture::new(dir.path());
        sysfs.device("fs-a", "dev-0");
        sysfs.device("fs-a", "dev-1");
        sysfs.device("fs-b", "dev-3");

        let discoverer = Discoverer::new(dir.path());
        let first: HashSet<_> = discoverer.discover().unwrap().collect();
        let second: HashSet<_> = discoverer.discover().unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
