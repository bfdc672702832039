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

//! Builders for fake bcachefs sysfs trees used by unit and integration tests.

use std::fs;
use std::path::{Path, PathBuf};

/// Lays out `<root>/<fs>/<dev>/<file>` trees. Panics on I/O errors since it
/// only ever runs inside tests.
pub struct SysfsFixture {
    root: PathBuf,
}

impl SysfsFixture {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create an empty device directory and return its path.
    pub fn device(&self, fs: &str, dev: &str) -> PathBuf {
        let path = self.root.join(fs).join(dev);
        fs::create_dir_all(&path).expect("create fake device directory");
        path
    }

    /// Write a pseudo-file into a device directory, creating the device if needed.
    pub fn write(&self, fs: &str, dev: &str, file: &str, content: &str) -> PathBuf {
        let path = self.device(fs, dev).join(file);
        fs::write(&path, content).expect("write fake sysfs file");
        path
    }

    /// Point the device's `block` link at a fake block device node.
    #[cfg(unix)]
    pub fn link_block(&self, fs: &str, dev: &str, block_device: &str) -> PathBuf {
        // Kept inside the filesystem directory so discovery does not see it
        let target = self.root.join(fs).join("block_devices").join(block_device);
        fs::create_dir_all(&target).expect("create fake block device");
        let link = self.device(fs, dev).join("block");
        std::os::unix::fs::symlink(&target, &link).expect("create fake block link");
        link
    }

    pub fn remove_device(&self, fs: &str, dev: &str) {
        fs::remove_dir_all(self.root.join(fs).join(dev)).expect("remove fake device");
    }
}
