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

use std::path::{Path, PathBuf};

/// One mounted bcachefs instance, as found under the sysfs root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilesystemInstance {
    /// Directory name under the sysfs root (the filesystem UUID on real systems).
    pub id: String,
    pub path: PathBuf,
    pub devices: Vec<DeviceHandle>,
}

/// One member device of a filesystem.
///
/// Only valid for the scrape that discovered it; the directory may be gone
/// by the time it is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceHandle {
    pub filesystem: String,
    /// Directory name of the device, e.g. `dev-0`.
    pub device: String,
    pub path: PathBuf,
}

impl DeviceHandle {
    pub fn new(filesystem: impl Into<String>, device: impl Into<String>, path: PathBuf) -> Self {
        Self {
            filesystem: filesystem.into(),
            device: device.into(),
            path,
        }
    }

    /// Path of a pseudo-file inside the device directory.
    pub fn file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }
}
