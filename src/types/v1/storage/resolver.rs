// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Path coverage queries over a [`StorageSpec`].

use super::{StorageSpec, VolumeMode, VolumeSpec};
use std::path::Path;

/// Whether `dir` is `parent` itself or lives below it.
///
/// Both paths are compared component by component, so `/opt/aero` does not
/// cover `/opt/aerospike`.
pub fn is_path_parent_or_same(parent: &str, dir: &str) -> bool {
    if parent.is_empty() || dir.is_empty() {
        return false;
    }
    Path::new(dir).starts_with(Path::new(parent))
}

/// Whether any of `mounts` covers `dir`.
pub fn is_dir_covered(mounts: &[&str], dir: &str) -> bool {
    mounts.iter().any(|mount| is_path_parent_or_same(mount, dir))
}

/// Directory holding `file`, as used for file coverage checks.
pub fn parent_dir(file: &str) -> &str {
    Path::new(file)
        .parent()
        .and_then(Path::to_str)
        .filter(|parent| !parent.is_empty())
        .unwrap_or(file)
}

/// Aerospike attachment paths split by volume mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AerospikeStorageList<'a> {
    pub block_devices: Vec<&'a str>,
    pub filesystem_paths: Vec<&'a str>,
}

impl StorageSpec {
    pub fn volume_by_name(&self, name: &str) -> Option<&VolumeSpec> {
        self.volumes.iter().find(|volume| volume.name == name)
    }

    /// Volumes mounted into the named sidecar or init container.
    pub fn volumes_for_container<'a>(
        &'a self,
        container: &'a str,
    ) -> impl Iterator<Item = &'a VolumeSpec> + 'a {
        self.volumes.iter().filter(move |volume| {
            volume
                .sidecars
                .iter()
                .chain(volume.init_containers.iter())
                .any(|attachment| attachment.container_name == container)
        })
    }

    pub fn persistent_volumes(&self) -> impl Iterator<Item = &VolumeSpec> {
        self.volumes.iter().filter(|volume| volume.is_persistent())
    }

    /// Aerospike attachment paths, optionally restricted to persistent
    /// volumes. Only persistent block volumes can back a device.
    pub fn aerospike_storage_list(&self, only_pv: bool) -> AerospikeStorageList<'_> {
        let mut list = AerospikeStorageList::default();
        for volume in &self.volumes {
            let Some(path) = volume.aerospike_path() else {
                continue;
            };
            match volume.source.volume_mode() {
                Some(VolumeMode::Block) => list.block_devices.push(path),
                Some(VolumeMode::Filesystem) => list.filesystem_paths.push(path),
                None if !only_pv => list.filesystem_paths.push(path),
                None => {}
            }
        }
        list
    }

    /// The volume whose Aerospike attachment covers `path`, preferring the
    /// deepest mount when several do.
    pub fn volume_for_aerospike_path(&self, path: &str) -> Option<&VolumeSpec> {
        self.volumes
            .iter()
            .filter_map(|volume| {
                let mount = volume.aerospike_path()?;
                is_path_parent_or_same(mount, path).then_some((Path::new(mount).components().count(), volume))
            })
            .max_by_key(|(depth, _)| *depth)
            .map(|(_, volume)| volume)
    }

    /// Whether the directory of a file storage entry sits on a filesystem
    /// attachment, optionally only persistent ones.
    pub fn is_file_storage_configured_for_dir(&self, dir: &str, only_pv: bool) -> bool {
        is_dir_covered(&self.aerospike_storage_list(only_pv).filesystem_paths, dir)
    }
}
