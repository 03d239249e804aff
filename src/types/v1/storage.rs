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

use k8s_openapi::api::core::v1 as corev1;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::KubeSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;

pub mod resolver;

#[derive(Deserialize, Serialize, Clone, Debug, KubeSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesystem_volume_policy: Option<VolumePolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_volume_policy: Option<VolumePolicy>,

    /// Threads used to clean up volumes of removed pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[x_kube(validation = Rule::new("self >= 1").message("cleanupThreads must be at least 1"))]
    pub cleanup_threads: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeSpec>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_method: Option<VolumeMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_method: Option<VolumeMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascade_delete: Option<bool>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSpec {
    pub name: String,

    pub source: VolumeSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerospike: Option<AerospikeVolumeAttachment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<VolumeAttachment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<VolumeAttachment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_method: Option<VolumeMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_method: Option<VolumeMethod>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascade_delete: Option<bool>,
}

/// Exactly one field is expected to be set.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume: Option<PersistentVolumeSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<corev1::EmptyDirVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<corev1::SecretVolumeSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map: Option<corev1::ConfigMapVolumeSource>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistentVolumeSpec {
    pub storage_class: String,

    #[serde(default)]
    pub volume_mode: VolumeMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Quantity>,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, JsonSchema, Default, PartialEq, Eq, Display)]
pub enum VolumeMode {
    #[default]
    Filesystem,
    Block,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum VolumeMethod {
    None,
    DeleteFiles,
    Dd,
    Blkdiscard,
    HeaderCleanup,
    BlkdiscardWithHeaderCleanup,
}

impl VolumeMethod {
    pub const FILESYSTEM: [VolumeMethod; 2] = [VolumeMethod::None, VolumeMethod::DeleteFiles];
    pub const BLOCK: [VolumeMethod; 5] = [
        VolumeMethod::None,
        VolumeMethod::Dd,
        VolumeMethod::Blkdiscard,
        VolumeMethod::HeaderCleanup,
        VolumeMethod::BlkdiscardWithHeaderCleanup,
    ];
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AerospikeVolumeAttachment {
    pub path: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAttachment {
    pub container_name: String,
    pub path: String,
}

impl VolumeSource {
    /// Number of populated source fields.
    pub fn populated(&self) -> usize {
        [
            self.persistent_volume.is_some(),
            self.empty_dir.is_some(),
            self.secret.is_some(),
            self.config_map.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn volume_mode(&self) -> Option<VolumeMode> {
        self.persistent_volume.as_ref().map(|pv| pv.volume_mode)
    }

    /// Short human readable form used in rejection messages.
    pub fn describe(&self) -> String {
        if let Some(pv) = &self.persistent_volume {
            let size = pv.size.as_ref().map(|q| q.0.as_str()).unwrap_or("unset");
            return format!(
                "persistentVolume(storageClass={}, volumeMode={}, size={})",
                pv.storage_class, pv.volume_mode, size
            );
        }
        if self.empty_dir.is_some() {
            return "emptyDir".to_string();
        }
        if self.secret.is_some() {
            return "secret".to_string();
        }
        if self.config_map.is_some() {
            return "configMap".to_string();
        }
        "none".to_string()
    }
}

impl VolumeSpec {
    pub fn is_persistent(&self) -> bool {
        self.source.persistent_volume.is_some()
    }

    pub fn aerospike_path(&self) -> Option<&str> {
        self.aerospike.as_ref().map(|a| a.path.as_str())
    }
}
