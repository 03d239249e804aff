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

pub mod pod;

use crate::types::v1::config::ConfigTree;
use crate::types::v1::operation::OperationSpec;
use crate::types::v1::rack::{EffectiveRack, RackConfig};
use crate::types::v1::storage::StorageSpec;
use kube::KubeSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Last state observed on the running cluster.
#[derive(Deserialize, Serialize, Clone, Debug, KubeSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AerospikeClusterStatus {
    #[serde(default)]
    pub size: i32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,

    /// Unset until a configuration has been applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerospike_config: Option<ConfigTree>,

    #[serde(default)]
    pub rack_config: RackConfig,

    #[serde(default)]
    pub storage: StorageSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pods: BTreeMap<String, pod::AerospikePodStatus>,
}

impl AerospikeClusterStatus {
    /// Whether a configuration was ever applied to the cluster.
    pub fn is_accepted(&self) -> bool {
        self.aerospike_config.is_some()
    }

    pub fn effective_racks(&self) -> Vec<EffectiveRack<'_>> {
        self.rack_config
            .effective_racks(self.aerospike_config.as_ref(), &self.storage)
    }

    pub fn pod_names(&self) -> BTreeSet<&str> {
        self.pods.keys().map(String::as_str).collect()
    }
}
