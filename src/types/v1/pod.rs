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
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const AEROSPIKE_SERVER_CONTAINER_NAME: &str = "aerospike-server";
pub const AEROSPIKE_INIT_CONTAINER_NAME: &str = "aerospike-init";

/// Labels the operator sets on every pod it manages.
pub const RESERVED_LABELS: [&str; 3] = ["app", "aerospike.com/rack-id", "aerospike.com/cr"];

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AerospikePodSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_pod_per_host: Option<bool>,

    #[serde(default)]
    pub host_network: bool,

    #[serde(default)]
    pub metadata: AerospikeObjectMeta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<corev1::Container>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<corev1::Container>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_config: Option<corev1::PodDNSConfig>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AerospikeObjectMeta {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl AerospikePodSpec {
    pub fn multi_pod_per_host(&self) -> bool {
        self.multi_pod_per_host.unwrap_or(false)
    }
}
