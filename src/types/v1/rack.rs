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

use crate::types::v1::config::ConfigTree;
use crate::types::v1::storage::StorageSpec;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rack used when `rackConfig.racks` is empty.
pub const DEFAULT_RACK_ID: i32 = 0;
pub const MIN_RACK_ID: i32 = 1;
pub const MAX_RACK_ID: i32 = 1_000_000;

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RackConfig {
    /// Namespaces whose replicas are spread across racks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub racks: Vec<Rack>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolling_update_batch_size: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_down_batch_size: Option<IntOrString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ignorable_pods: Option<IntOrString>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    pub id: i32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rack_label: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node_name: String,

    /// Partial override merged onto the cluster-wide `aerospikeConfig`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerospike_config: Option<ConfigTree>,

    /// Full replacement of the cluster-wide storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageSpec>,
}

impl Rack {
    /// Scheduling identity fields as `(field, value)` pairs.
    pub fn identity(&self) -> [(&'static str, &str); 4] {
        [
            ("nodeName", self.node_name.as_str()),
            ("rackLabel", self.rack_label.as_str()),
            ("region", self.region.as_str()),
            ("zone", self.zone.as_str()),
        ]
    }
}

/// A rack with its override applied.
#[derive(Debug, Clone)]
pub struct EffectiveRack<'a> {
    pub id: i32,
    /// `None` for the implicit default rack.
    pub rack: Option<&'a Rack>,
    pub config: ConfigTree,
    pub storage: &'a StorageSpec,
}

impl EffectiveRack<'_> {
    pub fn has_config_override(&self) -> bool {
        self.rack.is_some_and(|rack| rack.aerospike_config.is_some())
    }

    pub fn has_storage_override(&self) -> bool {
        self.rack.is_some_and(|rack| rack.storage.is_some())
    }
}

impl RackConfig {
    pub fn rack(&self, id: i32) -> Option<&Rack> {
        self.racks.iter().find(|rack| rack.id == id)
    }

    /// Racks with their config and storage resolved against the cluster-wide
    /// values, or the single default rack when none are declared.
    pub fn effective_racks<'a>(
        &'a self,
        config: Option<&ConfigTree>,
        storage: &'a StorageSpec,
    ) -> Vec<EffectiveRack<'a>> {
        let global = config.cloned().unwrap_or_default();
        if self.racks.is_empty() {
            return vec![EffectiveRack {
                id: DEFAULT_RACK_ID,
                rack: None,
                config: global,
                storage,
            }];
        }

        self.racks
            .iter()
            .map(|rack| EffectiveRack {
                id: rack.id,
                rack: Some(rack),
                config: match &rack.aerospike_config {
                    Some(overlay) => global.merged(overlay),
                    None => global.clone(),
                },
                storage: rack.storage.as_ref().unwrap_or(storage),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        ConfigTree::try_from(value).expect("fixture is a map")
    }

    #[test]
    fn test_default_rack_when_none_declared() {
        let rack_config = RackConfig::default();
        let storage = StorageSpec::default();
        let global = tree(json!({"service": {"cluster-name": "aerospike"}}));

        let racks = rack_config.effective_racks(Some(&global), &storage);
        assert_eq!(racks.len(), 1);
        assert_eq!(racks[0].id, DEFAULT_RACK_ID);
        assert!(racks[0].rack.is_none());
        assert_eq!(racks[0].config, global);
    }

    #[test]
    fn test_rack_overrides_apply() {
        let rack_storage = StorageSpec {
            cleanup_threads: Some(3),
            ..Default::default()
        };
        let rack_config = RackConfig {
            racks: vec![
                Rack {
                    id: 1,
                    aerospike_config: Some(tree(json!({"service": {"proto-fd-max": 20000}}))),
                    ..Default::default()
                },
                Rack {
                    id: 2,
                    storage: Some(rack_storage.clone()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let storage = StorageSpec::default();
        let global = tree(json!({"service": {"cluster-name": "aerospike", "proto-fd-max": 15000}}));

        let racks = rack_config.effective_racks(Some(&global), &storage);
        assert_eq!(racks.len(), 2);
        assert!(racks[0].has_config_override());
        assert_eq!(
            racks[0].config.as_map().get("service"),
            Some(&json!({"cluster-name": "aerospike", "proto-fd-max": 20000}))
        );
        assert_eq!(racks[0].storage, &storage);
        assert!(racks[1].has_storage_override());
        assert_eq!(racks[1].storage, &rack_storage);
        assert_eq!(racks[1].config, global);
    }
}
