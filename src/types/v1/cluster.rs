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

use crate::types;
use crate::types::error::{InvalidNameSnafu, NoNameSnafu, NoNamespaceSnafu};
use crate::types::v1::client_cert::OperatorClientCertSpec;
use crate::types::v1::config::ConfigTree;
use crate::types::v1::network::AerospikeNetworkPolicy;
use crate::types::v1::operation::OperationSpec;
use crate::types::v1::pod::AerospikePodSpec;
use crate::types::v1::rack::{EffectiveRack, RackConfig};
use crate::types::v1::storage::StorageSpec;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::{CustomResource, KubeSchema, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ensure};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, KubeSchema, Default)]
#[kube(
    group = "asdb.aerospike.com",
    version = "v1",
    kind = "AerospikeCluster",
    namespaced,
    status = "crate::types::v1::status::AerospikeClusterStatus",
    shortname = "asc",
    plural = "aerospikeclusters",
    singular = "aerospikecluster",
    printcolumn = r#"{"name":"Size", "type":"integer", "jsonPath":".spec.size"}"#,
    printcolumn = r#"{"name":"Image", "type":"string", "jsonPath":".spec.image"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#,
    crates(serde_json = "k8s_openapi::serde_json")
)]
#[serde(rename_all = "camelCase")]
pub struct AerospikeClusterSpec {
    pub size: i32,

    pub image: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_unavailable: Option<IntOrString>,

    #[serde(default, rename = "disablePDB", skip_serializing_if = "Option::is_none")]
    pub disable_pdb: Option<bool>,

    #[serde(default)]
    pub storage: StorageSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aerospike_config: Option<ConfigTree>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_policy: Option<ValidationPolicySpec>,

    #[serde(default)]
    pub rack_config: RackConfig,

    #[serde(default)]
    pub aerospike_network_policy: AerospikeNetworkPolicy,

    #[serde(default)]
    pub pod_spec: AerospikePodSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_client_cert: Option<OperatorClientCertSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[x_kube(validation = Rule::new("self.size() <= 1").message("only one operation can be specified at a time"))]
    pub operations: Vec<OperationSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_dynamic_config_update: Option<bool>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPolicySpec {
    #[serde(default)]
    pub skip_work_dir_validate: bool,

    #[serde(default)]
    pub skip_xdr_dlog_file_validate: bool,
}

impl AerospikeCluster {
    pub fn namespace(&self) -> Result<String, types::error::Error> {
        let namespace = ResourceExt::namespace(self)
            .filter(|ns| !ns.is_empty())
            .context(NoNamespaceSnafu)?;
        ensure!(
            !namespace.contains(' '),
            InvalidNameSnafu {
                field: "namespace",
                value: namespace,
                reason: "must not contain spaces",
            }
        );
        Ok(namespace)
    }

    pub fn name(&self) -> Result<String, types::error::Error> {
        let name = self
            .metadata
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .context(NoNameSnafu)?;
        ensure!(
            !name.contains(' '),
            InvalidNameSnafu {
                field: "name",
                value: name,
                reason: "must not contain spaces",
            }
        );
        Ok(name)
    }

    pub fn effective_racks(&self) -> Vec<EffectiveRack<'_>> {
        self.spec
            .rack_config
            .effective_racks(self.spec.aerospike_config.as_ref(), &self.spec.storage)
    }

    pub fn pdb_disabled(&self) -> bool {
        self.spec.disable_pdb.unwrap_or(false)
    }

    pub fn dynamic_config_update_enabled(&self) -> bool {
        self.spec.enable_dynamic_config_update.unwrap_or(false)
    }

    pub fn skip_work_dir_validate(&self) -> bool {
        self.spec
            .validation_policy
            .as_ref()
            .is_some_and(|policy| policy.skip_work_dir_validate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use kube::CustomResourceExt;

    #[test]
    fn test_crd_metadata() {
        let crd = super::AerospikeCluster::crd();
        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("aerospikeclusters.asdb.aerospike.com")
        );
        assert_eq!(crd.spec.names.short_names, Some(vec!["asc".to_string()]));
        assert_eq!(crd.spec.scope, "Namespaced");
    }

    #[test]
    fn test_name_checks() {
        let mut cluster = crate::tests::create_test_cluster();
        assert_eq!(cluster.name().ok().as_deref(), Some("aerocluster"));
        assert_eq!(cluster.namespace().ok().as_deref(), Some("aerospike"));

        cluster.metadata.name = Some("aero cluster".to_string());
        let err = cluster.name().expect_err("spaces are rejected");
        assert_eq!(
            err.to_string(),
            "invalid name 'aero cluster': must not contain spaces"
        );

        cluster.metadata.namespace = None;
        assert!(cluster.namespace().is_err());
    }

    #[test]
    fn test_disable_pdb_wire_name() {
        let mut cluster = crate::tests::create_test_cluster();
        cluster.spec.disable_pdb = Some(true);
        let value = serde_json::to_value(&cluster.spec).expect("spec serializes");
        assert_eq!(value.get("disablePDB"), Some(&serde_json::json!(true)));
        assert!(cluster.pdb_disabled());
    }
}
