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

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Pod annotation listing the extra network attachments of a pod.
pub const NETWORK_ANNOTATION: &str = "k8s.v1.cni.cncf.io/networks";

#[derive(Deserialize, Serialize, Clone, Copy, Debug, JsonSchema, Default, PartialEq, Eq, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum AerospikeNetworkType {
    Pod,
    HostInternal,
    HostExternal,
    #[serde(rename = "configuredIP")]
    #[strum(serialize = "configuredIP")]
    ConfiguredIp,
    CustomInterface,
    #[default]
    Unspecified,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "camelCase")]
pub enum NetworkDirection {
    Access,
    AlternateAccess,
    TlsAccess,
    TlsAlternateAccess,
    Fabric,
    TlsFabric,
}

impl NetworkDirection {
    pub const ALL: [NetworkDirection; 6] = [
        NetworkDirection::Access,
        NetworkDirection::AlternateAccess,
        NetworkDirection::TlsAccess,
        NetworkDirection::TlsAlternateAccess,
        NetworkDirection::Fabric,
        NetworkDirection::TlsFabric,
    ];

    /// Name of the policy field holding the custom interface list.
    pub fn custom_names_field(self) -> &'static str {
        match self {
            NetworkDirection::Access => "customAccessNetworkNames",
            NetworkDirection::AlternateAccess => "customAlternateAccessNetworkNames",
            NetworkDirection::TlsAccess => "customTLSAccessNetworkNames",
            NetworkDirection::TlsAlternateAccess => "customTLSAlternateAccessNetworkNames",
            NetworkDirection::Fabric => "customFabricNetworkNames",
            NetworkDirection::TlsFabric => "customTLSFabricNetworkNames",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AerospikeNetworkPolicy {
    #[serde(default, rename = "access")]
    pub access_type: AerospikeNetworkType,

    #[serde(default, rename = "alternateAccess")]
    pub alternate_access_type: AerospikeNetworkType,

    #[serde(default, rename = "tlsAccess")]
    pub tls_access_type: AerospikeNetworkType,

    #[serde(default, rename = "tlsAlternateAccess")]
    pub tls_alternate_access_type: AerospikeNetworkType,

    #[serde(default, rename = "fabric")]
    pub fabric_type: AerospikeNetworkType,

    #[serde(default, rename = "tlsFabric")]
    pub tls_fabric_type: AerospikeNetworkType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_access_network_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_alternate_access_network_names: Option<Vec<String>>,

    #[serde(
        default,
        rename = "customTLSAccessNetworkNames",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_tls_access_network_names: Option<Vec<String>>,

    #[serde(
        default,
        rename = "customTLSAlternateAccessNetworkNames",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_tls_alternate_access_network_names: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fabric_network_names: Option<Vec<String>>,

    #[serde(
        default,
        rename = "customTLSFabricNetworkNames",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_tls_fabric_network_names: Option<Vec<String>>,
}

impl AerospikeNetworkPolicy {
    pub fn network_type(&self, direction: NetworkDirection) -> AerospikeNetworkType {
        match direction {
            NetworkDirection::Access => self.access_type,
            NetworkDirection::AlternateAccess => self.alternate_access_type,
            NetworkDirection::TlsAccess => self.tls_access_type,
            NetworkDirection::TlsAlternateAccess => self.tls_alternate_access_type,
            NetworkDirection::Fabric => self.fabric_type,
            NetworkDirection::TlsFabric => self.tls_fabric_type,
        }
    }

    pub fn custom_names(&self, direction: NetworkDirection) -> Option<&[String]> {
        let names = match direction {
            NetworkDirection::Access => &self.custom_access_network_names,
            NetworkDirection::AlternateAccess => &self.custom_alternate_access_network_names,
            NetworkDirection::TlsAccess => &self.custom_tls_access_network_names,
            NetworkDirection::TlsAlternateAccess => {
                &self.custom_tls_alternate_access_network_names
            }
            NetworkDirection::Fabric => &self.custom_fabric_network_names,
            NetworkDirection::TlsFabric => &self.custom_tls_fabric_network_names,
        };
        names.as_deref()
    }

    pub fn uses_custom_interface(&self) -> bool {
        NetworkDirection::ALL
            .into_iter()
            .any(|direction| self.network_type(direction) == AerospikeNetworkType::CustomInterface)
    }
}

/// Qualifies a network attachment name with `namespace` unless it already
/// carries one.
pub fn qualified_network_name(name: &str, namespace: &str) -> String {
    let name = name.trim();
    if name.contains('/') {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}
