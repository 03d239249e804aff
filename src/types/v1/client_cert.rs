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

/// Client certificate the operator presents to the cluster.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperatorClientCertSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_client_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_cert_source: Option<SecretCertSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_path_in_operator: Option<CertPathInOperator>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecretCertSource {
    pub secret_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certs_filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certs_source: Option<CaCertsSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key_filename: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaCertsSource {
    pub secret_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_namespace: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertPathInOperator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certs_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key_path: Option<String>,
}

/// Treats empty strings as unset.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl OperatorClientCertSpec {
    pub fn tls_client_name(&self) -> Option<&str> {
        non_empty(&self.tls_client_name)
    }

    /// Whether a client certificate and key are referenced.
    pub fn is_client_cert_configured(&self) -> bool {
        if let Some(source) = &self.secret_cert_source
            && non_empty(&source.client_cert_filename).is_some()
        {
            return true;
        }
        self.cert_path_in_operator
            .as_ref()
            .is_some_and(|paths| non_empty(&paths.client_cert_path).is_some())
    }

    /// Certificate readable from the operator's own filesystem.
    pub fn local_cert_path(&self) -> Option<&str> {
        self.cert_path_in_operator
            .as_ref()
            .and_then(|paths| non_empty(&paths.client_cert_path))
    }
}
