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

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AerospikePodStatus {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,

    /// Image of the init container, unset on pods created by old operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_image: Option<String>,

    #[serde(default, rename = "podIP", skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,

    #[serde(default)]
    pub rack_id: i32,
}

impl AerospikePodStatus {
    pub fn init_image(&self) -> Option<&str> {
        self.init_image.as_deref().filter(|image| !image.is_empty())
    }
}
