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

//! Read-only navigation over the loosely typed `aerospikeConfig` tree.
//!
//! Every lookup distinguishes a key that is absent from one that is present
//! with the wrong shape, so callers can decide whether a default applies or
//! the descriptor is malformed.

use crate::types::error::{self, ConfigNotObjectSnafu};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{OptionExt, Snafu};
use std::borrow::Cow;

pub const SERVICE: &str = "service";
pub const NETWORK: &str = "network";
pub const NAMESPACES: &str = "namespaces";
pub const LOGGING: &str = "logging";
pub const SECURITY: &str = "security";
pub const TLS: &str = "tls";
pub const TLS_NAME: &str = "tls-name";
pub const TLS_PORT: &str = "tls-port";

/// Connection blocks under `network` that carry ports and TLS settings.
pub const NETWORK_CONNECTION_TYPES: [&str; 3] = ["service", "heartbeat", "fabric"];

pub const DEFAULT_REPLICATION_FACTOR: i64 = 2;
pub const DEFAULT_WORK_DIRECTORY: &str = "/opt/aerospike";

/// Transaction (MRT) settings only valid on strong-consistency namespaces.
pub const MRT_FIELDS: [&str; 2] = ["mrt-duration", "disable-mrt-writes"];

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("aerospikeConfig.{} not found", path))]
    Missing { path: String },

    #[snafu(display("aerospikeConfig.{} must be a {}, found {}", path, expected, found))]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Outcome of a typed lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<T> {
    Absent,
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    Found(T),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Absent => Lookup::Absent,
            Lookup::Mismatch { expected, found } => Lookup::Mismatch { expected, found },
            Lookup::Found(value) => Lookup::Found(f(value)),
        }
    }

    /// Absent is fine, a shape mismatch is an error.
    pub fn optional(self, path: &str) -> Result<Option<T>, Error> {
        match self {
            Lookup::Absent => Ok(None),
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Mismatch { expected, found } => WrongTypeSnafu {
                path,
                expected,
                found,
            }
            .fail(),
        }
    }

    pub fn required(self, path: &str) -> Result<T, Error> {
        self.optional(path)?.context(MissingSnafu { path })
    }
}

pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

pub fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

fn lookup<'a, T>(
    value: Option<&'a Value>,
    expected: &'static str,
    convert: impl FnOnce(&'a Value) -> Option<T>,
) -> Lookup<T> {
    match value {
        None => Lookup::Absent,
        Some(value) => match convert(value) {
            Some(converted) => Lookup::Found(converted),
            None => Lookup::Mismatch {
                expected,
                found: kind_of(value),
            },
        },
    }
}

/// A borrowed map inside the tree.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Section<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.map.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &'a Map<String, Value> {
        self.map
    }

    pub fn section(&self, key: &str) -> Lookup<Section<'a>> {
        lookup(self.map.get(key), "map", |v| v.as_object().map(Section::new))
    }

    pub fn str(&self, key: &str) -> Lookup<&'a str> {
        lookup(self.map.get(key), "string", Value::as_str)
    }

    pub fn bool(&self, key: &str) -> Lookup<bool> {
        lookup(self.map.get(key), "bool", Value::as_bool)
    }

    pub fn int(&self, key: &str) -> Lookup<i64> {
        lookup(self.map.get(key), "integer", as_int)
    }

    pub fn list(&self, key: &str) -> Lookup<&'a [Value]> {
        lookup(self.map.get(key), "list", |v| v.as_array().map(Vec::as_slice))
    }
}

/// The `aerospikeConfig` tree of a cluster or rack.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct ConfigTree(Map<String, Value>);

impl JsonSchema for ConfigTree {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("AerospikeConfig")
    }
    fn schema_id() -> Cow<'static, str> {
        Cow::Borrowed(concat!(module_path!(), "::", "AerospikeConfig"))
    }
    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema! {
            {
                "type": "object",
                "x-kubernetes-preserve-unknown-fields": true
            }
        }
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for ConfigTree {
    type Error = error::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => ConfigNotObjectSnafu {
                found: kind_of(&other),
            }
            .fail(),
        }
    }
}

impl ConfigTree {
    pub fn root(&self) -> Section<'_> {
        Section::new(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.0
    }

    pub fn service(&self) -> Lookup<Section<'_>> {
        self.root().section(SERVICE)
    }

    pub fn network(&self) -> Lookup<Section<'_>> {
        self.root().section(NETWORK)
    }

    pub fn security(&self) -> Lookup<Section<'_>> {
        self.root().section(SECURITY)
    }

    pub fn logging(&self) -> Lookup<&[Value]> {
        self.root().list(LOGGING)
    }

    /// `network.<kind>` for one of [`NETWORK_CONNECTION_TYPES`].
    pub fn connection(&self, kind: &str) -> Result<Option<Section<'_>>, Error> {
        let Some(network) = self.network().optional(NETWORK)? else {
            return Ok(None);
        };
        network.section(kind).optional(&format!("{NETWORK}.{kind}"))
    }

    /// Entries of `network.tls`.
    pub fn tls_entries(&self) -> Result<Vec<TlsEntry<'_>>, Error> {
        let Some(network) = self.network().optional(NETWORK)? else {
            return Ok(Vec::new());
        };
        let path = format!("{NETWORK}.{TLS}");
        let Some(list) = network.list(TLS).optional(&path)? else {
            return Ok(Vec::new());
        };

        list.iter()
            .enumerate()
            .map(|(i, item)| {
                let entry_path = format!("{path}[{i}]");
                let section = lookup(Some(item), "map", |v| v.as_object().map(Section::new))
                    .required(&entry_path)?;
                let name = section.str("name").required(&format!("{entry_path}.name"))?;
                Ok(TlsEntry { name, section })
            })
            .collect()
    }

    /// Every namespace, failing on entries that are not named maps.
    pub fn namespaces(&self) -> Result<Vec<NamespaceConfig<'_>>, Error> {
        let list = self.root().list(NAMESPACES).required(NAMESPACES)?;
        list.iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{NAMESPACES}[{i}]");
                let conf = lookup(Some(item), "map", |v| v.as_object().map(Section::new))
                    .required(&path)?;
                let name = conf.str("name").required(&format!("{path}.name"))?;
                Ok(NamespaceConfig { name, conf })
            })
            .collect()
    }

    /// Namespaces of a tree that was already accepted, skipping anything
    /// that does not parse.
    pub fn observed_namespaces(&self) -> Vec<NamespaceConfig<'_>> {
        let Some(list) = self.root().list(NAMESPACES).found() else {
            return Vec::new();
        };
        list.iter()
            .filter_map(Value::as_object)
            .filter_map(|map| {
                let conf = Section::new(map);
                let name = conf.str("name").found()?;
                Some(NamespaceConfig { name, conf })
            })
            .collect()
    }

    /// Whether `security` is configured. The legacy `enable-security: false`
    /// flag inside the section still disables it.
    pub fn security_enabled(&self) -> Result<bool, Error> {
        let Some(security) = self.security().optional(SECURITY)? else {
            return Ok(false);
        };
        let enabled = security
            .bool("enable-security")
            .optional(&format!("{SECURITY}.enable-security"))?;
        Ok(enabled.unwrap_or(true))
    }

    /// Overlays `overlay` onto a copy of this tree.
    ///
    /// Maps merge key by key, lists whose items are all maps with a `name`
    /// merge item by item on that name, anything else is replaced.
    pub fn merged(&self, overlay: &ConfigTree) -> ConfigTree {
        let mut base = Value::Object(self.0.clone());
        merge_value(&mut base, &Value::Object(overlay.0.clone()));
        match base {
            Value::Object(map) => ConfigTree(map),
            _ => self.clone(),
        }
    }
}

fn item_name(value: &Value) -> Option<&str> {
    value.as_object()?.get("name")?.as_str()
}

fn is_named_list(list: &[Value]) -> bool {
    !list.is_empty() && list.iter().all(|item| item_name(item).is_some())
}

fn merge_value(base: &mut Value, overlay: &Value) {
    if let (Value::Object(base_map), Value::Object(overlay_map)) = (&mut *base, overlay) {
        for (key, value) in overlay_map {
            match base_map.get_mut(key) {
                Some(existing) => merge_value(existing, value),
                None => {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        return;
    }

    if let (Value::Array(base_list), Value::Array(overlay_list)) = (&mut *base, overlay)
        && is_named_list(base_list)
        && is_named_list(overlay_list)
    {
        for item in overlay_list {
            let name = item_name(item);
            match base_list.iter_mut().find(|existing| item_name(existing) == name) {
                Some(existing) => merge_value(existing, item),
                None => base_list.push(item.clone()),
            }
        }
        return;
    }

    *base = overlay.clone();
}

/// One entry of `network.tls`.
#[derive(Debug, Clone, Copy)]
pub struct TlsEntry<'a> {
    pub name: &'a str,
    pub section: Section<'a>,
}

impl<'a> TlsEntry<'a> {
    pub fn cert_file(&self) -> Option<&'a str> {
        self.section.str("cert-file").found()
    }

    pub fn key_file(&self) -> Option<&'a str> {
        self.section.str("key-file").found()
    }

    pub fn ca_file(&self) -> Option<&'a str> {
        self.section.str("ca-file").found()
    }

    pub fn ca_path(&self) -> Option<&'a str> {
        self.section.str("ca-path").found()
    }
}

/// One entry of `namespaces`.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceConfig<'a> {
    pub name: &'a str,
    pub conf: Section<'a>,
}

impl<'a> NamespaceConfig<'a> {
    pub fn path(&self, key: &str) -> String {
        format!("{NAMESPACES}[{}].{key}", self.name)
    }

    pub fn replication_factor(&self) -> Result<i64, Error> {
        let rf = self
            .conf
            .int("replication-factor")
            .optional(&self.path("replication-factor"))?;
        Ok(rf.unwrap_or(DEFAULT_REPLICATION_FACTOR))
    }

    pub fn strong_consistency(&self) -> Result<bool, Error> {
        let sc = self
            .conf
            .bool("strong-consistency")
            .optional(&self.path("strong-consistency"))?;
        Ok(sc.unwrap_or(false))
    }

    pub fn storage_engine(&self) -> Lookup<StorageEngine<'a>> {
        self.conf
            .section("storage-engine")
            .map(|section| StorageEngine { section })
    }

    pub fn index_type(&self) -> Lookup<Section<'a>> {
        self.conf.section("index-type")
    }

    pub fn mrt_fields(&self) -> Vec<&'static str> {
        MRT_FIELDS
            .into_iter()
            .filter(|field| self.conf.contains(field))
            .collect()
    }

    pub fn is_memory(&self) -> bool {
        self.storage_engine()
            .found()
            .is_some_and(|engine| engine.is_memory())
    }

    /// Device tokens claimed by this namespace, shadow devices included.
    pub fn device_paths(&self) -> Vec<&'a str> {
        self.storage_engine()
            .found()
            .and_then(|engine| engine.devices().found())
            .map(tokens)
            .unwrap_or_default()
    }

    /// File tokens claimed by this namespace, shadow files included.
    pub fn file_paths(&self) -> Vec<&'a str> {
        self.storage_engine()
            .found()
            .and_then(|engine| engine.files().found())
            .map(tokens)
            .unwrap_or_default()
    }
}

fn tokens(list: &[Value]) -> Vec<&str> {
    list.iter()
        .filter_map(Value::as_str)
        .flat_map(str::split_whitespace)
        .collect()
}

/// `storage-engine` of a namespace.
#[derive(Debug, Clone, Copy)]
pub struct StorageEngine<'a> {
    pub section: Section<'a>,
}

impl<'a> StorageEngine<'a> {
    pub fn kind(&self) -> Option<&'a str> {
        self.section.str("type").found()
    }

    pub fn is_memory(&self) -> bool {
        self.kind() == Some("memory")
    }

    pub fn is_device_or_pmem(&self) -> bool {
        matches!(self.kind(), Some("device" | "pmem"))
    }

    pub fn devices(&self) -> Lookup<&'a [Value]> {
        self.section.list("devices")
    }

    pub fn files(&self) -> Lookup<&'a [Value]> {
        self.section.list("files")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> ConfigTree {
        ConfigTree::try_from(value).expect("config fixture must be a map")
    }

    #[test]
    fn test_lookup_distinguishes_absent_and_mismatch() {
        let config = tree(json!({"service": {"proto-fd-max": "many"}}));
        let service = config.service().found().expect("service section");

        assert!(service.int("feature-key-file").is_absent());
        assert_eq!(
            service.int("proto-fd-max"),
            Lookup::Mismatch {
                expected: "integer",
                found: "string"
            }
        );

        let err = service
            .int("proto-fd-max")
            .optional("service.proto-fd-max")
            .expect_err("string is not an integer");
        assert_eq!(
            err.to_string(),
            "aerospikeConfig.service.proto-fd-max must be a integer, found string"
        );
    }

    #[test]
    fn test_required_reports_missing_path() {
        let config = tree(json!({}));
        let err = config
            .network()
            .required("network")
            .expect_err("network is absent");
        assert_eq!(err.to_string(), "aerospikeConfig.network not found");
    }

    #[test]
    fn test_try_from_rejects_non_map() {
        let err = ConfigTree::try_from(json!(["service"])).expect_err("a list is not a tree");
        assert_eq!(err.to_string(), "aerospikeConfig must be a map, found list");
    }

    #[test]
    fn test_namespace_defaults() {
        let config = tree(json!({
            "namespaces": [
                {"name": "test", "storage-engine": {"type": "memory"}},
                {"name": "bar", "replication-factor": 3, "strong-consistency": true}
            ]
        }));
        let namespaces = config.namespaces().expect("namespaces parse");

        assert_eq!(namespaces[0].replication_factor().ok(), Some(2));
        assert_eq!(namespaces[0].strong_consistency().ok(), Some(false));
        assert!(namespaces[0].is_memory());
        assert_eq!(namespaces[1].replication_factor().ok(), Some(3));
        assert_eq!(namespaces[1].strong_consistency().ok(), Some(true));
    }

    #[test]
    fn test_namespace_without_name_is_rejected() {
        let config = tree(json!({"namespaces": [{"replication-factor": 2}]}));
        let err = config.namespaces().expect_err("name is required");
        assert_eq!(err.to_string(), "aerospikeConfig.namespaces[0].name not found");
    }

    #[test]
    fn test_device_and_file_tokens() {
        let config = tree(json!({
            "namespaces": [{
                "name": "test",
                "storage-engine": {
                    "type": "device",
                    "devices": ["/dev/xvdf /dev/nvme0n1", "/dev/xvdg"],
                    "files": ["/opt/aerospike/data/test.dat"]
                }
            }]
        }));
        let namespaces = config.namespaces().expect("namespaces parse");

        assert_eq!(
            namespaces[0].device_paths(),
            vec!["/dev/xvdf", "/dev/nvme0n1", "/dev/xvdg"]
        );
        assert_eq!(
            namespaces[0].file_paths(),
            vec!["/opt/aerospike/data/test.dat"]
        );
    }

    #[test]
    fn test_security_enabled() {
        assert!(!tree(json!({})).security_enabled().unwrap_or(true));
        assert!(tree(json!({"security": {}})).security_enabled().unwrap_or(false));
        assert!(
            !tree(json!({"security": {"enable-security": false}}))
                .security_enabled()
                .unwrap_or(true)
        );
    }

    #[test]
    fn test_merge_overlays_maps_and_named_lists() {
        let base = tree(json!({
            "service": {"cluster-name": "aerospike", "proto-fd-max": 15000},
            "namespaces": [
                {"name": "test", "replication-factor": 2},
                {"name": "bar", "replication-factor": 2}
            ],
            "logging": [{"name": "console", "any": "info"}]
        }));
        let overlay = tree(json!({
            "service": {"proto-fd-max": 20000},
            "namespaces": [
                {"name": "bar", "replication-factor": 3},
                {"name": "baz", "replication-factor": 1}
            ]
        }));

        let merged = base.merged(&overlay);
        assert_eq!(
            merged.as_map().get("service"),
            Some(&json!({"cluster-name": "aerospike", "proto-fd-max": 20000}))
        );

        let names: Vec<_> = merged
            .namespaces()
            .expect("merged namespaces parse")
            .iter()
            .map(|ns| (ns.name.to_string(), ns.replication_factor().unwrap_or_default()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("test".to_string(), 2),
                ("bar".to_string(), 3),
                ("baz".to_string(), 1)
            ]
        );
        assert_eq!(
            merged.as_map().get("logging"),
            Some(&json!([{"name": "console", "any": "info"}]))
        );
    }

    #[test]
    fn test_connection_lookup() {
        let config = tree(json!({
            "network": {
                "service": {"port": 3000},
                "tls": [{"name": "aerospike-a-0.test-runner", "ca-file": "/etc/aerospike/secret/cacert.pem"}]
            }
        }));

        let service = config
            .connection("service")
            .expect("network is a map")
            .expect("service is present");
        assert_eq!(service.int("port").found(), Some(3000));
        assert!(config.connection("fabric").expect("network is a map").is_none());

        let entries = config.tls_entries().expect("tls parses");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "aerospike-a-0.test-runner");
        assert_eq!(entries[0].ca_file(), Some("/etc/aerospike/secret/cacert.pem"));
        assert_eq!(entries[0].ca_path(), None);
    }
}
