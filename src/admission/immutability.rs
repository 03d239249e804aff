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

//! Fields frozen once a descriptor has been accepted.

use super::{Error, ImmutableSnafu};
use crate::types::v1::cluster::AerospikeCluster;
use crate::types::v1::config::{ConfigTree, NETWORK_CONNECTION_TYPES, Section, TLS_NAME};
use crate::types::v1::network::{AerospikeNetworkPolicy, AerospikeNetworkType, NetworkDirection};
use crate::types::v1::pod::AerospikePodSpec;
use crate::types::v1::storage::StorageSpec;
use serde_json::Map;
use snafu::ensure;
use std::collections::BTreeSet;

/// Plain ports of a network connection, each paired with its `tls-` twin.
const NETWORK_PORTS: [&str; 3] = ["port", "access-port", "alternate-access-port"];

pub fn validate(old: &AerospikeCluster, new: &AerospikeCluster) -> Result<(), Error> {
    validate_storage_update(&old.spec.storage, &new.spec.storage, "storage")?;
    validate_pod_networking(&old.spec.pod_spec, &new.spec.pod_spec)?;
    validate_network_policy_update(
        &old.spec.aerospike_network_policy,
        &new.spec.aerospike_network_policy,
    )?;

    if let (Some(old_config), Some(new_config)) =
        (&old.spec.aerospike_config, &new.spec.aerospike_config)
    {
        validate_config_update(old_config, new_config, "aerospikeConfig")?;
    }

    validate_rack_update(old, new)
}

fn validate_rack_update(old: &AerospikeCluster, new: &AerospikeCluster) -> Result<(), Error> {
    let old_racks = old.effective_racks();
    for new_rack in new.effective_racks() {
        let Some(old_rack) = old_racks.iter().find(|rack| rack.id == new_rack.id) else {
            continue;
        };
        let field = format!("rackConfig.racks[{}]", new_rack.id);

        if let (Some(old_spec), Some(new_spec)) = (old_rack.rack, new_rack.rack) {
            for ((name, old_value), (_, new_value)) in
                old_spec.identity().into_iter().zip(new_spec.identity())
            {
                ensure!(
                    old_value == new_value,
                    ImmutableSnafu {
                        field: format!("{field}.{name}"),
                        message: format!("old value `{old_value}`, new value `{new_value}`"),
                    }
                );
            }
        }

        if old_rack.has_config_override() || new_rack.has_config_override() {
            validate_config_update(
                &old_rack.config,
                &new_rack.config,
                &format!("{field}.aerospikeConfig"),
            )?;
        }

        if old_rack.has_storage_override() || new_rack.has_storage_override() {
            validate_storage_update(old_rack.storage, new_rack.storage, &format!("{field}.storage"))?;
        }
    }
    Ok(())
}

/// Volume sources are frozen, persistent volumes can be neither added nor
/// removed and only `cascadeDelete` may change on a persistent volume.
fn validate_storage_update(old: &StorageSpec, new: &StorageSpec, field: &str) -> Result<(), Error> {
    for new_volume in &new.volumes {
        let volume_field = format!("{field}.volumes[{}]", new_volume.name);
        let Some(old_volume) = old.volume_by_name(&new_volume.name) else {
            ensure!(
                !new_volume.is_persistent(),
                ImmutableSnafu {
                    field: format!("{field}.volumes"),
                    message: format!("persistent volume {} cannot be added", new_volume.name),
                }
            );
            continue;
        };

        ensure!(
            old_volume.source == new_volume.source,
            ImmutableSnafu {
                field: format!("{volume_field}.source"),
                message: format!(
                    "old value {}, new value {}",
                    old_volume.source.describe(),
                    new_volume.source.describe()
                ),
            }
        );

        if new_volume.is_persistent() {
            for (name, unchanged) in [
                ("aerospike", old_volume.aerospike == new_volume.aerospike),
                ("initMethod", old_volume.init_method == new_volume.init_method),
                ("wipeMethod", old_volume.wipe_method == new_volume.wipe_method),
            ] {
                ensure!(
                    unchanged,
                    ImmutableSnafu {
                        field: format!("{volume_field}.{name}"),
                        message: "only cascadeDelete can change on a persistent volume",
                    }
                );
            }
        }
    }

    for old_volume in old.persistent_volumes() {
        ensure!(
            new.volume_by_name(&old_volume.name).is_some(),
            ImmutableSnafu {
                field: format!("{field}.volumes"),
                message: format!("persistent volume {} cannot be removed", old_volume.name),
            }
        );
    }
    Ok(())
}

fn validate_pod_networking(old: &AerospikePodSpec, new: &AerospikePodSpec) -> Result<(), Error> {
    ensure!(
        old.multi_pod_per_host() == new.multi_pod_per_host(),
        ImmutableSnafu {
            field: "podSpec.multiPodPerHost",
            message: format!(
                "old value {}, new value {}",
                old.multi_pod_per_host(),
                new.multi_pod_per_host()
            ),
        }
    );
    if old.host_network != new.host_network {
        ensure!(
            !(old.multi_pod_per_host() || new.multi_pod_per_host()),
            ImmutableSnafu {
                field: "podSpec.hostNetwork",
                message: format!(
                    "cannot change from {} to {} while multiPodPerHost is enabled",
                    old.host_network, new.host_network
                ),
            }
        );
    }
    Ok(())
}

fn validate_network_policy_update(
    old: &AerospikeNetworkPolicy,
    new: &AerospikeNetworkPolicy,
) -> Result<(), Error> {
    for direction in [NetworkDirection::Fabric, NetworkDirection::TlsFabric] {
        let (old_type, new_type) = (old.network_type(direction), new.network_type(direction));
        ensure!(
            old_type == new_type,
            ImmutableSnafu {
                field: format!("aerospikeNetworkPolicy.{direction}"),
                message: format!("old value {old_type}, new value {new_type}"),
            }
        );
    }

    for direction in NetworkDirection::ALL {
        let custom = AerospikeNetworkType::CustomInterface;
        if old.network_type(direction) != custom || new.network_type(direction) != custom {
            continue;
        }
        let (old_names, new_names) = (old.custom_names(direction), new.custom_names(direction));
        ensure!(
            old_names == new_names,
            ImmutableSnafu {
                field: format!("aerospikeNetworkPolicy.{}", direction.custom_names_field()),
                message: format!(
                    "old value {:?}, new value {:?}",
                    old_names.unwrap_or_default(),
                    new_names.unwrap_or_default()
                ),
            }
        );
    }
    Ok(())
}

/// Frozen parts of an `aerospikeConfig` tree; `field` prefixes rejection paths.
pub(crate) fn validate_config_update(
    old: &ConfigTree,
    new: &ConfigTree,
    field: &str,
) -> Result<(), Error> {
    validate_tls_update(old, new, field)?;

    let empty = Map::new();
    for kind in NETWORK_CONNECTION_TYPES {
        let old_connection = old.connection(kind)?.unwrap_or(Section::new(&empty));
        let new_connection = new.connection(kind)?.unwrap_or(Section::new(&empty));
        validate_connection_update(
            old_connection,
            new_connection,
            &format!("{field}.network.{kind}"),
        )?;
    }

    validate_namespace_update(old, new, field)
}

fn validate_connection_update(old: Section<'_>, new: Section<'_>, field: &str) -> Result<(), Error> {
    if let (Some(old_name), Some(new_name)) = (old.str(TLS_NAME).found(), new.str(TLS_NAME).found())
    {
        ensure!(
            old_name == new_name,
            ImmutableSnafu {
                field: format!("{field}.{TLS_NAME}"),
                message: format!("old value {old_name}, new value {new_name}"),
            }
        );
    }

    for port in NETWORK_PORTS {
        validate_port_update(old, new, port, field)?;
    }
    Ok(())
}

fn validate_port_update(old: Section<'_>, new: Section<'_>, port: &str, field: &str) -> Result<(), Error> {
    let tls_port = format!("tls-{port}");
    for key in [port, tls_port.as_str()] {
        if let (Some(old_port), Some(new_port)) = (old.get(key), new.get(key)) {
            ensure!(
                old_port == new_port,
                ImmutableSnafu {
                    field: format!("{field}.{key}"),
                    message: format!("old value {old_port}, new value {new_port}"),
                }
            );
        }
    }

    let (old_plain, new_plain) = (old.contains(port), new.contains(port));
    let (old_tls, new_tls) = (old.contains(&tls_port), new.contains(&tls_port));
    let removed = (old_tls && !new_tls) || (old_plain && !new_plain);
    ensure!(
        !removed || (old_tls && old_plain),
        ImmutableSnafu {
            field,
            message: "cannot remove tls or non-tls configurations unless both configurations have been set initially",
        }
    );
    Ok(())
}

/// CA material of TLS entries referenced by a connection.
fn validate_tls_update(old: &ConfigTree, new: &ConfigTree, field: &str) -> Result<(), Error> {
    let old_entries = old.tls_entries()?;
    let new_entries = new.tls_entries()?;
    if old_entries.is_empty() || new_entries.is_empty() {
        return Ok(());
    }

    let old_used = used_tls_names(old)?;
    let new_used = used_tls_names(new)?;

    for new_entry in new_entries
        .iter()
        .filter(|entry| old_used.contains(entry.name) && new_used.contains(entry.name))
    {
        let Some(old_entry) = old_entries.iter().find(|entry| entry.name == new_entry.name) else {
            continue;
        };
        let entry_field = format!("{field}.network.tls[{}]", new_entry.name);

        let had_ca = old_entry.ca_file().is_some() || old_entry.ca_path().is_some();
        let has_ca = new_entry.ca_file().is_some() || new_entry.ca_path().is_some();
        ensure!(
            !had_ca || has_ca,
            ImmutableSnafu {
                field: entry_field.clone(),
                message: "cannot remove used `ca-file` or `ca-path` from tls",
            }
        );

        if let (Some(old_file), Some(new_file)) = (old_entry.ca_file(), new_entry.ca_file()) {
            ensure!(
                old_file == new_file,
                ImmutableSnafu {
                    field: format!("{entry_field}.ca-file"),
                    message: format!(
                        "cannot change ca-file of used tls, old value {old_file}, new value {new_file}"
                    ),
                }
            );
        }
    }
    Ok(())
}

/// Names of TLS entries referenced by any network connection.
fn used_tls_names(config: &ConfigTree) -> Result<BTreeSet<&str>, Error> {
    let mut used = BTreeSet::new();
    for kind in NETWORK_CONNECTION_TYPES {
        if let Some(name) = config
            .connection(kind)?
            .and_then(|connection| connection.str(TLS_NAME).found())
        {
            used.insert(name);
        }
    }
    Ok(used)
}

fn validate_namespace_update(old: &ConfigTree, new: &ConfigTree, field: &str) -> Result<(), Error> {
    let old_namespaces = old.namespaces()?;
    for new_ns in new.namespaces()? {
        let Some(old_ns) = old_namespaces.iter().find(|ns| ns.name == new_ns.name) else {
            continue;
        };
        let ns_field = format!("{field}.namespaces[{}]", new_ns.name);

        let (old_rf, new_rf) = (old_ns.replication_factor()?, new_ns.replication_factor()?);
        ensure!(
            old_rf == new_rf,
            ImmutableSnafu {
                field: format!("{ns_field}.replication-factor"),
                message: format!("old value {old_rf}, new value {new_rf}"),
            }
        );

        let (old_sc, new_sc) = (old_ns.strong_consistency()?, new_ns.strong_consistency()?);
        ensure!(
            old_sc == new_sc,
            ImmutableSnafu {
                field: format!("{ns_field}.strong-consistency"),
                message: format!("old value {old_sc}, new value {new_sc}"),
            }
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::admission::RejectionKind;
    use crate::tests::{config_mut, create_test_cluster, empty_dir_volume, pv_volume, tree, with_racks};
    use crate::types::v1::storage::VolumeMode;
    use serde_json::json;

    fn rejection(old: &AerospikeCluster, new: &AerospikeCluster) -> Error {
        validate(old, new).expect_err("change should be rejected")
    }

    #[test]
    fn test_self_diff_is_accepted() {
        let cluster = create_test_cluster();
        validate(&cluster, &cluster).unwrap();

        let mut racked = create_test_cluster();
        with_racks(&mut racked, &[1, 2]);
        racked.spec.rack_config.racks[0].zone = "us-east-1a".to_string();
        validate(&racked, &racked).unwrap();
    }

    #[test]
    fn test_volume_mode_change_rejected() {
        let old = create_test_cluster();
        let mut new = create_test_cluster();
        if let Some(pv) = new.spec.storage.volumes[1].source.persistent_volume.as_mut() {
            pv.volume_mode = VolumeMode::Filesystem;
        }

        let error = rejection(&old, &new);
        assert_eq!(error.kind(), RejectionKind::ImmutabilityViolation);
        assert!(
            error.to_string().starts_with("cannot update storage.volumes[ns].source"),
            "{error}"
        );
    }

    #[test]
    fn test_cascade_delete_is_mutable() {
        let old = create_test_cluster();
        let mut new = create_test_cluster();
        new.spec.storage.volumes[1].cascade_delete = Some(true);
        validate(&old, &new).unwrap();

        new.spec.storage.volumes[1].init_method = Some(crate::types::v1::storage::VolumeMethod::Dd);
        assert!(rejection(&old, &new).to_string().contains("storage.volumes[ns].initMethod"));
    }

    #[test]
    fn test_persistent_volumes_cannot_be_added_or_removed() {
        let old = create_test_cluster();

        let mut added = create_test_cluster();
        added.spec.storage.volumes.push(pv_volume("extra", "/opt/extra", VolumeMode::Filesystem));
        assert!(rejection(&old, &added).to_string().ends_with("persistent volume extra cannot be added"));

        let mut removed = create_test_cluster();
        removed.spec.storage.volumes.retain(|volume| volume.name != "ns");
        assert!(rejection(&old, &removed).to_string().ends_with("persistent volume ns cannot be removed"));

        let mut scratch = create_test_cluster();
        scratch.spec.storage.volumes.push(empty_dir_volume("scratch", "/opt/scratch"));
        validate(&old, &scratch).unwrap();
        validate(&scratch, &old).unwrap();
    }

    #[test]
    fn test_multi_pod_per_host_is_frozen() {
        let old = create_test_cluster();
        let mut new = create_test_cluster();
        new.spec.pod_spec.multi_pod_per_host = Some(true);
        assert!(rejection(&old, &new).to_string().starts_with("cannot update podSpec.multiPodPerHost"));
    }

    #[test]
    fn test_host_network_frozen_with_multi_pod() {
        let mut old = create_test_cluster();
        old.spec.pod_spec.multi_pod_per_host = Some(true);
        let mut new = old.clone();
        new.spec.pod_spec.host_network = true;
        assert!(rejection(&old, &new).to_string().starts_with("cannot update podSpec.hostNetwork"));

        old.spec.pod_spec.multi_pod_per_host = Some(false);
        new.spec.pod_spec.multi_pod_per_host = Some(false);
        validate(&old, &new).unwrap();
    }

    #[test]
    fn test_fabric_network_type_is_frozen() {
        let old = create_test_cluster();
        let mut new = create_test_cluster();
        new.spec.aerospike_network_policy.fabric_type = AerospikeNetworkType::HostInternal;
        assert_eq!(
            rejection(&old, &new).to_string(),
            "cannot update aerospikeNetworkPolicy.fabric: old value unspecified, new value hostInternal"
        );

        let mut access = create_test_cluster();
        access.spec.aerospike_network_policy.access_type = AerospikeNetworkType::HostExternal;
        validate(&old, &access).unwrap();
    }

    #[test]
    fn test_custom_interface_names_are_frozen() {
        let mut old = create_test_cluster();
        old.spec.aerospike_network_policy.fabric_type = AerospikeNetworkType::CustomInterface;
        old.spec.aerospike_network_policy.custom_fabric_network_names = Some(vec!["fabric-a".to_string()]);

        let mut renamed = old.clone();
        renamed.spec.aerospike_network_policy.custom_fabric_network_names =
            Some(vec!["fabric-b".to_string()]);
        assert_eq!(
            rejection(&old, &renamed).to_string(),
            r#"cannot update aerospikeNetworkPolicy.customFabricNetworkNames: old value ["fabric-a"], new value ["fabric-b"]"#
        );

        let mut access_old = create_test_cluster();
        access_old.spec.aerospike_network_policy.access_type = AerospikeNetworkType::CustomInterface;
        access_old.spec.aerospike_network_policy.custom_access_network_names =
            Some(vec!["access-a".to_string()]);
        let mut access_new = create_test_cluster();
        access_new.spec.aerospike_network_policy.access_type = AerospikeNetworkType::Pod;
        validate(&access_old, &access_new).unwrap();
    }

    #[test]
    fn test_rack_identity_is_frozen() {
        let mut old = create_test_cluster();
        with_racks(&mut old, &[1, 2]);
        old.spec.rack_config.racks[0].zone = "us-east-1a".to_string();
        let mut new = old.clone();
        new.spec.rack_config.racks[0].zone = "us-east-1b".to_string();
        assert_eq!(
            rejection(&old, &new).to_string(),
            "cannot update rackConfig.racks[1].zone: old value `us-east-1a`, new value `us-east-1b`"
        );
    }

    #[test]
    fn test_ports_and_tls_name_are_frozen() {
        let old = create_test_cluster();

        let mut port = create_test_cluster();
        config_mut(&mut port)["network"]["service"]["port"] = json!(3100);
        assert_eq!(
            rejection(&old, &port).to_string(),
            "cannot update aerospikeConfig.network.service.port: old value 3000, new value 3100"
        );

        let mut tls_old = create_test_cluster();
        config_mut(&mut tls_old)["network"]["fabric"] =
            json!({"port": 3001, "tls-name": "fabric-tls", "tls-port": 3011});
        let mut tls_new = tls_old.clone();
        config_mut(&mut tls_new)["network"]["fabric"]["tls-name"] = json!("other-tls");
        assert!(
            rejection(&tls_old, &tls_new)
                .to_string()
                .starts_with("cannot update aerospikeConfig.network.fabric.tls-name")
        );
    }

    #[test]
    fn test_connection_half_removal() {
        let mut tls_only = create_test_cluster();
        config_mut(&mut tls_only)["network"]["heartbeat"] =
            json!({"tls-name": "hb-tls", "tls-port": 3012});
        let mut plain = create_test_cluster();
        config_mut(&mut plain)["network"]["heartbeat"] = json!({"port": 3002});
        assert!(
            rejection(&tls_only, &plain)
                .to_string()
                .ends_with("cannot remove tls or non-tls configurations unless both configurations have been set initially")
        );

        let mut both = create_test_cluster();
        config_mut(&mut both)["network"]["heartbeat"] =
            json!({"port": 3002, "tls-name": "hb-tls", "tls-port": 3012});
        validate(&both, &plain).unwrap();
        validate(&both, &tls_only).unwrap();
    }

    #[test]
    fn test_access_port_half_removal() {
        let mut old = create_test_cluster();
        config_mut(&mut old)["network"]["service"] = json!({"port": 3000, "access-port": 3100});
        let mut new = create_test_cluster();
        config_mut(&mut new)["network"]["service"] = json!({"port": 3000});
        let error = rejection(&old, &new);
        assert_eq!(error.kind(), RejectionKind::ImmutabilityViolation);
        assert!(
            error
                .to_string()
                .ends_with("cannot remove tls or non-tls configurations unless both configurations have been set initially")
        );

        let mut tls_old = create_test_cluster();
        config_mut(&mut tls_old)["network"]["service"] =
            json!({"port": 3000, "tls-name": "svc", "tls-port": 4333, "tls-access-port": 4433});
        let mut tls_new = tls_old.clone();
        config_mut(&mut tls_new)["network"]["service"]
            .as_object_mut()
            .unwrap()
            .remove("tls-access-port");
        assert!(
            rejection(&tls_old, &tls_new)
                .to_string()
                .starts_with("cannot update aerospikeConfig.network.service: cannot remove tls")
        );
    }

    #[test]
    fn test_alternate_access_port_pair() {
        let mut both = create_test_cluster();
        config_mut(&mut both)["network"]["service"] = json!({
            "port": 3000,
            "alternate-access-port": 3200,
            "tls-name": "svc",
            "tls-port": 4333,
            "tls-alternate-access-port": 4533
        });

        let mut plain_dropped = both.clone();
        config_mut(&mut plain_dropped)["network"]["service"]
            .as_object_mut()
            .unwrap()
            .remove("alternate-access-port");
        validate(&both, &plain_dropped).unwrap();

        let mut tls_only = create_test_cluster();
        config_mut(&mut tls_only)["network"]["service"] = json!({
            "port": 3000,
            "tls-name": "svc",
            "tls-port": 4333,
            "tls-alternate-access-port": 4533
        });
        let mut tls_dropped = tls_only.clone();
        config_mut(&mut tls_dropped)["network"]["service"]
            .as_object_mut()
            .unwrap()
            .remove("tls-alternate-access-port");
        assert!(rejection(&tls_only, &tls_dropped).to_string().contains("cannot remove tls"));

        let mut moved = both.clone();
        config_mut(&mut moved)["network"]["service"]["tls-alternate-access-port"] = json!(4534);
        assert_eq!(
            rejection(&both, &moved).to_string(),
            "cannot update aerospikeConfig.network.service.tls-alternate-access-port: old value 4533, new value 4534"
        );
    }

    #[test]
    fn test_newly_referenced_tls_ca_may_change() {
        let tls = json!([{
            "name": "svc",
            "cert-file": "/etc/aerospike/secret/cert.pem",
            "ca-file": "/etc/aerospike/secret/ca.pem"
        }]);
        let mut old = create_test_cluster();
        config_mut(&mut old)["network"]["tls"] = tls;

        let mut new = old.clone();
        config_mut(&mut new)["network"]["service"] =
            json!({"port": 3000, "tls-name": "svc", "tls-port": 4333});
        config_mut(&mut new)["network"]["tls"][0]["ca-file"] = json!("/etc/aerospike/secret/ca2.pem");
        validate(&old, &new).unwrap();
    }

    #[test]
    fn test_used_tls_ca_is_frozen() {
        let mut old = create_test_cluster();
        config_mut(&mut old)["network"]["service"] =
            json!({"port": 3000, "tls-name": "svc", "tls-port": 4333});
        config_mut(&mut old)["network"]["tls"] = json!([{
            "name": "svc",
            "cert-file": "/etc/aerospike/secret/cert.pem",
            "ca-file": "/etc/aerospike/secret/ca.pem"
        }]);

        let mut dropped = old.clone();
        config_mut(&mut dropped)["network"]["tls"][0]
            .as_object_mut()
            .unwrap()
            .remove("ca-file");
        assert!(
            rejection(&old, &dropped)
                .to_string()
                .ends_with("cannot remove used `ca-file` or `ca-path` from tls")
        );

        let mut changed = old.clone();
        config_mut(&mut changed)["network"]["tls"][0]["ca-file"] = json!("/etc/aerospike/secret/ca2.pem");
        assert!(rejection(&old, &changed).to_string().contains("cannot change ca-file of used tls"));
    }

    #[test]
    fn test_namespace_replication_factor_is_frozen() {
        let old = create_test_cluster();
        let mut new = create_test_cluster();
        config_mut(&mut new)["namespaces"][0]["replication-factor"] = json!(3);
        assert_eq!(
            rejection(&old, &new).to_string(),
            "cannot update aerospikeConfig.namespaces[test].replication-factor: old value 2, new value 3"
        );

        let mut sc = create_test_cluster();
        config_mut(&mut sc)["namespaces"][0]["strong-consistency"] = json!(true);
        assert!(rejection(&old, &sc).to_string().contains("namespaces[test].strong-consistency"));
    }

    #[test]
    fn test_rack_override_checked_with_rack_prefix() {
        let mut old = create_test_cluster();
        with_racks(&mut old, &[1]);
        old.spec.rack_config.racks[0].aerospike_config =
            Some(tree(json!({"namespaces": [{"name": "test", "replication-factor": 2}]})));
        let mut new = old.clone();
        new.spec.rack_config.racks[0].aerospike_config =
            Some(tree(json!({"namespaces": [{"name": "test", "replication-factor": 1}]})));
        assert!(
            rejection(&old, &new)
                .to_string()
                .starts_with("cannot update rackConfig.racks[1].aerospikeConfig.namespaces[test]")
        );
    }
}
