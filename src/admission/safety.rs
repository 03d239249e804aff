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

//! Invariants spanning the incoming descriptor, the accepted one and the
//! running cluster.

use super::structural::StorageClaims;
use super::version::{BASE_INIT_VERSION, BASE_VERSION, MIN_INIT_VERSION_FOR_DYNAMIC_CONF, image_version};
use super::{
    Error, Generations, ImageVersionSnafu, ImmutableSnafu, UnsafeSnafu, UpgradeSnafu,
    VersionCompareSnafu,
};
use crate::context::Context;
use crate::types::v1::cluster::AerospikeCluster;
use crate::types::v1::config::ConfigTree;
use crate::types::v1::rack::EffectiveRack;
use crate::types::v1::status::AerospikeClusterStatus;
use snafu::{ResultExt, ensure};
use std::collections::BTreeSet;
use tracing::debug;

pub fn validate(ctx: &Context, generations: &Generations<'_>, version: &str) -> Result<(), Error> {
    let cluster = generations.incoming;
    validate_version(ctx, generations, version)?;

    let racks = cluster.effective_racks();
    validate_replication_factors(cluster.spec.size, &racks)?;
    validate_migrate_fill_delay(&racks)?;
    validate_security_downgrade(generations)?;

    if let Some(status) = generations.applied_status() {
        validate_storage_reuse(cluster, &racks, status)?;
    }

    validate_dynamic_config(ctx, cluster, generations.observed)?;
    validate_operations(generations)
}

fn validate_version(ctx: &Context, generations: &Generations<'_>, version: &str) -> Result<(), Error> {
    let ordering = ctx
        .versions
        .compare(version, BASE_VERSION)
        .context(VersionCompareSnafu)?;
    ensure!(
        ordering.is_ge(),
        UnsafeSnafu {
            message: format!("image version {version} not supported. Base version {BASE_VERSION}"),
        }
    );

    if let Some(accepted) = generations.accepted {
        let running = image_version(&accepted.spec.image).context(ImageVersionSnafu)?;
        if running != version {
            debug!(from = %running, to = version, "checking upgrade path");
            ctx.versions
                .is_valid_upgrade(&running, version)
                .context(UpgradeSnafu)?;
        }
    }
    Ok(())
}

/// AP namespaces may have more replicas than pods, SC namespaces may not.
fn validate_replication_factors(size: i32, racks: &[EffectiveRack<'_>]) -> Result<(), Error> {
    for rack in racks {
        for ns in rack.config.namespaces()? {
            if !ns.strong_consistency()? {
                continue;
            }
            let rf = ns.replication_factor()?;
            ensure!(
                rf <= i64::from(size),
                UnsafeSnafu {
                    message: format!(
                        "strong-consistency namespace {} replication-factor {rf} cannot be more than cluster size {size}",
                        ns.name
                    ),
                }
            );
        }
    }
    Ok(())
}

fn validate_migrate_fill_delay(racks: &[EffectiveRack<'_>]) -> Result<(), Error> {
    let mut delays = BTreeSet::new();
    for rack in racks {
        let delay = match rack.config.service().found() {
            Some(service) => service
                .int("migrate-fill-delay")
                .optional("service.migrate-fill-delay")?
                .unwrap_or(0),
            None => 0,
        };
        delays.insert(delay);
    }
    ensure!(
        delays.len() <= 1,
        UnsafeSnafu {
            message: "migrate-fill-delay value should be same across all racks",
        }
    );
    Ok(())
}

fn validate_security_downgrade(generations: &Generations<'_>) -> Result<(), Error> {
    let Some(config) = generations.incoming.spec.aerospike_config.as_ref() else {
        return Ok(());
    };
    if config.security_enabled()? {
        return Ok(());
    }

    let running = generations
        .applied_status()
        .and_then(|status| status.aerospike_config.as_ref());
    let accepted = generations
        .accepted
        .and_then(|cluster| cluster.spec.aerospike_config.as_ref());
    for previous in [running, accepted].into_iter().flatten() {
        ensure!(
            !previous.security_enabled()?,
            UnsafeSnafu {
                message: "cannot disable cluster security in running cluster",
            }
        );
    }
    Ok(())
}

/// A device or file can only move to another namespace once the running
/// cluster no longer uses it.
fn validate_storage_reuse(
    cluster: &AerospikeCluster,
    racks: &[EffectiveRack<'_>],
    status: &AerospikeClusterStatus,
) -> Result<(), Error> {
    let status_racks = status.effective_racks();

    let mut pairs: Vec<(&ConfigTree, &ConfigTree)> = Vec::new();
    if let (Some(incoming), Some(observed)) = (&cluster.spec.aerospike_config, &status.aerospike_config) {
        pairs.push((incoming, observed));
    }
    for rack in racks {
        if let Some(observed) = status_racks.iter().find(|observed| observed.id == rack.id) {
            pairs.push((&rack.config, &observed.config));
        }
    }

    for (incoming, observed) in pairs {
        let namespaces = incoming.namespaces()?;
        let claims = StorageClaims::from_namespaces(&namespaces)?;
        for ns in observed.observed_namespaces() {
            for (kind, paths, claimed) in [
                ("device", ns.device_paths(), &claims.devices),
                ("file", ns.file_paths(), &claims.files),
            ] {
                for path in paths {
                    if let Some(current) = claimed.get(path)
                        && *current != ns.name
                    {
                        return UnsafeSnafu {
                            message: format!(
                                "{kind} {path} can not be removed and re-used in a different namespace at the same time. It has to be removed first. currentNamespace `{current}`, oldNamespace `{}`",
                                ns.name
                            ),
                        }
                        .fail();
                    }
                }
            }
        }
    }
    Ok(())
}

fn validate_dynamic_config(
    ctx: &Context,
    cluster: &AerospikeCluster,
    status: Option<&AerospikeClusterStatus>,
) -> Result<(), Error> {
    if !cluster.dynamic_config_update_enabled() {
        return Ok(());
    }
    let Some(status) = status else {
        return Ok(());
    };

    let mut lowest: Option<String> = None;
    for pod in status.pods.values() {
        let version = match pod.init_image() {
            Some(image) => image_version(image).context(ImageVersionSnafu)?,
            None => BASE_INIT_VERSION.to_string(),
        };
        let is_lower = match &lowest {
            Some(current) => ctx
                .versions
                .compare(&version, current)
                .context(VersionCompareSnafu)?
                .is_lt(),
            None => true,
        };
        if is_lower {
            lowest = Some(version);
        }
    }

    let Some(lowest) = lowest else {
        return Ok(());
    };
    let ordering = ctx
        .versions
        .compare(&lowest, MIN_INIT_VERSION_FOR_DYNAMIC_CONF)
        .context(VersionCompareSnafu)?;
    ensure!(
        ordering.is_ge(),
        UnsafeSnafu {
            message: format!(
                "cannot enable enableDynamicConfigUpdate flag, some init containers are running version less than {MIN_INIT_VERSION_FOR_DYNAMIC_CONF}"
            ),
        }
    );
    Ok(())
}

fn validate_operations(generations: &Generations<'_>) -> Result<(), Error> {
    let spec = &generations.incoming.spec;
    let Some(operation) = spec.operations.first() else {
        return Ok(());
    };
    let Some(status) = generations.applied_status() else {
        let message = if generations.is_update() {
            "operation cannot be added before the cluster has applied any configuration"
        } else {
            "operation cannot be added during aerospike cluster creation"
        };
        return UnsafeSnafu { message }.fail();
    };

    let accepted = generations.accepted.map(|cluster| &cluster.spec);
    if let Some(previous) = accepted.and_then(|spec| spec.operations.first())
        && previous.id == operation.id
    {
        ensure!(
            previous == operation,
            ImmutableSnafu {
                field: format!("operations[{}]", operation.id),
                message: format!("operation {} cannot be updated", operation.id),
            }
        );
    }

    let pods = status.pod_names();
    let unknown: Vec<&str> = operation
        .pod_list
        .iter()
        .map(String::as_str)
        .filter(|pod| !pods.contains(pod))
        .collect();
    ensure!(
        unknown.is_empty(),
        UnsafeSnafu {
            message: format!("invalid pod names in operation {}: {}", operation.id, unknown.join(", ")),
        }
    );

    if spec.operations == status.operations {
        return Ok(());
    }

    // Pods created by the same change would miss the operation.
    ensure!(
        spec.size <= status.size,
        UnsafeSnafu {
            message: "cannot change Spec.Operations along with cluster scale-up",
        }
    );
    let racks = spec.rack_config.racks.len();
    ensure!(
        racks == status.rack_config.racks.len()
            && accepted.is_none_or(|old| old.rack_config.racks.len() == racks),
        UnsafeSnafu {
            message: "cannot change Spec.Operations along with rack addition/removal",
        }
    );
    ensure!(
        spec.image == status.image && accepted.is_none_or(|old| old.image == spec.image),
        UnsafeSnafu {
            message: "cannot change Spec.Operations along with image update",
        }
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::admission::RejectionKind;
    use crate::tests::{
        TEST_DEVICE, TEST_IMAGE, config_mut, create_test_cluster, create_test_status,
        set_namespaces, tree, with_racks,
    };
    use crate::types::v1::operation::{OperationKind, OperationSpec};
    use serde_json::json;

    fn check(generations: &Generations<'_>) -> Result<(), Error> {
        let version = image_version(&generations.incoming.spec.image).unwrap();
        validate(&Context::default(), generations, &version)
    }

    fn warm_restart(id: &str, pods: &[&str]) -> OperationSpec {
        OperationSpec {
            kind: OperationKind::WarmRestart,
            id: id.to_string(),
            pod_list: pods.iter().map(|pod| pod.to_string()).collect(),
        }
    }

    #[test]
    fn test_self_diff_is_safe() {
        let cluster = create_test_cluster();
        let status = create_test_status(&cluster);
        check(&Generations::update(&cluster, &cluster).with_status(Some(&status))).unwrap();
    }

    #[test]
    fn test_version_below_baseline_rejected() {
        let mut cluster = create_test_cluster();
        cluster.spec.image = "aerospike/aerospike-server-enterprise:5.7.0.17".to_string();
        let error = check(&Generations::create(&cluster)).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert_eq!(
            error.to_string(),
            "image version 5.7.0.17 not supported. Base version 6.0.0.0"
        );
    }

    #[test]
    fn test_major_downgrade_rejected_by_default_oracle() {
        let old = create_test_cluster();
        let mut new = create_test_cluster();
        new.spec.image = "aerospike/aerospike-server-enterprise:7.2.0.1".to_string();
        let error = check(&Generations::update(&new, &old)).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::ExternalValidationError);
        assert!(error.to_string().starts_with("failed to start upgrade"));
    }

    #[test]
    fn test_strong_consistency_replication_factor_bounded_by_size() {
        let mut cluster = create_test_cluster();
        cluster.spec.size = 2;
        set_namespaces(
            &mut cluster,
            json!([{"name": "test", "replication-factor": 3, "strong-consistency": true,
                    "storage-engine": {"type": "device", "devices": [TEST_DEVICE]}}]),
        );
        assert_eq!(
            check(&Generations::create(&cluster)).unwrap_err().to_string(),
            "strong-consistency namespace test replication-factor 3 cannot be more than cluster size 2"
        );

        set_namespaces(
            &mut cluster,
            json!([{"name": "test", "replication-factor": 3,
                    "storage-engine": {"type": "device", "devices": [TEST_DEVICE]}}]),
        );
        check(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_migrate_fill_delay_must_match() {
        let mut cluster = create_test_cluster();
        with_racks(&mut cluster, &[1, 2]);
        cluster.spec.rack_config.racks[1].aerospike_config =
            Some(tree(json!({"service": {"migrate-fill-delay": 600}})));
        assert_eq!(
            check(&Generations::create(&cluster)).unwrap_err().to_string(),
            "migrate-fill-delay value should be same across all racks"
        );

        cluster.spec.rack_config.racks[0].aerospike_config =
            Some(tree(json!({"service": {"migrate-fill-delay": 600}})));
        check(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_security_cannot_be_disabled() {
        let mut old = create_test_cluster();
        config_mut(&mut old).insert("security".to_string(), json!({}));
        let status = create_test_status(&old);
        let new = create_test_cluster();

        let error = check(&Generations::update(&new, &old).with_status(Some(&status))).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert_eq!(error.to_string(), "cannot disable cluster security in running cluster");

        // Running cluster secured even though the accepted spec is not.
        let plain = create_test_cluster();
        assert!(check(&Generations::update(&new, &plain).with_status(Some(&status))).is_err());

        let mut legacy = create_test_cluster();
        config_mut(&mut legacy).insert("security".to_string(), json!({"enable-security": false}));
        check(&Generations::update(&new, &legacy)).unwrap();
    }

    #[test]
    fn test_device_cannot_move_between_namespaces_in_one_step() {
        let old = create_test_cluster();
        let status = create_test_status(&old);
        let mut new = create_test_cluster();
        set_namespaces(
            &mut new,
            json!([{"name": "bar", "storage-engine": {"type": "device", "devices": [TEST_DEVICE]}}]),
        );

        let error = check(&Generations::update(&new, &old).with_status(Some(&status))).unwrap_err();
        assert_eq!(
            error.to_string(),
            format!(
                "device {TEST_DEVICE} can not be removed and re-used in a different namespace at the same time. It has to be removed first. currentNamespace `bar`, oldNamespace `test`"
            )
        );

        // Nothing observed yet, nothing to collide with.
        check(&Generations::update(&new, &old)).unwrap();
    }

    #[test]
    fn test_dynamic_config_needs_recent_init_containers() {
        let mut cluster = create_test_cluster();
        cluster.spec.enable_dynamic_config_update = Some(true);
        let mut status = create_test_status(&cluster);
        check(&Generations::update(&cluster, &cluster).with_status(Some(&status))).unwrap();

        if let Some(pod) = status.pods.values_mut().next() {
            pod.init_image = None;
        }
        let error = check(&Generations::update(&cluster, &cluster).with_status(Some(&status))).unwrap_err();
        assert!(error.to_string().contains("less than 2.2.0"), "{error}");
    }

    #[test]
    fn test_operation_rejected_on_creation() {
        let mut cluster = create_test_cluster();
        cluster.spec.operations = vec![warm_restart("restart-1", &[])];
        assert_eq!(
            check(&Generations::create(&cluster)).unwrap_err().to_string(),
            "operation cannot be added during aerospike cluster creation"
        );

        let old = create_test_cluster();
        let error = check(&Generations::update(&cluster, &old)).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert_eq!(
            error.to_string(),
            "operation cannot be added before the cluster has applied any configuration"
        );
    }

    #[test]
    fn test_operation_rules_on_update() {
        let old = create_test_cluster();
        let status = create_test_status(&old);

        let mut new = create_test_cluster();
        new.spec.operations = vec![warm_restart("restart-1", &["aerocluster-0-1"])];
        check(&Generations::update(&new, &old).with_status(Some(&status))).unwrap();

        let mut unknown = new.clone();
        unknown.spec.operations = vec![warm_restart("restart-1", &["aerocluster-9-9"])];
        assert!(
            check(&Generations::update(&unknown, &old).with_status(Some(&status)))
                .unwrap_err()
                .to_string()
                .starts_with("invalid pod names in operation restart-1")
        );

        let mut changed = new.clone();
        changed.spec.operations[0].kind = OperationKind::PodRestart;
        let error = check(&Generations::update(&changed, &new).with_status(Some(&status))).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::ImmutabilityViolation);
        assert_eq!(
            error.to_string(),
            "cannot update operations[restart-1]: operation restart-1 cannot be updated"
        );

        let mut scale_up = new.clone();
        scale_up.spec.size = 6;
        assert_eq!(
            check(&Generations::update(&scale_up, &old).with_status(Some(&status)))
                .unwrap_err()
                .to_string(),
            "cannot change Spec.Operations along with cluster scale-up"
        );

        let mut upgrade = new.clone();
        upgrade.spec.image = TEST_IMAGE.replace("8.0.0.2", "8.0.0.3");
        assert_eq!(
            check(&Generations::update(&upgrade, &old).with_status(Some(&status)))
                .unwrap_err()
                .to_string(),
            "cannot change Spec.Operations along with image update"
        );
    }
}
