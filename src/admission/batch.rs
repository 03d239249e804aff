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

//! Bounds on how many pods a change may disrupt at once.

use super::{Error, Generations, StructuralSnafu, UnsafeBoundSnafu, UnsafeSnafu};
use crate::types::v1::cluster::AerospikeCluster;
use crate::types::v1::rack::{EffectiveRack, RackConfig};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use snafu::ensure;
use std::collections::BTreeMap;

const ROLLING_UPDATE_BATCH_SIZE: &str = "spec.rackConfig.rollingUpdateBatchSize";
const SCALE_DOWN_BATCH_SIZE: &str = "spec.rackConfig.scaleDownBatchSize";
const MAX_UNAVAILABLE: &str = "spec.maxUnavailable";

/// A count-or-percentage field, resolved but not yet scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaled {
    Count(i64),
    Percent(i64),
}

impl Scaled {
    /// Absolute value against `total`, percentages rounding up.
    pub fn of(self, total: i64) -> i64 {
        match self {
            Scaled::Count(count) => count,
            Scaled::Percent(percent) => (total * percent + 99) / 100,
        }
    }

    pub fn is_zero(self) -> bool {
        matches!(self, Scaled::Count(0) | Scaled::Percent(0))
    }
}

pub(crate) fn resolve_int_or_percent(value: &IntOrString, field: &str) -> Result<Scaled, Error> {
    let scaled = match value {
        IntOrString::Int(count) => Scaled::Count(i64::from(*count)),
        IntOrString::String(text) => {
            let percent = text
                .strip_suffix('%')
                .and_then(|number| number.parse::<i64>().ok());
            let Some(percent) = percent else {
                return StructuralSnafu {
                    message: format!("invalid value for {field}: {text}, must be an integer or a percentage"),
                }
                .fail();
            };
            ensure!(
                percent <= 100,
                StructuralSnafu {
                    message: format!("{field}: {text} must not be greater than 100 percent"),
                }
            );
            Scaled::Percent(percent)
        }
    };

    let (Scaled::Count(n) | Scaled::Percent(n)) = scaled;
    ensure!(
        n >= 0,
        StructuralSnafu {
            message: format!("can not use negative {field}: {}", display(value)),
        }
    );
    Ok(scaled)
}

fn display(value: &IntOrString) -> String {
    match value {
        IntOrString::Int(count) => count.to_string(),
        IntOrString::String(text) => text.clone(),
    }
}

/// Advisory messages for settings that will be ignored.
pub fn disruption_warnings(cluster: &AerospikeCluster) -> Vec<String> {
    let mut warnings = Vec::new();
    if cluster.pdb_disabled() && cluster.spec.max_unavailable.is_some() {
        warnings.push(format!(
            "Spec field '{MAX_UNAVAILABLE}' will be omitted from Custom Resource (CR) because 'spec.disablePDB' is true."
        ));
    }
    warnings
}

pub fn validate(generations: &Generations<'_>) -> Result<(), Error> {
    let cluster = generations.incoming;
    let rack_config = &cluster.spec.rack_config;
    let racks = cluster.effective_racks();

    for (field, value, scale_down) in [
        (ROLLING_UPDATE_BATCH_SIZE, &rack_config.rolling_update_batch_size, false),
        (SCALE_DOWN_BATCH_SIZE, &rack_config.scale_down_batch_size, true),
    ] {
        let Some(value) = value else {
            continue;
        };
        if resolve_int_or_percent(value, field)?.is_zero() {
            continue;
        }

        validate_batch_topology(field, scale_down, rack_config, &racks)?;

        // The running topology must allow batching as well.
        if let Some(status) = generations.applied_status() {
            validate_batch_topology(field, scale_down, &status.rack_config, &status.effective_racks())
                .map_err(|error| {
                    UnsafeSnafu {
                        message: format!("status invalid for {field}: update, {error}"),
                    }
                    .build()
                })?;
        }
    }

    validate_max_unavailable(cluster, &racks)
}

#[derive(Debug, Default)]
struct NamespaceSpread {
    racks: usize,
    replication_factor: i64,
    strong_consistency: bool,
}

fn validate_batch_topology(
    field: &str,
    scale_down: bool,
    rack_config: &RackConfig,
    racks: &[EffectiveRack<'_>],
) -> Result<(), Error> {
    ensure!(
        racks.len() >= 2,
        UnsafeSnafu {
            message: format!("can not use {field} when number of racks is less than two"),
        }
    );

    let mut spread: BTreeMap<&str, NamespaceSpread> = BTreeMap::new();
    for rack in racks {
        for ns in rack.config.namespaces()? {
            let entry = spread.entry(ns.name).or_default();
            entry.racks += 1;
            entry.replication_factor = ns.replication_factor()?;
            entry.strong_consistency = ns.strong_consistency()?;
        }
    }

    for (name, ns) in spread {
        ensure!(
            rack_config.namespaces.iter().any(|enabled| enabled == name),
            UnsafeSnafu {
                message: format!("can not use {field} when there is any non-rack enabled namespace {name}"),
            }
        );
        ensure!(
            ns.racks > 1,
            UnsafeSnafu {
                message: format!("can not use {field} when namespace `{name}` is configured in only one rack"),
            }
        );
        ensure!(
            ns.replication_factor > 1,
            UnsafeSnafu {
                message: format!(
                    "can not use {field} when namespace `{name}` is configured with replication-factor 1"
                ),
            }
        );
        ensure!(
            !(scale_down && ns.strong_consistency),
            UnsafeSnafu {
                message: format!(
                    "can not use {field} when namespace `{name}` is configured with Strong Consistency"
                ),
            }
        );
    }
    Ok(())
}

/// Largest number of pods that may be down together: the cluster size,
/// lowered to the smallest replication factor above 1. `None` for
/// single-pod clusters, which lose data on any disruption.
pub fn safe_max_unavailable(size: i32, racks: &[EffectiveRack<'_>]) -> Result<Option<i64>, Error> {
    let size = i64::from(size);
    if size <= 1 {
        return Ok(None);
    }

    let mut bound = size;
    for rack in racks {
        for ns in rack.config.namespaces()? {
            let rf = match ns.replication_factor()? {
                1 => continue,
                rf => rf,
            };
            bound = bound.min(rf);
        }
    }
    Ok(Some(bound))
}

fn validate_max_unavailable(cluster: &AerospikeCluster, racks: &[EffectiveRack<'_>]) -> Result<(), Error> {
    if cluster.pdb_disabled() {
        return Ok(());
    }
    let Some(bound) = safe_max_unavailable(cluster.spec.size, racks)? else {
        return Ok(());
    };

    let value = cluster
        .spec
        .max_unavailable
        .clone()
        .unwrap_or(IntOrString::Int(1));
    let requested = resolve_int_or_percent(&value, MAX_UNAVAILABLE)?.of(i64::from(cluster.spec.size));
    ensure!(
        requested < bound,
        UnsafeBoundSnafu {
            field: MAX_UNAVAILABLE,
            requested: display(&value),
            bound,
        }
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::admission::RejectionKind;
    use crate::tests::{TEST_DEVICE, create_test_cluster, create_test_status, set_namespaces, with_racks};
    use crate::types::v1::config::DEFAULT_REPLICATION_FACTOR;
    use serde_json::json;

    fn two_namespaces(rf: (i64, i64)) -> serde_json::Value {
        json!([
            {"name": "test", "replication-factor": rf.0,
             "storage-engine": {"type": "device", "devices": [TEST_DEVICE]}},
            {"name": "cache", "replication-factor": rf.1,
             "storage-engine": {"type": "memory", "data-size": 1073741824}}
        ])
    }

    #[test]
    fn test_resolve_int_or_percent() {
        let field = "spec.rackConfig.maxIgnorablePods";
        assert_eq!(resolve_int_or_percent(&IntOrString::Int(3), field).unwrap(), Scaled::Count(3));
        assert_eq!(
            resolve_int_or_percent(&IntOrString::String("30%".into()), field).unwrap(),
            Scaled::Percent(30)
        );

        let negative = resolve_int_or_percent(&IntOrString::Int(-1), field).unwrap_err();
        assert_eq!(negative.to_string(), format!("can not use negative {field}: -1"));
        assert_eq!(negative.kind(), RejectionKind::StructuralError);

        assert!(resolve_int_or_percent(&IntOrString::String("120%".into()), field).is_err());
        assert!(resolve_int_or_percent(&IntOrString::String("ten".into()), field).is_err());
        assert!(resolve_int_or_percent(&IntOrString::String("-5%".into()), field).is_err());
    }

    #[test]
    fn test_percentages_round_up() {
        assert_eq!(Scaled::Percent(30).of(5), 2);
        assert_eq!(Scaled::Percent(100).of(5), 5);
        assert_eq!(Scaled::Percent(0).of(5), 0);
        assert_eq!(Scaled::Count(7).of(5), 7);
    }

    #[test]
    fn test_max_unavailable_bound_uses_smallest_replication_factor() {
        let mut cluster = create_test_cluster();
        cluster.spec.size = 5;
        set_namespaces(&mut cluster, two_namespaces((3, 2)));
        assert_eq!(
            safe_max_unavailable(cluster.spec.size, &cluster.effective_racks()).unwrap(),
            Some(2)
        );

        cluster.spec.max_unavailable = Some(IntOrString::Int(2));
        let error = validate(&Generations::create(&cluster)).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert_eq!(
            error.to_string(),
            "spec.maxUnavailable 2 cannot be greater than or equal to 2 as it may result in data loss. Set it to a lower value"
        );

        cluster.spec.max_unavailable = Some(IntOrString::Int(1));
        validate(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_replication_factor_one_is_ignored() {
        let mut cluster = create_test_cluster();
        cluster.spec.size = 5;
        set_namespaces(&mut cluster, two_namespaces((1, 4)));
        assert_eq!(
            safe_max_unavailable(cluster.spec.size, &cluster.effective_racks()).unwrap(),
            Some(4)
        );
    }

    #[test]
    fn test_absent_replication_factor_counts_as_default() {
        let mut cluster = create_test_cluster();
        cluster.spec.size = 5;
        set_namespaces(
            &mut cluster,
            json!([{"name": "test", "storage-engine": {"type": "device", "devices": [TEST_DEVICE]}}]),
        );
        assert_eq!(
            safe_max_unavailable(cluster.spec.size, &cluster.effective_racks()).unwrap(),
            Some(DEFAULT_REPLICATION_FACTOR)
        );
    }

    #[test]
    fn test_single_pod_cluster_skips_bound() {
        let mut cluster = create_test_cluster();
        cluster.spec.size = 1;
        cluster.spec.max_unavailable = Some(IntOrString::Int(10));
        assert_eq!(safe_max_unavailable(1, &cluster.effective_racks()).unwrap(), None);
        validate(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_percentage_max_unavailable_scales_with_size() {
        let mut cluster = create_test_cluster();
        cluster.spec.size = 4;
        cluster.spec.max_unavailable = Some(IntOrString::String("50%".into()));
        let error = validate(&Generations::create(&cluster)).unwrap_err();
        assert!(error.to_string().starts_with("spec.maxUnavailable 50% cannot be greater"));

        cluster.spec.max_unavailable = Some(IntOrString::String("25%".into()));
        validate(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_disabled_pdb_skips_bound_and_warns() {
        let mut cluster = create_test_cluster();
        cluster.spec.disable_pdb = Some(true);
        cluster.spec.max_unavailable = Some(IntOrString::Int(10));
        validate(&Generations::create(&cluster)).unwrap();
        assert_eq!(disruption_warnings(&cluster).len(), 1);

        cluster.spec.disable_pdb = None;
        assert!(disruption_warnings(&cluster).is_empty());
    }

    #[test]
    fn test_rolling_batch_needs_two_racks() {
        let mut cluster = create_test_cluster();
        cluster.spec.rack_config.namespaces = vec!["test".to_string()];
        cluster.spec.rack_config.rolling_update_batch_size = Some(IntOrString::Int(2));
        let error = validate(&Generations::create(&cluster)).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert_eq!(
            error.to_string(),
            "can not use spec.rackConfig.rollingUpdateBatchSize when number of racks is less than two"
        );

        with_racks(&mut cluster, &[1, 2]);
        validate(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_zero_batch_is_always_allowed() {
        let mut cluster = create_test_cluster();
        cluster.spec.rack_config.rolling_update_batch_size = Some(IntOrString::String("0%".into()));
        validate(&Generations::create(&cluster)).unwrap();
    }

    #[test]
    fn test_batch_needs_rack_enabled_namespaces() {
        let mut cluster = create_test_cluster();
        with_racks(&mut cluster, &[1, 2]);
        cluster.spec.rack_config.rolling_update_batch_size = Some(IntOrString::Int(1));
        assert_eq!(
            validate(&Generations::create(&cluster)).unwrap_err().to_string(),
            "can not use spec.rackConfig.rollingUpdateBatchSize when there is any non-rack enabled namespace test"
        );
    }

    #[test]
    fn test_scale_down_batch_rejects_strong_consistency() {
        let mut cluster = create_test_cluster();
        with_racks(&mut cluster, &[1, 2]);
        cluster.spec.rack_config.namespaces = vec!["test".to_string()];
        set_namespaces(
            &mut cluster,
            json!([{"name": "test", "replication-factor": 2, "strong-consistency": true,
                    "storage-engine": {"type": "device", "devices": [TEST_DEVICE]}}]),
        );
        cluster.spec.rack_config.rolling_update_batch_size = Some(IntOrString::Int(1));
        validate(&Generations::create(&cluster)).unwrap();

        cluster.spec.rack_config.scale_down_batch_size = Some(IntOrString::Int(1));
        let error = validate(&Generations::create(&cluster)).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert!(error.to_string().ends_with("is configured with Strong Consistency"));
    }

    #[test]
    fn test_batch_checked_against_running_topology() {
        let old = create_test_cluster();
        let status = create_test_status(&old);

        let mut new = create_test_cluster();
        with_racks(&mut new, &[1, 2]);
        new.spec.rack_config.namespaces = vec!["test".to_string()];
        new.spec.rack_config.rolling_update_batch_size = Some(IntOrString::Int(1));

        let generations = Generations::update(&new, &old).with_status(Some(&status));
        let error = validate(&generations).unwrap_err();
        assert_eq!(error.kind(), RejectionKind::SafetyViolation);
        assert_eq!(
            error.to_string(),
            "status invalid for spec.rackConfig.rollingUpdateBatchSize: update, can not use spec.rackConfig.rollingUpdateBatchSize when number of racks is less than two"
        );
    }
}
