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

//! Checks of a single descriptor, independent of earlier generations.

use super::{
    ClientCertificateSnafu, Error, PreconditionSnafu, SchemaSnafu, StructuralSnafu, UnsafeSnafu,
    batch,
};
use crate::context::Context;
use crate::types::v1::client_cert::{OperatorClientCertSpec, non_empty};
use crate::types::v1::cluster::AerospikeCluster;
use crate::types::v1::config::{
    ConfigTree, DEFAULT_WORK_DIRECTORY, Lookup, NETWORK, NETWORK_CONNECTION_TYPES,
    NamespaceConfig, SECURITY, SERVICE, Section, TLS_NAME, TLS_PORT, WrongTypeSnafu, kind_of,
};
use crate::types::v1::network::{
    AerospikeNetworkType, NETWORK_ANNOTATION, NetworkDirection, qualified_network_name,
};
use crate::types::v1::pod::{
    AEROSPIKE_INIT_CONTAINER_NAME, AEROSPIKE_SERVER_CONTAINER_NAME, RESERVED_LABELS,
};
use crate::types::v1::rack::{EffectiveRack, MAX_RACK_ID, MIN_RACK_ID};
use crate::types::v1::storage::resolver::{is_dir_covered, parent_dir};
use crate::types::v1::storage::{StorageSpec, VolumeMethod, VolumeMode};
use crate::admission::version::is_enterprise;
use serde_json::Value;
use snafu::{OptionExt, ResultExt, ensure};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

pub const MAX_CLUSTER_SIZE: i32 = 256;

/// Prefixes marking a path resolved by an external secret store.
const SECRET_MANAGER_PREFIXES: [&str; 2] = ["secrets:", "vault:"];

const SYSLOG_PARAMS: [&str; 3] = ["facility", "path", "tag"];

pub fn validate(ctx: &Context, cluster: &AerospikeCluster, version: &str) -> Result<(), Error> {
    cluster.name()?;
    let namespace = cluster.namespace()?;
    let spec = &cluster.spec;

    ensure!(
        is_enterprise(&spec.image),
        StructuralSnafu {
            message: format!("CommunityEdition Cluster not supported, image: {}", spec.image),
        }
    );
    ensure!(
        (1..=MAX_CLUSTER_SIZE).contains(&spec.size),
        StructuralSnafu {
            message: format!(
                "invalid cluster size {}, must be between 1 and {MAX_CLUSTER_SIZE}",
                spec.size
            ),
        }
    );
    ensure!(
        spec.operations.len() <= 1,
        StructuralSnafu {
            message: "only one operation can be specified at a time",
        }
    );

    let config = spec
        .aerospike_config
        .as_ref()
        .filter(|config| !config.is_empty())
        .context(StructuralSnafu {
            message: "aerospikeConfig cannot be empty",
        })?;

    validate_storage(&spec.storage, "storage")?;
    for rack in &spec.rack_config.racks {
        if let Some(storage) = &rack.storage {
            validate_storage(storage, &format!("rackConfig.racks[{}].storage", rack.id))?;
        }
    }

    validate_rack_config(cluster)?;

    let racks = cluster.effective_racks();
    for rack in &racks {
        debug!(rack = rack.id, "validating rack aerospikeConfig");
        ctx.schema
            .validate(&rack.config, version)
            .context(SchemaSnafu)?;
        validate_aerospike_config(ctx, cluster, &rack.config, rack.storage)?;
        validate_work_dir(cluster, &rack.config, rack.storage)?;
        validate_required_file_storage(&rack.config, rack.storage)?;
    }

    validate_rack_namespaces(cluster, &racks)?;
    validate_sc_namespaces(&racks)?;
    validate_client_cert_spec(cluster, config)?;
    validate_network_policy(cluster, &namespace)?;
    validate_pod_spec(cluster)
}

fn validate_storage(storage: &StorageSpec, field: &str) -> Result<(), Error> {
    if let Some(threads) = storage.cleanup_threads {
        ensure!(
            threads >= 1,
            StructuralSnafu {
                message: format!("{field}.cleanupThreads {threads} must be at least 1"),
            }
        );
    }

    for (name, policy, mode) in [
        (
            "filesystemVolumePolicy",
            &storage.filesystem_volume_policy,
            VolumeMode::Filesystem,
        ),
        (
            "blockVolumePolicy",
            &storage.block_volume_policy,
            VolumeMode::Block,
        ),
    ] {
        if let Some(policy) = policy {
            validate_volume_methods(
                &format!("{field}.{name}"),
                mode,
                policy.init_method,
                policy.wipe_method,
            )?;
        }
    }

    let mut names = BTreeSet::new();
    let mut paths = BTreeSet::new();
    for volume in &storage.volumes {
        let volume_field = format!("{field}.volumes[{}]", volume.name);
        ensure!(
            !volume.name.is_empty(),
            StructuralSnafu {
                message: format!("{field}.volumes contains a volume without a name"),
            }
        );
        ensure!(
            names.insert(volume.name.as_str()),
            StructuralSnafu {
                message: format!("{field}.volumes has duplicate volume name {}", volume.name),
            }
        );

        let sources = volume.source.populated();
        ensure!(
            sources == 1,
            StructuralSnafu {
                message: format!("{volume_field} must have exactly one source, found {sources}"),
            }
        );

        if let Some(path) = volume.aerospike_path() {
            ensure!(
                path.starts_with('/'),
                StructuralSnafu {
                    message: format!("{volume_field}.aerospike.path {path} must be absolute"),
                }
            );
            ensure!(
                paths.insert(path),
                StructuralSnafu {
                    message: format!(
                        "{volume_field}.aerospike.path {path} is already used by another volume"
                    ),
                }
            );
        }

        for attachment in volume.sidecars.iter().chain(volume.init_containers.iter()) {
            ensure!(
                !attachment.container_name.is_empty() && attachment.path.starts_with('/'),
                StructuralSnafu {
                    message: format!(
                        "{volume_field} attachment needs a container name and an absolute path, got container '{}' path '{}'",
                        attachment.container_name, attachment.path
                    ),
                }
            );
        }

        match &volume.source.persistent_volume {
            Some(pv) => {
                ensure!(
                    !pv.storage_class.is_empty(),
                    StructuralSnafu {
                        message: format!("{volume_field}.source.persistentVolume.storageClass cannot be empty"),
                    }
                );
                ensure!(
                    pv.size.is_some(),
                    StructuralSnafu {
                        message: format!("{volume_field}.source.persistentVolume.size must be set"),
                    }
                );
                validate_volume_methods(
                    &volume_field,
                    pv.volume_mode,
                    volume.init_method,
                    volume.wipe_method,
                )?;
            }
            None => {
                for method in [volume.init_method, volume.wipe_method].into_iter().flatten() {
                    ensure!(
                        method == VolumeMethod::None,
                        StructuralSnafu {
                            message: format!(
                                "{volume_field} is not a persistent volume and cannot use init or wipe method {method}"
                            ),
                        }
                    );
                }
            }
        }
    }

    Ok(())
}

fn validate_volume_methods(
    field: &str,
    mode: VolumeMode,
    init: Option<VolumeMethod>,
    wipe: Option<VolumeMethod>,
) -> Result<(), Error> {
    let allowed: &[VolumeMethod] = match mode {
        VolumeMode::Filesystem => &VolumeMethod::FILESYSTEM,
        VolumeMode::Block => &VolumeMethod::BLOCK,
    };
    for (name, method) in [("initMethod", init), ("wipeMethod", wipe)] {
        if let Some(method) = method {
            ensure!(
                allowed.contains(&method),
                StructuralSnafu {
                    message: format!("{field}.{name} {method} not supported for {mode} volumes"),
                }
            );
        }
    }
    Ok(())
}

fn validate_rack_config(cluster: &AerospikeCluster) -> Result<(), Error> {
    let rack_config = &cluster.spec.rack_config;

    for namespace in &rack_config.namespaces {
        ensure!(
            !namespace.contains(' '),
            StructuralSnafu {
                message: format!("namespace name `{namespace}` cannot have spaces"),
            }
        );
    }

    let mut ids = BTreeSet::new();
    for rack in &rack_config.racks {
        ensure!(
            ids.insert(rack.id),
            StructuralSnafu {
                message: format!("duplicate rack id {}", rack.id),
            }
        );
        ensure!(
            (MIN_RACK_ID..=MAX_RACK_ID).contains(&rack.id),
            StructuralSnafu {
                message: format!(
                    "invalid rack id {}, must be between {MIN_RACK_ID} and {MAX_RACK_ID}",
                    rack.id
                ),
            }
        );
        if let Some(overlay) = &rack.aerospike_config {
            for section in [NETWORK, SECURITY] {
                ensure!(
                    !overlay.contains(section),
                    StructuralSnafu {
                        message: format!(
                            "you can't specify {section} section in rack {} aerospikeConfig",
                            rack.id
                        ),
                    }
                );
            }
        }
    }

    if let Some(value) = &rack_config.max_ignorable_pods {
        batch::resolve_int_or_percent(value, "spec.rackConfig.maxIgnorablePods")?;
    }

    Ok(())
}

fn validate_rack_namespaces(
    cluster: &AerospikeCluster,
    racks: &[EffectiveRack<'_>],
) -> Result<(), Error> {
    for rack in racks {
        let configured: BTreeSet<&str> = rack
            .config
            .namespaces()?
            .iter()
            .map(|ns| ns.name)
            .collect();
        for namespace in &cluster.spec.rack_config.namespaces {
            ensure!(
                configured.contains(namespace.as_str()),
                StructuralSnafu {
                    message: format!(
                        "rackConfig namespace {namespace} is not configured in aerospikeConfig of rack {}",
                        rack.id
                    ),
                }
            );
        }
    }
    Ok(())
}

fn validate_sc_namespaces(racks: &[EffectiveRack<'_>]) -> Result<(), Error> {
    let mut expected: Option<BTreeSet<&str>> = None;
    for rack in racks {
        let mut sc_namespaces = BTreeSet::new();
        for ns in rack.config.namespaces()? {
            if ns.strong_consistency()? {
                ensure!(
                    !ns.is_memory(),
                    StructuralSnafu {
                        message: format!(
                            "in-memory storage-engine is not allowed for strong-consistency namespace {}",
                            ns.name
                        ),
                    }
                );
                sc_namespaces.insert(ns.name);
            }
        }

        if let Some(expected) = &expected {
            ensure!(
                *expected == sc_namespaces,
                UnsafeSnafu {
                    message: "SC namespaces list is different for different racks. All racks should have same SC namespaces",
                }
            );
            continue;
        }
        expected = Some(sc_namespaces);
    }
    Ok(())
}

fn validate_aerospike_config(
    ctx: &Context,
    cluster: &AerospikeCluster,
    config: &ConfigTree,
    storage: &StorageSpec,
) -> Result<(), Error> {
    let service = config.service().required(SERVICE)?;
    if service
        .bool("advertise-ipv6")
        .optional("service.advertise-ipv6")?
        .unwrap_or(false)
    {
        return StructuralSnafu {
            message: "advertise-ipv6 is not supported",
        }
        .fail();
    }
    ensure!(
        service.contains("cluster-name"),
        PreconditionSnafu {
            message: "aerospikeConfig.service.cluster-name not set. Looks like object is not mutated by webhook",
        }
    );

    let network = config.network().required(NETWORK)?;
    validate_network_config(ctx, cluster, config, network)?;

    let namespaces = config.namespaces()?;
    validate_namespaces(&namespaces, storage)?;

    validate_logging(config)
}

fn validate_logging(config: &ConfigTree) -> Result<(), Error> {
    let logging = match config.logging() {
        Lookup::Absent => {
            return PreconditionSnafu {
                message: "aerospikeConfig.logging not set. Looks like object is not mutated by webhook",
            }
            .fail();
        }
        other => other.required("logging")?,
    };

    for (i, entry) in logging.iter().enumerate() {
        let Some(entry) = entry.as_object().map(Section::new) else {
            return StructuralSnafu {
                message: format!(
                    "aerospikeConfig.logging[{i}] must be a map, found {}",
                    kind_of(entry)
                ),
            }
            .fail();
        };
        let name = entry.str("name").found();
        if name == Some("syslog") {
            continue;
        }
        for param in SYSLOG_PARAMS {
            ensure!(
                !entry.contains(param),
                StructuralSnafu {
                    message: format!(
                        "can use {param} only with `syslog` in aerospikeConfig.logging {}",
                        name.unwrap_or_default()
                    ),
                }
            );
        }
    }
    Ok(())
}

fn validate_network_config(
    ctx: &Context,
    cluster: &AerospikeCluster,
    config: &ConfigTree,
    network: Section<'_>,
) -> Result<(), Error> {
    let service = network.section(SERVICE).optional("network.service")?;
    let service = service.context(StructuralSnafu {
        message: "network.service section not found in config",
    })?;

    let mut tls_names = BTreeSet::new();
    for entry in config.tls_entries()? {
        ensure!(
            !(entry.ca_file().is_some() && entry.ca_path().is_some()),
            StructuralSnafu {
                message: format!(
                    "both `ca-path` and `ca-file` cannot be set in `tls`. tls: {}",
                    entry.name
                ),
            }
        );
        tls_names.insert(entry.name);
    }

    for kind in NETWORK_CONNECTION_TYPES {
        if let Some(connection) = config.connection(kind)? {
            validate_connection_tls(kind, connection, &tls_names)?;
        }
    }

    validate_tls_client_names(ctx, cluster, service)
}

fn validate_connection_tls(
    kind: &str,
    connection: Section<'_>,
    tls_names: &BTreeSet<&str>,
) -> Result<(), Error> {
    match connection
        .str(TLS_NAME)
        .optional(&format!("network.{kind}.{TLS_NAME}"))?
    {
        Some(name) => {
            ensure!(
                connection.contains(TLS_PORT),
                StructuralSnafu {
                    message: format!(
                        "you can't specify tls-name for network.{kind} without specifying tls-port"
                    ),
                }
            );
            ensure!(
                tls_names.contains(name),
                StructuralSnafu {
                    message: format!("tls-name '{name}' is not configured in network.tls"),
                }
            );
        }
        None => {
            if let Some(param) = connection.keys().find(|key| key.starts_with("tls-")) {
                return StructuralSnafu {
                    message: format!(
                        "you can't specify {param} for network.{kind} without specifying tls-name"
                    ),
                }
                .fail();
            }
        }
    }
    Ok(())
}

/// Value of `network.service.tls-authenticate-client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAuth {
    Disabled,
    Any,
    Names(Vec<String>),
}

pub fn tls_authenticate_client(service: Section<'_>) -> Result<Option<ClientAuth>, Error> {
    let Some(value) = service.get("tls-authenticate-client") else {
        return Ok(None);
    };

    let auth = match value {
        Value::Bool(false) => ClientAuth::Disabled,
        Value::String(s) if s == "false" => ClientAuth::Disabled,
        Value::String(s) if s == "any" => ClientAuth::Any,
        Value::Array(items) if !items.is_empty() => {
            let names = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .filter(|name| is_dns_name(name))
                        .map(str::to_string)
                        .context(StructuralSnafu {
                            message: format!(
                                "tls-authenticate-client contains invalid dns name: {item}"
                            ),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ClientAuth::Names(names)
        }
        other => {
            return StructuralSnafu {
                message: format!(
                    "tls-authenticate-client contains invalid value: {other}, must be false, any or a list of dns names"
                ),
            }
            .fail();
        }
    };
    Ok(Some(auth))
}

/// RFC 1123 style host name, optionally with a leading wildcard label.
pub fn is_dns_name(name: &str) -> bool {
    let name = name.strip_prefix("*.").unwrap_or(name);
    !name.is_empty()
        && name.len() <= 253
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}

fn validate_tls_client_names(
    ctx: &Context,
    cluster: &AerospikeCluster,
    service: Section<'_>,
) -> Result<(), Error> {
    let Some(ClientAuth::Names(names)) = tls_authenticate_client(service)? else {
        return Ok(());
    };
    let Some(path) = cluster
        .spec
        .operator_client_cert
        .as_ref()
        .and_then(OperatorClientCertSpec::local_cert_path)
    else {
        return Ok(());
    };

    let cert_names = ctx
        .certificates
        .read_names(Path::new(path))
        .context(ClientCertificateSnafu { path })?;
    if cert_names.is_empty() {
        return Ok(());
    }

    ensure!(
        names.iter().any(|name| cert_names.contains(name)),
        StructuralSnafu {
            message: format!(
                "tls-authenticate-client ({}) doesn't contain any name from the operator's certificate ({})",
                names.join(", "),
                cert_names
                    .common_name
                    .iter()
                    .chain(cert_names.dns_names.iter())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    );
    Ok(())
}

fn validate_namespaces(
    namespaces: &[NamespaceConfig<'_>],
    storage: &StorageSpec,
) -> Result<(), Error> {
    ensure!(
        !namespaces.is_empty(),
        StructuralSnafu {
            message: "aerospikeConfig.namespaces list cannot be empty",
        }
    );

    let list = storage.aerospike_storage_list(true);
    for ns in namespaces {
        let name = ns.name;
        let strong_consistency = ns.strong_consistency()?;
        if !strong_consistency && let Some(field) = ns.mrt_fields().first() {
            return StructuralSnafu {
                message: format!(
                    "{field} is allowed only for strong-consistency namespaces, namespace {name}"
                ),
            }
            .fail();
        }

        let engine = ns
            .storage_engine()
            .optional(&ns.path("storage-engine"))?
            .context(StructuralSnafu {
                message: format!("storage-engine config is required for namespace {name}"),
            })?;

        if engine.is_memory() {
            ensure!(
                !strong_consistency,
                StructuralSnafu {
                    message: format!(
                        "in-memory storage-engine is not allowed for strong-consistency namespace {name}"
                    ),
                }
            );
            continue;
        }
        ensure!(
            engine.is_device_or_pmem(),
            StructuralSnafu {
                message: format!(
                    "storage-engine type {} not supported for namespace {name}",
                    engine.kind().unwrap_or("<unset>")
                ),
            }
        );

        if let Some(devices) = engine
            .devices()
            .optional(&ns.path("storage-engine.devices"))?
        {
            for line in storage_lines(devices, "devices", name)? {
                for device in line {
                    ensure!(
                        list.block_devices.contains(&device),
                        StructuralSnafu {
                            message: format!(
                                "namespace storage device related devicePath {device} not found in Storage config for namespace {name}"
                            ),
                        }
                    );
                }
            }
        }

        if let Some(files) = engine.files().optional(&ns.path("storage-engine.files"))? {
            for line in storage_lines(files, "files", name)? {
                for file in line {
                    ensure!(
                        is_dir_covered(&list.filesystem_paths, parent_dir(file)),
                        StructuralSnafu {
                            message: format!(
                                "namespace storage file {file} is not on a persistent filesystem volume for namespace {name}"
                            ),
                        }
                    );
                }
            }
        }

        if let Some(index) = ns.index_type().optional(&ns.path("index-type"))?
            && index.str("type").found() != Some("shmem")
        {
            let mounts = index
                .list("mounts")
                .optional(&ns.path("index-type.mounts"))?
                .filter(|mounts| !mounts.is_empty())
                .context(StructuralSnafu {
                    message: format!("mounts not present for index-type of namespace {name}"),
                })?;
            for mount in mounts {
                let mount = mount.as_str().context(WrongTypeSnafu {
                    path: ns.path("index-type.mounts"),
                    expected: "string",
                    found: kind_of(mount),
                })?;
                ensure!(
                    list.filesystem_paths.contains(&mount),
                    StructuralSnafu {
                        message: format!(
                            "namespace index-type mount {mount} not found in Storage config for namespace {name}"
                        ),
                    }
                );
            }
        }
    }

    StorageClaims::from_namespaces(namespaces)?;
    Ok(())
}

/// Splits a `devices` or `files` list into its whitespace separated entries,
/// each holding a primary and an optional shadow path.
fn storage_lines<'a>(
    items: &'a [Value],
    field: &str,
    namespace: &str,
) -> Result<Vec<Vec<&'a str>>, Error> {
    ensure!(
        !items.is_empty(),
        StructuralSnafu {
            message: format!("no {field} for namespace {namespace}"),
        }
    );
    items
        .iter()
        .map(|item| {
            let line = item.as_str().context(StructuralSnafu {
                message: format!(
                    "namespace {namespace} storage {field} entry must be a string, found {}",
                    kind_of(item)
                ),
            })?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            ensure!(
                (1..=2).contains(&tokens.len()),
                StructuralSnafu {
                    message: format!(
                        "invalid {field} entry '{line}' in namespace {namespace}, expected a path and at most one shadow path"
                    ),
                }
            );
            Ok(tokens)
        })
        .collect()
}

/// Devices and files mapped to the namespace claiming them.
#[derive(Debug, Default)]
pub(crate) struct StorageClaims<'a> {
    pub devices: BTreeMap<&'a str, &'a str>,
    pub files: BTreeMap<&'a str, &'a str>,
}

impl<'a> StorageClaims<'a> {
    /// Fails when a path is claimed more than once.
    pub fn from_namespaces(namespaces: &[NamespaceConfig<'a>]) -> Result<Self, Error> {
        let mut claims = Self::default();
        for ns in namespaces {
            for (kind, paths, claimed) in [
                ("device", ns.device_paths(), &mut claims.devices),
                ("file", ns.file_paths(), &mut claims.files),
            ] {
                for path in paths {
                    if let Some(previous) = claimed.insert(path, ns.name) {
                        return StructuralSnafu {
                            message: format!(
                                "{kind} {path} is already being referenced in multiple namespaces ({previous}, {})",
                                ns.name
                            ),
                        }
                        .fail();
                    }
                }
            }
        }
        Ok(claims)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequiredPath {
    Plain,
    CertificateAuthority,
    DefaultPassword,
}

fn is_secret_manager_path(path: &str) -> bool {
    SECRET_MANAGER_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Files the server reads at startup must live on a declared volume.
fn validate_required_file_storage(config: &ConfigTree, storage: &StorageSpec) -> Result<(), Error> {
    // (path, directory that must be mounted, kind)
    let mut required: Vec<(&str, &str, RequiredPath)> = Vec::new();

    if let Some(service) = config.service().found() {
        if let Some(file) = service
            .str("feature-key-file")
            .optional("service.feature-key-file")?
        {
            required.push((file, parent_dir(file), RequiredPath::Plain));
        }
        if let Some(files) = service
            .list("feature-key-files")
            .optional("service.feature-key-files")?
        {
            for file in files.iter().filter_map(Value::as_str) {
                required.push((file, parent_dir(file), RequiredPath::Plain));
            }
        }
    }

    for entry in config.tls_entries()? {
        for file in [entry.cert_file(), entry.key_file()].into_iter().flatten() {
            required.push((file, parent_dir(file), RequiredPath::Plain));
        }
        if let Some(file) = entry.ca_file() {
            required.push((file, parent_dir(file), RequiredPath::CertificateAuthority));
        }
        if let Some(dir) = entry.ca_path() {
            required.push((dir, dir, RequiredPath::CertificateAuthority));
        }
    }

    if let Some(security) = config.security().found()
        && let Some(file) = security
            .str("default-password-file")
            .optional("security.default-password-file")?
    {
        required.push((file, parent_dir(file), RequiredPath::DefaultPassword));
    }

    for (path, dir, kind) in required {
        if is_secret_manager_path(path) {
            match kind {
                RequiredPath::Plain => continue,
                RequiredPath::CertificateAuthority => {
                    return StructuralSnafu {
                        message: format!(
                            "CA material {path} cannot be read from a secret manager, mount it from a volume"
                        ),
                    }
                    .fail();
                }
                RequiredPath::DefaultPassword => {
                    return StructuralSnafu {
                        message: format!(
                            "default-password-file {path} cannot be read from a secret manager"
                        ),
                    }
                    .fail();
                }
            }
        }

        let volume = storage
            .volume_for_aerospike_path(dir)
            .context(StructuralSnafu {
                message: format!(
                    "feature-key-file paths or tls paths or default-password-file path are not mounted - create an entry for '{path}' in 'storage.volumes'"
                ),
            })?;

        if kind == RequiredPath::DefaultPassword {
            ensure!(
                volume.source.secret.is_some(),
                StructuralSnafu {
                    message: format!(
                        "default-password-file path {path} volume {} source should be secret",
                        volume.name
                    ),
                }
            );
        }
    }

    Ok(())
}

fn validate_work_dir(
    cluster: &AerospikeCluster,
    config: &ConfigTree,
    storage: &StorageSpec,
) -> Result<(), Error> {
    let configured = match config.service().found() {
        Some(service) => service
            .str("work-directory")
            .optional("service.work-directory")?,
        None => None,
    };

    if cluster.skip_work_dir_validate() {
        if let Some(dir) = configured {
            ensure!(
                storage.is_file_storage_configured_for_dir(dir, false),
                StructuralSnafu {
                    message: format!(
                        "aerospikeConfig.service.work-directory {dir} is not on a filesystem volume"
                    ),
                }
            );
        }
        return Ok(());
    }

    let dir = configured.unwrap_or(DEFAULT_WORK_DIRECTORY);
    ensure!(
        Path::new(dir).is_absolute(),
        StructuralSnafu {
            message: format!("aerospikeConfig.service.work-directory {dir} must be an absolute path"),
        }
    );
    ensure!(
        storage.is_file_storage_configured_for_dir(dir, true),
        StructuralSnafu {
            message: format!(
                "aerospikeConfig.service.work-directory {dir} is not on a persistent filesystem volume, mount one at {dir} or set validationPolicy.skipWorkDirValidate"
            ),
        }
    );
    Ok(())
}

fn validate_client_cert_spec(cluster: &AerospikeCluster, config: &ConfigTree) -> Result<(), Error> {
    let Some(service) = config.connection(SERVICE)? else {
        return Ok(());
    };
    let auth = tls_authenticate_client(service)?;
    if !matches!(auth, Some(ClientAuth::Any | ClientAuth::Names(_))) {
        return Ok(());
    }

    let spec = cluster
        .spec
        .operator_client_cert
        .as_ref()
        .context(StructuralSnafu {
            message: "operator client cert is not specified",
        })?;
    validate_operator_client_cert(spec)?;

    if matches!(auth, Some(ClientAuth::Names(_))) {
        ensure!(
            spec.tls_client_name().is_some(),
            StructuralSnafu {
                message: "operator TLSClientName is not specified",
            }
        );
    }
    Ok(())
}

fn validate_operator_client_cert(spec: &OperatorClientCertSpec) -> Result<(), Error> {
    match (&spec.secret_cert_source, &spec.cert_path_in_operator) {
        (Some(source), None) => {
            ensure!(
                !(non_empty(&source.ca_certs_filename).is_some() && source.ca_certs_source.is_some()),
                StructuralSnafu {
                    message: "both `caCertsFilename` and `caCertsSource` cannot be specified",
                }
            );
            ensure!(
                non_empty(&source.client_cert_filename).is_some()
                    == non_empty(&source.client_key_filename).is_some(),
                StructuralSnafu {
                    message: "both `clientCertFilename` and `clientKeyFilename` should be either set or not set",
                }
            );
        }
        (None, Some(paths)) => {
            ensure!(
                non_empty(&paths.client_cert_path).is_some()
                    == non_empty(&paths.client_key_path).is_some(),
                StructuralSnafu {
                    message: "both `clientCertPath` and `clientKeyPath` should be either set or not set",
                }
            );
        }
        _ => {
            return StructuralSnafu {
                message: "either `secretCertSource` or `certPathInOperator` must be set",
            }
            .fail();
        }
    }

    ensure!(
        spec.is_client_cert_configured(),
        StructuralSnafu {
            message: "operator client cert is not configured",
        }
    );
    Ok(())
}

fn validate_network_policy(cluster: &AerospikeCluster, namespace: &str) -> Result<(), Error> {
    let policy = &cluster.spec.aerospike_network_policy;
    let pod_spec = &cluster.spec.pod_spec;
    let attached: BTreeSet<String> = pod_spec
        .metadata
        .annotations
        .get(NETWORK_ANNOTATION)
        .map(|networks| {
            networks
                .split(',')
                .filter(|name| !name.trim().is_empty())
                .map(|name| qualified_network_name(name, namespace))
                .collect()
        })
        .unwrap_or_default();

    for direction in NetworkDirection::ALL {
        if policy.network_type(direction) != AerospikeNetworkType::CustomInterface {
            continue;
        }
        let field = direction.custom_names_field();
        let names = policy
            .custom_names(direction)
            .filter(|names| !names.is_empty())
            .context(StructuralSnafu {
                message: format!(
                    "aerospikeNetworkPolicy.{field} is required with network type customInterface for {direction}"
                ),
            })?;
        ensure!(
            !pod_spec.host_network,
            StructuralSnafu {
                message: format!(
                    "hostNetwork is not allowed with network type customInterface for {direction}"
                ),
            }
        );
        for name in names {
            ensure!(
                attached.contains(&qualified_network_name(name, namespace)),
                StructuralSnafu {
                    message: format!(
                        "required network {name} of aerospikeNetworkPolicy.{field} is not present in pod metadata annotation `{NETWORK_ANNOTATION}`"
                    ),
                }
            );
        }
    }
    Ok(())
}

fn validate_pod_spec(cluster: &AerospikeCluster) -> Result<(), Error> {
    let pod = &cluster.spec.pod_spec;
    ensure!(
        !(pod.host_network && pod.multi_pod_per_host()),
        StructuralSnafu {
            message: "host networking cannot be enabled with multi pod per host",
        }
    );

    match pod.dns_policy.as_deref() {
        Some("Default") => {
            return StructuralSnafu {
                message: "dnsPolicy: Default is not supported",
            }
            .fail();
        }
        Some("None") => ensure!(
            pod.dns_config.is_some(),
            StructuralSnafu {
                message: "dnsConfig is required field when dnsPolicy is set to None",
            }
        ),
        _ => {}
    }

    let mut names = BTreeSet::new();
    for container in pod.sidecars.iter().chain(pod.init_containers.iter()) {
        let name = container.name.as_str();
        ensure!(
            name != AEROSPIKE_SERVER_CONTAINER_NAME && name != AEROSPIKE_INIT_CONTAINER_NAME,
            StructuralSnafu {
                message: format!("cannot use reserved container name: {name}"),
            }
        );
        ensure!(
            names.insert(name),
            StructuralSnafu {
                message: format!("cannot have duplicate container name: {name}"),
            }
        );
    }

    for label in RESERVED_LABELS {
        ensure!(
            !pod.metadata.labels.contains_key(label),
            StructuralSnafu {
                message: format!(
                    "label: {label} is automatically defined by operator and shouldn't be specified by user"
                ),
            }
        );
    }

    let storages = std::iter::once(&cluster.spec.storage).chain(
        cluster
            .spec
            .rack_config
            .racks
            .iter()
            .filter_map(|rack| rack.storage.as_ref()),
    );
    for storage in storages {
        validate_container_attachments(cluster, storage)?;
    }
    Ok(())
}

/// Sidecar and init container attachments must name a declared container and
/// no two volumes may share a mount path inside one container.
fn validate_container_attachments(
    cluster: &AerospikeCluster,
    storage: &StorageSpec,
) -> Result<(), Error> {
    let pod = &cluster.spec.pod_spec;
    let sidecars: BTreeSet<&str> = pod.sidecars.iter().map(|c| c.name.as_str()).collect();
    let init_containers: BTreeSet<&str> = pod
        .init_containers
        .iter()
        .map(|c| c.name.as_str())
        .chain(std::iter::once(AEROSPIKE_INIT_CONTAINER_NAME))
        .collect();

    for volume in &storage.volumes {
        for attachment in &volume.sidecars {
            ensure!(
                sidecars.contains(attachment.container_name.as_str()),
                StructuralSnafu {
                    message: format!(
                        "volume {} is attached to unknown sidecar {}",
                        volume.name, attachment.container_name
                    ),
                }
            );
        }
        for attachment in &volume.init_containers {
            ensure!(
                init_containers.contains(attachment.container_name.as_str()),
                StructuralSnafu {
                    message: format!(
                        "volume {} is attached to unknown init container {}",
                        volume.name, attachment.container_name
                    ),
                }
            );
        }
    }

    for container in sidecars.iter().chain(init_containers.iter()) {
        let mut mounts: BTreeMap<&str, &str> = BTreeMap::new();
        for volume in storage.volumes_for_container(container) {
            let attachments = volume.sidecars.iter().chain(volume.init_containers.iter());
            for attachment in attachments.filter(|a| a.container_name == *container) {
                if let Some(other) = mounts.insert(attachment.path.as_str(), volume.name.as_str()) {
                    return StructuralSnafu {
                        message: format!(
                            "volumes {other} and {} are both mounted at {} in container {container}",
                            volume.name, attachment.path
                        ),
                    }
                    .fail();
                }
            }
        }
    }
    Ok(())
}
