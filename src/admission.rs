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

//! Admission of `AerospikeCluster` changes.
//!
//! A change is reviewed against up to three generations of the cluster: the
//! incoming descriptor, the previously accepted one and the status last
//! observed on the running cluster. Checks run in a fixed order and the first
//! failure decides the verdict:
//!
//! 1. the server version is resolved from the image tag,
//! 2. [`structural`] checks the incoming descriptor on its own,
//! 3. [`immutability`] compares it with the accepted descriptor (updates only),
//! 4. [`safety`] checks distributed invariants against all generations,
//! 5. [`batch`] checks rolling-update, scale-down and unavailability bounds.
//!
//! Reviews never mutate anything, so they can be retried freely.

use crate::context::Context;
use crate::types;
use crate::types::v1::cluster::AerospikeCluster;
use crate::types::v1::config;
use crate::types::v1::status::AerospikeClusterStatus;
use crate::utils::tls;
use serde::Serialize;
use snafu::{ResultExt, Snafu};
use strum::Display;
use tracing::{debug, info, warn};

pub mod batch;
pub mod immutability;
pub mod safety;
pub mod schema;
pub mod structural;
pub mod version;

/// Rejection categories reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum RejectionKind {
    StructuralError,
    ImmutabilityViolation,
    SafetyViolation,
    ExternalValidationError,
    PreconditionError,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{}", message))]
    Structural { message: String },

    #[snafu(transparent)]
    Config { source: config::Error },

    #[snafu(transparent)]
    Types { source: types::error::Error },

    #[snafu(display("{}", source))]
    ImageVersion { source: version::Error },

    #[snafu(display("cannot update {}: {}", field, message))]
    Immutable { field: String, message: String },

    #[snafu(display("{}", message))]
    Unsafe { message: String },

    #[snafu(display(
        "{} {} cannot be greater than or equal to {} as it may result in data loss. Set it to a lower value",
        field,
        requested,
        bound
    ))]
    UnsafeBound {
        field: &'static str,
        requested: String,
        bound: i64,
    },

    #[snafu(display("aerospikeConfig not valid: {}", source))]
    Schema { source: schema::Error },

    #[snafu(display("failed to compare versions: {}", source))]
    VersionCompare { source: version::Error },

    #[snafu(display("failed to start upgrade: {}", source))]
    Upgrade { source: version::Error },

    #[snafu(display("failed to read operator client certificate {}: {}", path, source))]
    ClientCertificate { path: String, source: tls::Error },

    #[snafu(display("{}", message))]
    Precondition { message: String },
}

impl Error {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Error::Structural { .. }
            | Error::Config { .. }
            | Error::Types { .. }
            | Error::ImageVersion { .. } => RejectionKind::StructuralError,
            Error::Immutable { .. } => RejectionKind::ImmutabilityViolation,
            Error::Unsafe { .. } | Error::UnsafeBound { .. } => RejectionKind::SafetyViolation,
            Error::Schema { .. }
            | Error::VersionCompare { .. }
            | Error::Upgrade { .. }
            | Error::ClientCertificate { .. } => RejectionKind::ExternalValidationError,
            Error::Precondition { .. } => RejectionKind::PreconditionError,
        }
    }
}

/// The generations of a cluster a change is reviewed against.
#[derive(Debug, Clone, Copy)]
pub struct Generations<'a> {
    pub incoming: &'a AerospikeCluster,
    /// Previously accepted descriptor, absent on creation.
    pub accepted: Option<&'a AerospikeCluster>,
    /// Status last observed on the running cluster.
    pub observed: Option<&'a AerospikeClusterStatus>,
}

impl<'a> Generations<'a> {
    pub fn create(incoming: &'a AerospikeCluster) -> Self {
        Self {
            incoming,
            accepted: None,
            observed: None,
        }
    }

    /// Observed status is taken from the incoming object, falling back to
    /// the accepted one.
    pub fn update(incoming: &'a AerospikeCluster, accepted: &'a AerospikeCluster) -> Self {
        Self {
            incoming,
            accepted: Some(accepted),
            observed: incoming.status.as_ref().or(accepted.status.as_ref()),
        }
    }

    pub fn with_status(mut self, observed: Option<&'a AerospikeClusterStatus>) -> Self {
        self.observed = observed;
        self
    }

    pub fn is_update(&self) -> bool {
        self.accepted.is_some()
    }

    /// Observed status, only if a configuration was ever applied.
    pub fn applied_status(&self) -> Option<&'a AerospikeClusterStatus> {
        self.observed.filter(|status| status.is_accepted())
    }
}

/// Verdict of a review.
#[derive(Debug, Default)]
pub struct Review {
    /// Advisory messages, returned whether or not the change is rejected.
    pub warnings: Vec<String>,
    pub rejection: Option<Error>,
}

impl Review {
    pub fn is_allowed(&self) -> bool {
        self.rejection.is_none()
    }

    pub fn into_result(self) -> Result<Vec<String>, Error> {
        match self.rejection {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }
}

/// Reviews a change to an `AerospikeCluster`.
pub fn review(ctx: &Context, generations: &Generations<'_>) -> Review {
    let cluster = generations.incoming;
    let name = cluster.metadata.name.as_deref().unwrap_or_default();
    let namespace = cluster.metadata.namespace.as_deref().unwrap_or_default();

    let mut review = Review {
        warnings: batch::disruption_warnings(cluster),
        rejection: None,
    };

    match validate(ctx, generations) {
        Ok(()) => info!(
            name,
            namespace,
            update = generations.is_update(),
            "aerospike cluster admitted"
        ),
        Err(error) => {
            warn!(
                name,
                namespace,
                kind = %error.kind(),
                %error,
                "aerospike cluster rejected"
            );
            review.rejection = Some(error);
        }
    }

    review
}

fn validate(ctx: &Context, generations: &Generations<'_>) -> Result<(), Error> {
    let cluster = generations.incoming;
    let version = version::image_version(&cluster.spec.image).context(ImageVersionSnafu)?;
    debug!(version, image = %cluster.spec.image, "resolved server version");

    structural::validate(ctx, cluster, &version)?;

    if let Some(accepted) = generations.accepted {
        immutability::validate(accepted, cluster)?;
    }

    safety::validate(ctx, generations, &version)?;
    batch::validate(generations)
}
