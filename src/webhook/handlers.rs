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


use axum::{Json, extract::State};
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use snafu::ResultExt;
use tracing::debug;

use crate::admission::{self, Generations};
use crate::context::Context;
use crate::types::v1::cluster::AerospikeCluster;
use crate::webhook::{
    error::{self, Result},
    state::AppState,
};

/// Validates an `AerospikeCluster` admission review.
pub async fn validate_cluster(
    State(state): State<AppState>,
    Json(review): Json<AdmissionReview<AerospikeCluster>>,
) -> Result<Json<AdmissionReview<DynamicObject>>> {
    let request: AdmissionRequest<AerospikeCluster> =
        review.try_into().context(error::InvalidReviewSnafu)?;
    debug!(
        uid = %request.uid,
        operation = ?request.operation,
        name = %request.name,
        "received admission request"
    );

    // Certificate reads block, keep them off the async workers.
    let ctx = state.ctx.clone();
    let response = tokio::task::spawn_blocking(move || admit(&ctx, &request))
        .await
        .context(error::ReviewTaskSnafu)?;
    Ok(Json(response.into_review()))
}

/// Answers one admission request. Only creations and updates are reviewed.
pub fn admit(ctx: &Context, request: &AdmissionRequest<AerospikeCluster>) -> AdmissionResponse {
    let mut response = AdmissionResponse::from(request);

    let incoming = match (&request.operation, &request.object) {
        (Operation::Create | Operation::Update, Some(object)) => with_namespace(object, request),
        (Operation::Create | Operation::Update, None) => {
            return response.deny("admission request carries no object");
        }
        _ => return response,
    };
    let accepted = match (&request.operation, &request.old_object) {
        (Operation::Update, Some(object)) => Some(with_namespace(object, request)),
        (Operation::Update, None) => {
            return response.deny("update admission request carries no old object");
        }
        _ => None,
    };

    let generations = match &accepted {
        Some(accepted) => Generations::update(&incoming, accepted),
        None => Generations::create(&incoming),
    };
    let review = admission::review(ctx, &generations);

    if !review.warnings.is_empty() {
        response.warnings = Some(review.warnings.clone());
    }
    match review.rejection {
        Some(error) => response.deny(format!("{}: {}", error.kind(), error)),
        None => response,
    }
}

/// The API server may omit the namespace from the object on creation.
fn with_namespace(
    object: &AerospikeCluster,
    request: &AdmissionRequest<AerospikeCluster>,
) -> AerospikeCluster {
    let mut object = object.clone();
    if object.metadata.namespace.is_none() {
        object.metadata.namespace = request.namespace.clone();
    }
    object
}
