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


use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kube::core::admission::ConvertAdmissionReviewError;
use serde::Serialize;
use snafu::Snafu;

/// Failures that prevent a review from being produced at all.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Bad request: {}", source))]
    InvalidReview { source: ConvertAdmissionReviewError },

    #[snafu(display("review task failed: {}", source))]
    ReviewTask { source: tokio::task::JoinError },
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::InvalidReview { .. } => (StatusCode::BAD_REQUEST, "BadRequest"),
            Error::ReviewTask { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
