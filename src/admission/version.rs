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

//! Image tag to server version resolution and version ordering.

use regex::Regex;
use snafu::{Snafu, ensure};
use std::cmp::Ordering;
use std::sync::LazyLock;

/// Oldest server version the operator can manage.
pub const BASE_VERSION: &str = "6.0.0.0";

/// Init image version assumed for pods that never recorded one.
pub const BASE_INIT_VERSION: &str = "1.0.0";

/// Oldest init image able to apply configuration without restarts.
pub const MIN_INIT_VERSION_FOR_DYNAMIC_CONF: &str = "2.2.0";

#[allow(clippy::expect_used)]
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(\.[0-9]+)+").expect("valid version pattern"));

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("image version is mandatory for image: {}", image))]
    MissingVersion { image: String },

    #[snafu(display("invalid image version format: {}", tag))]
    InvalidFormat { tag: String },

    #[snafu(display("invalid version string {}", version))]
    InvalidVersion { version: String },

    #[snafu(display("upgrade from {} to {} is not supported: {}", from, to, reason))]
    UnsupportedUpgrade {
        from: String,
        to: String,
        reason: &'static str,
    },
}

/// Compares versions and decides whether moving between two of them is safe.
#[cfg_attr(test, mockall::automock)]
pub trait VersionOracle: Send + Sync {
    fn compare(&self, left: &str, right: &str) -> Result<Ordering, Error>;

    fn is_valid_upgrade(&self, from: &str, to: &str) -> Result<(), Error>;
}

/// Numeric comparison of dotted versions, missing parts count as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct DottedVersions;

fn parse(version: &str) -> Result<Vec<u64>, Error> {
    version
        .split('.')
        .map(|part| {
            part.parse::<u64>().map_err(|_| Error::InvalidVersion {
                version: version.to_string(),
            })
        })
        .collect()
}

impl VersionOracle for DottedVersions {
    fn compare(&self, left: &str, right: &str) -> Result<Ordering, Error> {
        let left = parse(left)?;
        let right = parse(right)?;
        let len = left.len().max(right.len());
        let part = |parts: &[u64], i: usize| parts.get(i).copied().unwrap_or(0);
        Ok((0..len)
            .map(|i| part(&left, i).cmp(&part(&right, i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal))
    }

    fn is_valid_upgrade(&self, from: &str, to: &str) -> Result<(), Error> {
        let from_major = parse(from)?.first().copied().unwrap_or(0);
        let to_major = parse(to)?.first().copied().unwrap_or(0);
        ensure!(
            to_major >= from_major,
            UnsupportedUpgradeSnafu {
                from,
                to,
                reason: "downgrade across major versions",
            }
        );
        Ok(())
    }
}

/// Splits `registry/repo/name:tag@digest` into its name and tag parts.
pub fn image_tag(image: &str) -> (&str, &str) {
    let image = image.split('@').next().unwrap_or(image);
    let name_start = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[name_start..].rfind(':') {
        Some(i) => (&image[..name_start + i], &image[name_start + i + 1..]),
        None => (image, ""),
    }
}

/// Server version encoded in an image tag.
///
/// The longest dotted numeric run in the tag wins, so
/// `aerospike/aerospike-server-enterprise:ce-8.0.0.2_1` resolves to `8.0.0.2`.
pub fn image_version(image: &str) -> Result<String, Error> {
    let (_, tag) = image_tag(image);
    ensure!(
        !tag.is_empty() && !tag.eq_ignore_ascii_case("latest"),
        MissingVersionSnafu { image }
    );

    VERSION_PATTERN
        .find_iter(tag)
        .map(|m| m.as_str())
        .reduce(|best, candidate| if candidate.len() >= best.len() { candidate } else { best })
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidFormat { tag: tag.to_string() })
}

pub fn is_enterprise(image: &str) -> bool {
    image.to_ascii_lowercase().contains("enterprise")
}
