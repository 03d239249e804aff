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

//! Validation of a configuration tree against the server's schema.

use crate::types::v1::config::{ConfigTree, NETWORK_CONNECTION_TYPES, kind_of};
use serde_json::Value;
use snafu::Snafu;
use std::fmt;

/// One failed schema rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub field: String,
    pub description: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.description)
    }
}

fn join(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("generated config not valid for version {}: {}", version, join(issues)))]
    Invalid {
        version: String,
        issues: Vec<SchemaIssue>,
    },

    #[snafu(display("failed to validate config for the version {}: {}", version, message))]
    Unavailable { version: String, message: String },
}

#[cfg_attr(test, mockall::automock)]
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, config: &ConfigTree, version: &str) -> Result<(), Error>;
}

/// Checks the shape of the well known top-level sections.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionSchema;

const SECTIONS: [(&str, &str); 7] = [
    ("service", "map"),
    ("network", "map"),
    ("namespaces", "list"),
    ("logging", "list"),
    ("security", "map"),
    ("xdr", "map"),
    ("mod-lua", "map"),
];

impl SchemaValidator for SectionSchema {
    fn validate(&self, config: &ConfigTree, version: &str) -> Result<(), Error> {
        let mut issues = Vec::new();
        let mut issue = |field: String, description: String| {
            issues.push(SchemaIssue { field, description })
        };

        for (key, value) in config.as_map() {
            match SECTIONS.iter().find(|(name, _)| name == key) {
                None => issue(key.clone(), "unknown section".to_string()),
                Some((_, expected)) if kind_of(value) != *expected => issue(
                    key.clone(),
                    format!("expected {expected}, found {}", kind_of(value)),
                ),
                Some(_) => {}
            }
        }

        if let Some(Value::Object(network)) = config.as_map().get("network") {
            for (key, value) in network {
                let expected = if key == "tls" { "list" } else { "map" };
                let known = key == "tls" || key == "info" || NETWORK_CONNECTION_TYPES.contains(&key.as_str());
                if !known {
                    issue(format!("network.{key}"), "unknown section".to_string());
                } else if kind_of(value) != expected {
                    issue(
                        format!("network.{key}"),
                        format!("expected {expected}, found {}", kind_of(value)),
                    );
                }
            }
        }

        for section in ["namespaces", "logging"] {
            if let Some(Value::Array(items)) = config.as_map().get(section) {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        issue(
                            format!("{section}[{i}]"),
                            format!("expected map, found {}", kind_of(item)),
                        );
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            InvalidSnafu { version, issues }.fail()
        }
    }
}
