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

use crate::admission::schema::{SchemaValidator, SectionSchema};
use crate::admission::version::{DottedVersions, VersionOracle};
use crate::utils::tls::{CertificateReader, PemFileReader};
use std::sync::Arc;

/// Collaborators consulted while reviewing a cluster.
#[derive(Clone)]
pub struct Context {
    pub(crate) schema: Arc<dyn SchemaValidator>,
    pub(crate) versions: Arc<dyn VersionOracle>,
    pub(crate) certificates: Arc<dyn CertificateReader>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(
            Arc::new(SectionSchema),
            Arc::new(DottedVersions),
            Arc::new(PemFileReader),
        )
    }
}

impl Context {
    pub fn new(
        schema: Arc<dyn SchemaValidator>,
        versions: Arc<dyn VersionOracle>,
        certificates: Arc<dyn CertificateReader>,
    ) -> Self {
        Self {
            schema,
            versions,
            certificates,
        }
    }

    pub fn with_schema(mut self, schema: impl SchemaValidator + 'static) -> Self {
        self.schema = Arc::new(schema);
        self
    }

    pub fn with_versions(mut self, versions: impl VersionOracle + 'static) -> Self {
        self.versions = Arc::new(versions);
        self
    }

    pub fn with_certificates(mut self, certificates: impl CertificateReader + 'static) -> Self {
        self.certificates = Arc::new(certificates);
        self
    }
}
