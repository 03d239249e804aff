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

use rustls::pki_types::CertificateDer;
use snafu::{ResultExt, Snafu};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use x509_parser::extensions::GeneralName;
use x509_parser::parse_x509_certificate;

#[derive(Snafu, Debug)]
pub enum Error {
    #[snafu(display("read certificate {}: {}", path.display(), source))]
    ReadCertificate { path: PathBuf, source: io::Error },

    #[snafu(display("parse certificate error"))]
    InvalidCertificate { source: io::Error },

    #[snafu(display("no certificate"))]
    NonCertificate,

    #[snafu(display("decode x509 certificate: {}", message))]
    InvalidX509 { message: String },
}

/// Names a certificate is valid for.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CertificateNames {
    pub common_name: Option<String>,
    pub dns_names: Vec<String>,
}

impl CertificateNames {
    pub fn is_empty(&self) -> bool {
        self.common_name.is_none() && self.dns_names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.common_name.as_deref() == Some(name) || self.dns_names.iter().any(|n| n == name)
    }
}

/// Reads the identity of a certificate on the local filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait CertificateReader: Send + Sync {
    fn read_names(&self, path: &Path) -> Result<CertificateNames, Error>;
}

/// Reads PEM encoded certificates, using the first one in the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct PemFileReader;

impl CertificateReader for PemFileReader {
    fn read_names(&self, path: &Path) -> Result<CertificateNames, Error> {
        let pem = std::fs::read(path).context(ReadCertificateSnafu { path })?;
        certificate_names(&pem)
    }
}

// load certificates from PEM file
fn load_certs(cert: &[u8]) -> Result<Vec<CertificateDer<'static>>, Error> {
    let certs = rustls_pemfile::certs(&mut Cursor::new(cert))
        .collect::<Result<Vec<CertificateDer<'static>>, _>>()
        .context(InvalidCertificateSnafu)?;

    if certs.is_empty() {
        return NonCertificateSnafu.fail();
    }

    Ok(certs)
}

/// Common name and DNS subject alternative names of the first certificate.
pub fn certificate_names(cert_pem: &[u8]) -> Result<CertificateNames, Error> {
    let certs = load_certs(cert_pem)?;
    let Some(der) = certs.first() else {
        return NonCertificateSnafu.fail();
    };

    let (_, cert) = parse_x509_certificate(der.as_ref()).map_err(|e| Error::InvalidX509 {
        message: e.to_string(),
    })?;

    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);

    let san = cert
        .subject_alternative_name()
        .map_err(|e| Error::InvalidX509 {
            message: e.to_string(),
        })?;
    let dns_names = san
        .map(|ext| {
            ext.value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(dns) => Some(dns.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(CertificateNames {
        common_name,
        dns_names,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Self-signed, CN=localhost, no extensions.
    pub(crate) const LOCALHOST_CERT: &str = "
-----BEGIN CERTIFICATE-----
MIIDCTCCAfGgAwIBAgIUD4D7ObFcJ5PEZwq2t/cmrTbzcU0wDQYJKoZIhvcNAQEL
BQAwFDESMBAGA1UEAwwJbG9jYWxob3N0MB4XDTI1MTExMDA3NDQwNVoXDTI2MTEx
MDA3NDQwNVowFDESMBAGA1UEAwwJbG9jYWxob3N0MIIBIjANBgkqhkiG9w0BAQEF
AAOCAQ8AMIIBCgKCAQEAsnrreaQGztdaTppY7p1ExoDU7FpYjk8MalWs9xIioHTe
dpDlZmEWak0Q80qTvc+x6GT8VD/pLYqg6B2mot8I+Uv44GUmpPD/+WDxVbjvwL2b
fvcNGEniqKJUOy2za98WcmI8EoILwbmYy7cZslf6b3D0xuDsmovYJgtjNeziV6ie
LQfbWWXhAipYhUwaBAdUSQS+BWPPdYFG4LEE/8+BqmYdGU7ujIFlqSU89ZMfpZS4
pVRoEy16fs5O0UkbP1l63Q0qBLrLXjWw874dV8wC2p9iuVwofpDZRGhfYFaviZHb
MHdUBRUughU4vvTknAGwMzbrIH+eTp7aKrGKWb7ozQIDAQABo1MwUTAdBgNVHQ4E
FgQUGSE2L3XLbuxlA1Q0iX65aVGKzl4wHwYDVR0jBBgwFoAUGSE2L3XLbuxlA1Q0
iX65aVGKzl4wDwYDVR0TAQH/BAUwAwEB/zANBgkqhkiG9w0BAQsFAAOCAQEAGHwM
SYFN1/9ZlriVaJEpSvGlfeDvN5ipXqf0s1Ykux9rsTYchn7tcA6zhWqZUimwy/jO
I7jLfBNa3r5HT1uX3/RlMs6dMIO4h3vkSWjQ3QaGiuXh6U+erbkaeETtrw9b40ta
Dsj2rruE3Z11JV0y5fGcvXjXMFV7XsFQjNXF5TlXu4OUvfMeo9h4IbPmNQtq+g+t
nx0ZBloqo+punQVjHjovoQUWlrOOL5ZRZl1vLqqhHfw54a9weCXY8XJNnxWN0l0C
Kzht0TgbidDlWKBsk/CMTY8zpYrfVyPhnjNCeFGFG0DzrsehCgpEiEZ6vlylei7c
RfKUdp4DXmUZBDzeQw==
-----END CERTIFICATE-----
";

    /// Self-signed, CN=aerospike-a-0.test-runner with two DNS names.
    pub(crate) const SAN_CERT: &str = "
-----BEGIN CERTIFICATE-----
MIIB3zCCAYSgAwIBAgIUN5C1MVQq5SUsasUo+rmi4Xb0g4IwCgYIKoZIzj0EAwIw
JDEiMCAGA1UEAwwZYWVyb3NwaWtlLWEtMC50ZXN0LXJ1bm5lcjAgFw0yNjEwMTgw
ODQ2MzRaGA8yMTI2MDkyNDA4NDYzNFowJDEiMCAGA1UEAwwZYWVyb3NwaWtlLWEt
MC50ZXN0LXJ1bm5lcjBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABLXxUpXx+Bwn
Zvg1sBU6V0gIGG+JNxOsy0m2963j8nzdImQiWFfmGjlbkrINLk00+8dsxwnyzchG
zUrk994vCXWjgZEwgY4wHQYDVR0OBBYEFM0KEbUc8sOXYq9yjTxRoRRwQV9SMB8G
A1UdIwQYMBaAFM0KEbUc8sOXYq9yjTxRoRRwQV9SMA8GA1UdEwEB/wQFMAMBAf8w
OwYDVR0RBDQwMoIZYWVyb3NwaWtlLnRlc3QtcnVubmVyLnN2Y4IVYWRtaW4uYWVy
b3NwaWtlLmxvY2FsMAoGCCqGSM49BAMCA0kAMEYCIQDeHUx/cMr/JoWbNpfuEmx0
Ctc9i9spLFgUp296cE0pigIhAM1Ak1lkASwXbif9qlGTLJyWKmnYxkncNUGoiR5g
xQRo
-----END CERTIFICATE-----
";

    #[test]
    fn test_names_without_extensions() {
        let names = certificate_names(LOCALHOST_CERT.as_bytes()).expect("certificate parses");
        assert_eq!(names.common_name.as_deref(), Some("localhost"));
        assert!(names.dns_names.is_empty());
        assert!(names.contains("localhost"));
        assert!(!names.contains("aerospike"));
    }

    #[test]
    fn test_names_with_san() {
        let names = certificate_names(SAN_CERT.as_bytes()).expect("certificate parses");
        assert_eq!(
            names.common_name.as_deref(),
            Some("aerospike-a-0.test-runner")
        );
        assert_eq!(
            names.dns_names,
            vec![
                "aerospike.test-runner.svc".to_string(),
                "admin.aerospike.local".to_string()
            ]
        );
        assert!(names.contains("admin.aerospike.local"));
    }

    #[test]
    fn test_non_pem_input() {
        let err = certificate_names(b"not a certificate").expect_err("no PEM block");
        assert!(matches!(err, Error::NonCertificate));
    }

    #[test]
    fn test_pem_file_reader() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAN_CERT.as_bytes()).expect("write cert");

        let names = PemFileReader.read_names(file.path()).expect("read cert");
        assert!(names.contains("aerospike.test-runner.svc"));

        let missing = file.path().with_extension("missing");
        let err = PemFileReader
            .read_names(&missing)
            .expect_err("file does not exist");
        assert!(matches!(err, Error::ReadCertificate { .. }));
    }
}
