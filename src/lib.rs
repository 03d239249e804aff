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


use crate::admission::{Generations, Review};
use crate::context::Context;
use crate::types::v1::cluster::AerospikeCluster;
use kube::CustomResourceExt;
use std::path::Path;
use std::pin::Pin;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod admission;
pub mod context;
pub mod types;
pub mod utils;
pub mod webhook;


pub fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();
}

pub async fn run(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    webhook::server::run(port, Context::default()).await
}

pub async fn crd(file: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer: Pin<Box<dyn AsyncWrite + Send>> = if let Some(file) = file {
        Box::pin(
            tokio::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(file)
                .await?,
        )
    } else {
        Box::pin(tokio::io::stdout())
    };

    writer
        .write_all(serde_yaml_ng::to_string(&AerospikeCluster::crd())?.as_bytes())
        .await?;

    Ok(())
}

/// Reviews descriptors read from YAML files, `old` being the accepted one.
pub async fn validate(new: &Path, old: Option<&Path>) -> Result<Review, Box<dyn std::error::Error>> {
    let incoming = read_cluster(new).await?;
    let accepted = match old {
        Some(path) => Some(read_cluster(path).await?),
        None => None,
    };

    let generations = match &accepted {
        Some(accepted) => Generations::update(&incoming, accepted),
        None => Generations::create(&incoming),
    };
    info!(file = %new.display(), update = generations.is_update(), "reviewing descriptor");

    Ok(admission::review(&Context::default(), &generations))
}

async fn read_cluster(path: &Path) -> Result<AerospikeCluster, Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_yaml_ng::from_str(&text)?)
}
