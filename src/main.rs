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


use asdb_operator::{crd, init_tracing, run, validate};
use clap::{Parser, Subcommand};
use shadow_rs::shadow;
use std::path::PathBuf;

shadow!(build);

#[derive(Parser)]
#[command(name = "asdb-op", version = build::CLAP_LONG_VERSION)]
#[command(about = "Aerospike cluster admission webhook CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Output CRDs in YAML
    Crd {
        /// Optional output path. If not set, the output will be written to stdout.
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Review AerospikeCluster descriptors without a cluster
    Validate {
        /// Descriptor being submitted
        #[arg(long)]
        new: PathBuf,

        /// Previously accepted descriptor, reviews the change as an update
        #[arg(long)]
        old: Option<PathBuf>,
    },

    /// Run the admission webhook
    Server {
        #[arg(long, env = "WEBHOOK_PORT", default_value_t = 9443)]
        port: u16,

        #[arg(long, env = "RUST_LOG", default_value = "info")]
        log_filter: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crd { file } => crd(file).await?,
        Commands::Validate { new, old } => {
            init_tracing("warn");
            let review = validate(&new, old.as_deref()).await?;
            for warning in &review.warnings {
                println!("warning: {warning}");
            }
            match &review.rejection {
                Some(error) => {
                    println!("rejected: {}: {}", error.kind(), error);
                    std::process::exit(1);
                }
                None => println!("allowed"),
            }
        }
        Commands::Server { port, log_filter } => {
            init_tracing(&log_filter);
            run(port).await?
        }
    }

    Ok(())
}
