//! # CRD Generator
//!
//! Prints the `BlobStorage` CustomResourceDefinition.
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/blobstorage.yaml
//! cargo run --bin crdgen -- --format json | kubectl apply -f -
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cloud_resource_operator::crd::BlobStorage;
use kube::CustomResourceExt;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "crdgen", about = "Print the BlobStorage CRD")]
struct Args {
    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    format: Format,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let crd = BlobStorage::crd();

    let rendered = match args.format {
        Format::Yaml => serde_yaml::to_string(&crd).context("Failed to serialize CRD to YAML")?,
        Format::Json => {
            serde_json::to_string_pretty(&crd).context("Failed to serialize CRD to JSON")?
        }
    };
    print!("{rendered}");
    if matches!(args.format, Format::Json) {
        println!();
    }
    Ok(())
}
