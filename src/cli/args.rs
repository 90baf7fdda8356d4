use std::path::PathBuf;

use clap::Parser;

/// Offline verifier for tamper-evident certificate-log audit bundles.
#[derive(Parser, Debug)]
#[command(name = "verify", about = "Verify a certificate audit bundle", version)]
pub struct Cli {
    /// Bundle directory containing CERTS.jsonl and MANIFEST.sha256.
    #[arg(long = "bundle_dir")]
    pub bundle_dir: PathBuf,

    /// Certificate log file name, relative to bundle_dir.
    #[arg(long, default_value = "CERTS.jsonl")]
    pub certs: PathBuf,

    /// Manifest file name, relative to bundle_dir.
    #[arg(long, default_value = "MANIFEST.sha256")]
    pub manifest: PathBuf,

    /// Emit a single-line JSON report instead of the plain-text contract.
    #[arg(long)]
    pub json: bool,
}
