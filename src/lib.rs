pub mod bundle;
pub mod canonical;
pub mod chain;
pub mod cli;
pub mod error;
pub mod manifest;

use clap::Parser;
use cli::{Cli, ExitCode};

/// Run the verifier CLI and return an exit code: 0 on pass, 2 on any failure.
pub fn run() -> u8 {
    let cli = Cli::parse();

    let certs = cli.certs.to_string_lossy().into_owned();
    let manifest_name = cli.manifest.to_string_lossy().into_owned();

    match bundle::verify_bundle(&cli.bundle_dir, &certs, &manifest_name) {
        Ok(()) => {
            if cli.json {
                println!(r#"{{"outcome":"PASS","message":null}}"#);
            } else {
                println!("VERIFY: PASS");
            }
            ExitCode::Success.into()
        }
        Err(e) => {
            if cli.json {
                let escaped = e.to_string().replace('\\', "\\\\").replace('"', "\\\"");
                println!(r#"{{"outcome":"FAIL","message":"{escaped}"}}"#);
            } else {
                println!("VERIFY: FAIL ({e})");
            }
            ExitCode::Failure.into()
        }
    }
}
