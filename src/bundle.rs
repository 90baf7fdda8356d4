//! Ties the Manifest Checker and Chain Verifier together into a single
//! pass/fail outcome for a bundle directory.

use std::path::Path;

use serde_json::Value;

use crate::chain;
use crate::error::VerifyError;
use crate::manifest;

/// Verify a bundle directory: manifest integrity first, then the certificate
/// chain. The first failing rule aborts with a single error.
pub fn verify_bundle(
    bundle_dir: &Path,
    certs_name: &str,
    manifest_name: &str,
) -> Result<(), VerifyError> {
    let manifest_path = bundle_dir.join(manifest_name);
    manifest::check_manifest(bundle_dir, &manifest_path)?;

    let certs_path = bundle_dir.join(certs_name);
    let content = std::fs::read_to_string(&certs_path).map_err(|e| VerifyError::Structural {
        detail: format!("cannot read '{certs_name}': {e}"),
    })?;

    let records = load_records(&content)?;
    chain::verify_chain(&records)
}

/// Parse newline-delimited JSON records, skipping blank lines.
fn load_records(content: &str) -> Result<Vec<Value>, VerifyError> {
    let mut records = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|e| VerifyError::Structural {
            detail: format!("malformed JSON on line {}: {e}", i + 1),
        })?;
        records.push(value);
    }

    if records.is_empty() {
        return Err(VerifyError::Structural {
            detail: "certificate log contains no records".to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn digest_hex(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    fn write_manifest(dir: &Path, entries: &[(&str, &str)]) {
        let manifest_path = dir.join("MANIFEST.sha256");
        let mut f = fs::File::create(manifest_path).unwrap();
        for (digest, path) in entries {
            writeln!(f, "{digest}  {path}").unwrap();
        }
    }

    #[test]
    fn full_bundle_round_trip_accepts() {
        let tmp = TempDir::new().unwrap();

        let r1 = serde_json::json!({
            "mode": "proof_assistant_cert", "phase": "1", "label": "L1", "op": "issue",
            "decision": "ACCEPT", "reason": "ok", "a_decimals": "0",
        });
        let mut r1 = r1;
        let cid1 = crate::canonical::compute_certificate_id(&r1);
        let chain1 = crate::canonical::sha256_hex(format!("GENESIS|{cid1}").as_bytes());
        r1["certificate_id"] = serde_json::json!(cid1);
        r1["chain_hash"] = serde_json::json!(chain1.clone());

        let mut r2 = serde_json::json!({
            "mode": "proof_assistant_cert", "phase": "1", "label": "L2", "op": "seal",
            "decision": "ACCEPT", "reason": "final", "a_decimals": "0", "sealed": true,
        });
        let cid2 = crate::canonical::compute_certificate_id(&r2);
        let chain2 = crate::canonical::sha256_hex(format!("{chain1}|{cid2}").as_bytes());
        r2["certificate_id"] = serde_json::json!(cid2);
        r2["chain_hash"] = serde_json::json!(chain2);

        let certs = format!(
            "{}\n{}\n",
            serde_json::to_string(&r1).unwrap(),
            serde_json::to_string(&r2).unwrap()
        );
        fs::write(tmp.path().join("CERTS.jsonl"), &certs).unwrap();

        let ruleset = b"ruleset-v1";
        fs::write(tmp.path().join("RULESET.txt"), ruleset).unwrap();

        write_manifest(
            tmp.path(),
            &[
                (&digest_hex(certs.as_bytes()), "CERTS.jsonl"),
                (&digest_hex(ruleset), "RULESET.txt"),
            ],
        );

        verify_bundle(tmp.path(), "CERTS.jsonl", "MANIFEST.sha256").unwrap();
    }

    #[test]
    fn missing_certs_file_is_structural() {
        let tmp = TempDir::new().unwrap();
        let data = b"x";
        fs::write(tmp.path().join("SOMEFILE.txt"), data).unwrap();
        write_manifest(tmp.path(), &[(&digest_hex(data), "SOMEFILE.txt")]);

        let err = verify_bundle(tmp.path(), "CERTS.jsonl", "MANIFEST.sha256").unwrap_err();
        assert!(matches!(err, VerifyError::Structural { .. }));
    }
}
