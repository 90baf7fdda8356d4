//! Chain Verifier: walks the certificate-record sequence, recomputes content
//! and chain hashes, drives the finality-seal state machine, and enforces
//! post-seal discipline.

use serde_json::Value;

use crate::canonical::{compute_certificate_id, sha256_hex};
use crate::error::VerifyError;

/// Embedded verbatim; the only value `advise` may take under an ABSTAIN decision.
const CANONICAL_ADVISE: &str =
    "use classical analysis (limits/asymptotics/numerical methods) with explicit acknowledgement of approximation";

/// Synthetic predecessor chain hash when the first record supplies none.
const GENESIS: &str = "GENESIS";

const REQUIRED_KEYS: [&str; 9] = [
    "mode",
    "phase",
    "label",
    "op",
    "decision",
    "reason",
    "certificate_id",
    "chain_hash",
    "a_decimals",
];

/// Verify an ordered sequence of certificate records in a single forward pass.
///
/// The first failing rule aborts verification; there is no partial acceptance.
pub fn verify_chain(records: &[Value]) -> Result<(), VerifyError> {
    if records.is_empty() {
        return Err(VerifyError::Structural {
            detail: "certificate log contains no records".to_string(),
        });
    }

    let mut prev_chain_hash: Option<String> = None;
    let mut seal_index: Option<usize> = None;
    let mut seal_id: Option<String> = None;
    let mut sealed_chain_hash: Option<String> = None;

    for (i, record) in records.iter().enumerate() {
        let label = label_of(record, i);

        for key in REQUIRED_KEYS {
            if record.get(key).is_none() {
                return Err(VerifyError::Structural {
                    detail: format!("record {i} ({label}) missing required key '{key}'"),
                });
            }
        }

        let decision = required_str(record, "decision", i, &label)?;
        let op = required_str(record, "op", i, &label)?;

        check_advise_discipline(record, decision, i, &label)?;

        let expected_cid = compute_certificate_id(record);
        let actual_cid = required_str(record, "certificate_id", i, &label)?.to_string();
        if expected_cid != actual_cid {
            return Err(VerifyError::CertificateIdMismatch {
                label: label.clone(),
                index: i,
                expected: expected_cid,
                actual: actual_cid,
            });
        }

        if i == 0 {
            prev_chain_hash = Some(genesis_prev_chain_hash(record));
        }

        let record_chain_hash = required_str(record, "chain_hash", i, &label)?.to_string();

        if let Some(sealed_hash) = &sealed_chain_hash {
            if &record_chain_hash != sealed_hash {
                return Err(VerifyError::PostSealChainDrift {
                    label: label.clone(),
                    index: i,
                });
            }
        } else {
            let prev = prev_chain_hash.as_deref().unwrap_or(GENESIS);
            let expected = sha256_hex(format!("{prev}|{actual_cid}").as_bytes());
            if expected != record_chain_hash {
                return Err(VerifyError::ChainHashMismatch {
                    label: label.clone(),
                    index: i,
                    expected,
                    actual: record_chain_hash.clone(),
                });
            }
            prev_chain_hash = Some(record_chain_hash.clone());
        }

        if op == "seal" && record.get("sealed").and_then(Value::as_bool).unwrap_or(false) {
            match seal_index {
                None => {
                    seal_index = Some(i);
                    seal_id = Some(
                        record
                            .get("seal_id")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| actual_cid.clone()),
                    );
                    sealed_chain_hash = Some(record_chain_hash.clone());
                }
                Some(_) => {
                    if !is_reseal_refusal(record) {
                        return Err(VerifyError::IllegalResealAssertion {
                            label: label.clone(),
                            index: i,
                            detail: "second seal record is not a valid reseal refusal".to_string(),
                        });
                    }
                    let bound = bound_seal_id(record, seal_id.as_deref());
                    if bound.as_deref() != seal_id.as_deref() {
                        return Err(VerifyError::IllegalResealAssertion {
                            label: label.clone(),
                            index: i,
                            detail: "reseal refusal seal id does not match the bound seal"
                                .to_string(),
                        });
                    }
                    if Some(&record_chain_hash) != sealed_chain_hash.as_ref() {
                        return Err(VerifyError::IllegalResealAssertion {
                            label: label.clone(),
                            index: i,
                            detail: "reseal refusal chain_hash does not match sealed_chain_hash"
                                .to_string(),
                        });
                    }
                }
            }
        }
    }

    let seal_index = seal_index.ok_or(VerifyError::NoFinalitySeal)?;
    let seal_id = seal_id.expect("seal_id is set alongside seal_index");

    for (i, record) in records.iter().enumerate().skip(seal_index + 1) {
        let label = label_of(record, i);
        let mode = record.get("mode").and_then(Value::as_str).unwrap_or("");
        if mode != "proof_assistant_cert" {
            continue;
        }

        let decision = record.get("decision").and_then(Value::as_str).unwrap_or("");
        if decision != "ABSTAIN" {
            return Err(VerifyError::PostSealIssuance {
                label: label.clone(),
                index: i,
            });
        }

        let reason_upper = record
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_uppercase();
        let reason_ok = reason_upper.starts_with("FINALITY_VIOLATION")
            || reason_upper.contains("SEAL")
            || reason_upper.contains("FINALITY");
        if !reason_ok {
            return Err(VerifyError::PostSealReasonMissing {
                label: label.clone(),
                index: i,
            });
        }

        if let Some(finality) = record.get("finality").filter(|v| v.is_object()) {
            let sealed_flag = finality.get("sealed").and_then(Value::as_bool).unwrap_or(false);
            if !sealed_flag {
                return Err(VerifyError::PostSealFinalityFlag {
                    label: label.clone(),
                    index: i,
                });
            }
            if let Some(fid) = finality.get("seal_id").and_then(Value::as_str) {
                if fid != seal_id {
                    return Err(VerifyError::PostSealIdMismatch {
                        label: label.clone(),
                        index: i,
                    });
                }
            }
        }
    }

    Ok(())
}

fn label_of(record: &Value, index: usize) -> String {
    record
        .get("label")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("<record {index}>"))
}

fn required_str<'a>(
    record: &'a Value,
    key: &str,
    index: usize,
    label: &str,
) -> Result<&'a str, VerifyError> {
    record.get(key).and_then(Value::as_str).ok_or_else(|| VerifyError::Structural {
        detail: format!("record {index} ({label}) field '{key}' is not a string"),
    })
}

fn check_advise_discipline(
    record: &Value,
    decision: &str,
    index: usize,
    label: &str,
) -> Result<(), VerifyError> {
    let advise = record.get("advise").filter(|v| !v.is_null());

    if decision == "ABSTAIN" {
        if let Some(value) = advise {
            let matches_canonical = value.as_str() == Some(CANONICAL_ADVISE);
            if !matches_canonical {
                return Err(VerifyError::AdviseDiscipline {
                    label: label.to_string(),
                    index,
                });
            }
        }
    } else if advise.is_some() {
        return Err(VerifyError::AdviseDiscipline {
            label: label.to_string(),
            index,
        });
    }

    Ok(())
}

/// First non-null value from: `prev_chain_hash`, `inputs.seal_prev_chain_hash`, `"GENESIS"`.
fn genesis_prev_chain_hash(record: &Value) -> String {
    record
        .get("prev_chain_hash")
        .and_then(Value::as_str)
        .or_else(|| {
            record
                .get("inputs")
                .and_then(|v| v.get("seal_prev_chain_hash"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| GENESIS.to_string())
}

/// A record qualifies as a reseal refusal iff `decision == "ABSTAIN"` and any
/// of the permissive reason-string predicates (or the finality flag) match.
/// The "SEALED anywhere in reason" branch is broader than the canonical
/// `FINALITY_VIOLATION` prefix; this is preserved to match deployed bundles.
fn is_reseal_refusal(record: &Value) -> bool {
    let decision = record.get("decision").and_then(Value::as_str).unwrap_or("");
    if decision != "ABSTAIN" {
        return false;
    }

    let reason = record
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_uppercase();

    let finality_sealed = record
        .get("finality")
        .and_then(|v| v.get("sealed"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    reason.starts_with("FINALITY_VIOLATION")
        || (reason.contains("ALREADY") && reason.contains("SEAL"))
        || reason.starts_with("ALREADY_SEALED")
        || reason.starts_with("SEALED")
        || reason.contains("SEALED")
        || (reason.contains("FINALITY") && reason.contains("VIOL"))
        || finality_sealed
}

/// `finality.seal_id` if present, else the record's own `seal_id`, else the
/// ambient seal id carried from the seal event.
fn bound_seal_id(record: &Value, ambient: Option<&str>) -> Option<String> {
    record
        .get("finality")
        .and_then(|v| v.get("seal_id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| record.get("seal_id").and_then(Value::as_str).map(str::to_string))
        .or_else(|| ambient.map(str::to_string))
}
