//! Error kinds for certificate-bundle verification.
//!
//! A single hand-rolled enum carries every failure the core can raise. There is
//! no recovery path: the first variant constructed aborts verification.

use std::fmt;

#[derive(Debug, Clone)]
pub enum VerifyError {
    Structural {
        detail: String,
    },
    ManifestMalformed {
        detail: String,
    },
    ManifestSelfReference {
        path: String,
    },
    ManifestMissingFile {
        path: String,
    },
    ManifestHashMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    CertificateIdMismatch {
        label: String,
        index: usize,
        expected: String,
        actual: String,
    },
    ChainHashMismatch {
        label: String,
        index: usize,
        expected: String,
        actual: String,
    },
    PostSealChainDrift {
        label: String,
        index: usize,
    },
    IllegalResealAssertion {
        label: String,
        index: usize,
        detail: String,
    },
    NoFinalitySeal,
    PostSealIssuance {
        label: String,
        index: usize,
    },
    PostSealReasonMissing {
        label: String,
        index: usize,
    },
    PostSealFinalityFlag {
        label: String,
        index: usize,
    },
    PostSealIdMismatch {
        label: String,
        index: usize,
    },
    AdviseDiscipline {
        label: String,
        index: usize,
    },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Structural { detail } => write!(f, "StructuralError: {detail}"),
            VerifyError::ManifestMalformed { detail } => {
                write!(f, "ManifestMalformed: {detail}")
            }
            VerifyError::ManifestSelfReference { path } => {
                write!(f, "ManifestSelfReference: manifest lists itself at '{path}'")
            }
            VerifyError::ManifestMissingFile { path } => {
                write!(f, "ManifestMissingFile: '{path}' does not exist")
            }
            VerifyError::ManifestHashMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "ManifestHashMismatch: '{path}' expected {expected}, got {actual}"
            ),
            VerifyError::CertificateIdMismatch {
                label,
                index,
                expected,
                actual,
            } => write!(
                f,
                "CertificateIdMismatch: record {index} ({label}) expected {expected}, got {actual}"
            ),
            VerifyError::ChainHashMismatch {
                label,
                index,
                expected,
                actual,
            } => write!(
                f,
                "ChainHashMismatch: record {index} ({label}) expected {expected}, got {actual}"
            ),
            VerifyError::PostSealChainDrift { label, index } => write!(
                f,
                "PostSealChainDrift: record {index} ({label}) chain_hash diverges from sealed_chain_hash"
            ),
            VerifyError::IllegalResealAssertion {
                label,
                index,
                detail,
            } => write!(
                f,
                "IllegalResealAssertion: record {index} ({label}): {detail}"
            ),
            VerifyError::NoFinalitySeal => write!(f, "NoFinalitySeal: no seal event found in log"),
            VerifyError::PostSealIssuance { label, index } => write!(
                f,
                "PostSealIssuance: record {index} ({label}) issues a decision after the finality seal"
            ),
            VerifyError::PostSealReasonMissing { label, index } => write!(
                f,
                "PostSealReasonMissing: record {index} ({label}) reason does not cite the finality seal"
            ),
            VerifyError::PostSealFinalityFlag { label, index } => write!(
                f,
                "PostSealFinalityFlag: record {index} ({label}) finality.sealed is not true"
            ),
            VerifyError::PostSealIdMismatch { label, index } => write!(
                f,
                "PostSealIdMismatch: record {index} ({label}) finality.seal_id does not match the seal"
            ),
            VerifyError::AdviseDiscipline { label, index } => write!(
                f,
                "AdviseDiscipline: record {index} ({label}) advise field inconsistent with decision"
            ),
        }
    }
}

impl std::error::Error for VerifyError {}
