//! In-memory artifact bundle: the output of a profile run.
//!
//! No file I/O in this module; see [`crate::bundle_dir`] for persistence.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged normative (participates in the bundle digest) or
//! observational (listed in the manifest, excluded from the digest).
//! `stats.json` is observational: search counters describe one run of one
//! implementation, not the room.
//!
//! The bundle digest is computed over the **digest basis**: a canonical JSON
//! projection of the normative artifact hashes only.

use std::collections::BTreeMap;
use std::fmt;

use sokowahn_kernel::proof::canon::{canonical_json_bytes, is_canonical};
use sokowahn_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Domain for artifact content hashes.
pub const DOMAIN_BUNDLE_ARTIFACT: HashDomain = HashDomain::BundleArtifact;

/// Domain for the bundle digest.
pub const DOMAIN_BUNDLE_DIGEST: HashDomain = HashDomain::BundleDigest;

/// Artifact names the runner produces.
pub const ROOM_SUMMARY: &str = "room_summary.json";
pub const PROFILE: &str = "profile.json";
pub const STATS: &str = "stats.json";
pub const REPORT: &str = "verification_report.json";

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"profile.json"`).
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete artifact bundle of a profile run.
#[derive(Debug, Clone)]
pub struct ArtifactBundleV1 {
    /// Artifacts indexed by logical name, in sorted order.
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Canonical JSON listing all artifacts with their normative flags.
    pub manifest: Vec<u8>,
    /// Canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

impl ArtifactBundleV1 {
    /// Parsed JSON of an artifact, if present and valid.
    #[must_use]
    pub fn artifact_json(&self, name: &str) -> Option<serde_json::Value> {
        let artifact = self.artifacts.get(name)?;
        serde_json::from_slice(&artifact.content).ok()
    }
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
    /// Two inputs share a name.
    DuplicateArtifact { name: String },
}

impl fmt::Display for BundleBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::DuplicateArtifact { name } => write!(f, "duplicate artifact: {name}"),
        }
    }
}

impl std::error::Error for BundleBuildError {}

/// Build a bundle from `(name, content, normative)` triples.
///
/// # Errors
///
/// Returns [`BundleBuildError`] on a repeated name or if canonical JSON
/// serialization fails.
pub fn build_bundle(
    inputs: Vec<(String, Vec<u8>, bool)>,
) -> Result<ArtifactBundleV1, BundleBuildError> {
    let mut artifacts = BTreeMap::new();
    for (name, content, normative) in inputs {
        if artifacts.contains_key(&name) {
            return Err(BundleBuildError::DuplicateArtifact { name });
        }
        let content_hash = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &content);
        artifacts.insert(
            name.clone(),
            BundleArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    let manifest = manifest_bytes(&artifacts)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;
    let digest_basis = digest_basis_bytes(&artifacts)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;
    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(ArtifactBundleV1 {
        artifacts,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleVerifyError {
    /// An artifact's stored `content_hash` does not match its content.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored manifest differs from the one recomputed from the artifacts.
    ManifestMismatch,
    /// Stored digest basis differs from the recomputed normative projection.
    DigestBasisMismatch,
    /// Stored digest does not match the hash of the digest basis.
    DigestMismatch { expected: String, actual: String },
    /// A normative JSON artifact is not in canonical form.
    ArtifactNotCanonical { artifact: String },
    /// A required artifact is absent.
    ArtifactMissing { artifact: String },
    /// An artifact is not valid JSON.
    ArtifactNotJson { artifact: String, detail: String },
    /// The report lacks a field.
    ReportFieldMissing { field: &'static str },
    /// A digest declared in the report differs from the recomputed one.
    ReportBindingMismatch {
        field: &'static str,
        declared: String,
        recomputed: String,
    },
    /// Canonical JSON error during verification.
    CanonError { detail: String },
}

impl fmt::Display for BundleVerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(
                f,
                "content hash mismatch for {artifact}: stored {expected}, recomputed {actual}"
            ),
            Self::ManifestMismatch => write!(f, "manifest does not match artifacts"),
            Self::DigestBasisMismatch => write!(f, "digest basis does not match artifacts"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "bundle digest mismatch: stored {expected}, recomputed {actual}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "normative artifact {artifact} is not canonical JSON")
            }
            Self::ArtifactMissing { artifact } => write!(f, "missing artifact: {artifact}"),
            Self::ArtifactNotJson { artifact, detail } => {
                write!(f, "artifact {artifact} is not JSON: {detail}")
            }
            Self::ReportFieldMissing { field } => write!(f, "report field missing: {field}"),
            Self::ReportBindingMismatch {
                field,
                declared,
                recomputed,
            } => write!(
                f,
                "report {field} mismatch: declared {declared}, recomputed {recomputed}"
            ),
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for BundleVerifyError {}

/// Verify the internal consistency of a bundle.
///
/// A pure integrity check; the search is not re-run. It proves:
///
/// 1. Each artifact's `content_hash` matches its content.
/// 2. `manifest` and `digest_basis` match the projections recomputed from
///    the artifacts, byte for byte (and so are canonical).
/// 3. `digest` is the hash of `digest_basis`.
/// 4. Normative `.json` artifacts are canonical.
/// 5. If a verification report is present, the room summary, policy and
///    profile digests and the chain count it declares match the artifacts.
///
/// # Errors
///
/// Returns the first [`BundleVerifyError`] encountered.
pub fn verify_bundle(bundle: &ArtifactBundleV1) -> Result<(), BundleVerifyError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    let manifest = manifest_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }

    let basis = digest_basis_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: digest.as_str().to_string(),
        });
    }

    for artifact in bundle.artifacts.values() {
        let is_json = std::path::Path::new(&artifact.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if artifact.normative && is_json && !is_canonical(&artifact.content) {
            return Err(BundleVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    verify_report_bindings(bundle)
}

/// Cross-check the digests a verification report declares.
fn verify_report_bindings(bundle: &ArtifactBundleV1) -> Result<(), BundleVerifyError> {
    let Some(report) = bundle.artifacts.get(REPORT) else {
        return Ok(());
    };
    let report = parse_json(report)?;

    let summary = required(bundle, ROOM_SUMMARY)?;
    check_binding(
        &report,
        "room_summary_digest",
        &canonical_hash(HashDomain::RoomSummary, &summary.content),
    )?;

    let profile = required(bundle, PROFILE)?;
    check_binding(
        &report,
        "profile_digest",
        &canonical_hash(HashDomain::RoomProfile, &profile.content),
    )?;

    let profile_json = parse_json(profile)?;
    let policy_bytes = canonical_json_bytes(&profile_json["policy"])
        .map_err(|e| BundleVerifyError::CanonError {
            detail: e.to_string(),
        })?;
    check_binding(
        &report,
        "policy_digest",
        &canonical_hash(HashDomain::ProfilePolicy, &policy_bytes),
    )?;

    let declared = report["chain_count"]
        .as_u64()
        .ok_or(BundleVerifyError::ReportFieldMissing {
            field: "chain_count",
        })?;
    let in_profile = profile_json["chain_count"].as_u64().unwrap_or(u64::MAX);
    if declared != in_profile {
        return Err(BundleVerifyError::ReportBindingMismatch {
            field: "chain_count",
            declared: declared.to_string(),
            recomputed: in_profile.to_string(),
        });
    }
    Ok(())
}

fn check_binding(
    report: &serde_json::Value,
    field: &'static str,
    recomputed: &ContentHash,
) -> Result<(), BundleVerifyError> {
    let declared = report[field]
        .as_str()
        .ok_or(BundleVerifyError::ReportFieldMissing { field })?;
    if declared != recomputed.as_str() {
        return Err(BundleVerifyError::ReportBindingMismatch {
            field,
            declared: declared.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

fn required<'b>(
    bundle: &'b ArtifactBundleV1,
    name: &str,
) -> Result<&'b BundleArtifact, BundleVerifyError> {
    bundle
        .artifacts
        .get(name)
        .ok_or_else(|| BundleVerifyError::ArtifactMissing {
            artifact: name.to_string(),
        })
}

fn parse_json(artifact: &BundleArtifact) -> Result<serde_json::Value, BundleVerifyError> {
    serde_json::from_slice(&artifact.content).map_err(|e| BundleVerifyError::ArtifactNotJson {
        artifact: artifact.name.clone(),
        detail: e.to_string(),
    })
}

fn manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let listed: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();
    let manifest = serde_json::json!({
        "artifacts": listed,
        "schema_version": "bundle.v1",
    });
    canonical_json_bytes(&manifest).map_err(|e| e.to_string())
}

fn digest_basis_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let normative: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();
    let basis = serde_json::json!({
        "artifacts": normative,
        "schema_version": "bundle_digest_basis.v1",
    });
    canonical_json_bytes(&basis).map_err(|e| e.to_string())
}
