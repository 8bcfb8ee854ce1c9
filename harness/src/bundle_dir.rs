//! Bundle directory persistence: write, read and verify bundles on disk.
//!
//! # Layout
//!
//! ```text
//! <dir>/
//!   bundle_manifest.json      canonical JSON, every artifact
//!   bundle_digest_basis.json  canonical JSON, normative projection
//!   bundle_digest.txt         "sha256:..."
//!   room_summary.json         artifact files, one per manifest entry
//!   profile.json
//!   stats.json
//!   verification_report.json
//! ```
//!
//! The directory path never enters a hash. The manifest is the source of
//! truth for which files belong to the bundle.
//!
//! # Fail-closed reading
//!
//! Missing declared files, undeclared extra files, a malformed manifest and
//! a stored digest that does not match the digest basis are all errors.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use sokowahn_kernel::proof::hash::{canonical_hash, ContentHash};
use tracing::debug;

use crate::bundle::{
    verify_bundle, ArtifactBundleV1, BundleArtifact, BundleVerifyError, DOMAIN_BUNDLE_DIGEST,
};

const MANIFEST_FILE: &str = "bundle_manifest.json";
const DIGEST_BASIS_FILE: &str = "bundle_digest_basis.json";
const DIGEST_FILE: &str = "bundle_digest.txt";
const METADATA_FILES: [&str; 3] = [MANIFEST_FILE, DIGEST_BASIS_FILE, DIGEST_FILE];

/// Prefix of in-flight files written by [`write_bundle_dir`].
const STAGING_PREFIX: &str = ".staging_";

/// Error writing a bundle directory.
#[derive(Debug)]
pub enum BundleDirWriteError {
    Io { detail: String },
    /// An artifact name would escape the directory or collide with metadata.
    InvalidArtifactName { name: String },
}

impl fmt::Display for BundleDirWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::InvalidArtifactName { name } => write!(f, "invalid artifact name: {name}"),
        }
    }
}

impl std::error::Error for BundleDirWriteError {}

/// Error reading a bundle directory.
#[derive(Debug)]
pub enum BundleDirReadError {
    Io { detail: String },
    MissingMetadata { filename: String },
    MissingArtifact { name: String },
    ExtraFile { name: String },
    /// `bundle_manifest.json` is not JSON or not shaped like a manifest.
    ManifestInvalid { detail: String },
    ManifestVersionMismatch { found: String },
    DigestMismatch { stored: String, recomputed: String },
}

impl fmt::Display for BundleDirReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared extra file: {name}"),
            Self::ManifestInvalid { detail } => write!(f, "invalid manifest: {detail}"),
            Self::ManifestVersionMismatch { found } => {
                write!(f, "manifest version mismatch: {found}")
            }
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
        }
    }
}

impl std::error::Error for BundleDirReadError {}

/// Error verifying a bundle directory.
#[derive(Debug)]
pub enum BundleDirVerifyError {
    Read(BundleDirReadError),
    Verify(BundleVerifyError),
}

impl fmt::Display for BundleDirVerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(e) => write!(f, "read error: {e}"),
            Self::Verify(e) => write!(f, "verify error: {e}"),
        }
    }
}

impl std::error::Error for BundleDirVerifyError {}

/// Write `bundle` into `dir`, creating the directory if needed.
///
/// Every file is staged under a hidden name and renamed into place.
///
/// # Errors
///
/// Returns [`BundleDirWriteError`] on I/O failure or an artifact name that
/// is not a plain file name.
pub fn write_bundle_dir(bundle: &ArtifactBundleV1, dir: &Path) -> Result<(), BundleDirWriteError> {
    std::fs::create_dir_all(dir).map_err(|e| BundleDirWriteError::Io {
        detail: format!("create {}: {e}", dir.display()),
    })?;

    for artifact in bundle.artifacts.values() {
        if !is_plain_name(&artifact.name) {
            return Err(BundleDirWriteError::InvalidArtifactName {
                name: artifact.name.clone(),
            });
        }
        stage_and_rename(dir, &artifact.name, &artifact.content)?;
    }
    stage_and_rename(dir, MANIFEST_FILE, &bundle.manifest)?;
    stage_and_rename(dir, DIGEST_BASIS_FILE, &bundle.digest_basis)?;
    stage_and_rename(dir, DIGEST_FILE, bundle.digest.as_str().as_bytes())?;

    debug!(
        dir = %dir.display(),
        artifacts = bundle.artifacts.len(),
        digest = %bundle.digest,
        "bundle directory written"
    );
    Ok(())
}

/// One artifact line of the manifest.
struct ManifestEntry {
    name: String,
    content_hash: ContentHash,
    normative: bool,
}

/// Read a bundle directory back into memory.
///
/// The stored digest is checked against the digest basis; artifact hashes
/// are taken from the manifest as declared and checked by
/// [`verify_bundle_dir`].
///
/// # Errors
///
/// Returns [`BundleDirReadError`] on any layout or manifest problem.
pub fn read_bundle_dir(dir: &Path) -> Result<ArtifactBundleV1, BundleDirReadError> {
    let manifest = read_metadata(dir, MANIFEST_FILE)?;
    let digest_basis = read_metadata(dir, DIGEST_BASIS_FILE)?;
    let stored_digest = read_metadata(dir, DIGEST_FILE)?;

    let entries = parse_manifest(&manifest)?;
    let declared: BTreeSet<&str> = entries
        .iter()
        .map(|e| e.name.as_str())
        .chain(METADATA_FILES)
        .collect();
    for name in list_files(dir)? {
        if !declared.contains(name.as_str()) {
            return Err(BundleDirReadError::ExtraFile { name });
        }
    }

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let content = std::fs::read(dir.join(&entry.name)).map_err(|_| {
            BundleDirReadError::MissingArtifact {
                name: entry.name.clone(),
            }
        })?;
        artifacts.insert(
            entry.name.clone(),
            BundleArtifact {
                name: entry.name,
                content,
                content_hash: entry.content_hash,
                normative: entry.normative,
            },
        );
    }

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);
    let stored = String::from_utf8_lossy(&stored_digest).trim().to_string();
    if stored != digest.as_str() {
        return Err(BundleDirReadError::DigestMismatch {
            stored,
            recomputed: digest.as_str().to_string(),
        });
    }

    Ok(ArtifactBundleV1 {
        artifacts,
        manifest,
        digest_basis,
        digest,
    })
}

/// Read `dir` and run [`verify_bundle`] on the result.
///
/// # Errors
///
/// Returns [`BundleDirVerifyError`] on read failure or integrity mismatch.
pub fn verify_bundle_dir(dir: &Path) -> Result<(), BundleDirVerifyError> {
    let bundle = read_bundle_dir(dir).map_err(BundleDirVerifyError::Read)?;
    verify_bundle(&bundle).map_err(BundleDirVerifyError::Verify)
}

fn parse_manifest(bytes: &[u8]) -> Result<Vec<ManifestEntry>, BundleDirReadError> {
    let invalid = |detail: String| BundleDirReadError::ManifestInvalid { detail };
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| invalid(e.to_string()))?;

    let version = value["schema_version"].as_str().unwrap_or_default();
    if version != "bundle.v1" {
        return Err(BundleDirReadError::ManifestVersionMismatch {
            found: version.to_string(),
        });
    }

    let listed = value["artifacts"]
        .as_array()
        .ok_or_else(|| invalid("\"artifacts\" is not an array".into()))?;
    listed
        .iter()
        .map(|item| -> Result<ManifestEntry, BundleDirReadError> {
            let name = item["name"]
                .as_str()
                .filter(|n| is_plain_name(n))
                .ok_or_else(|| invalid(format!("bad artifact name in {item}")))?;
            let content_hash = item["content_hash"]
                .as_str()
                .and_then(ContentHash::parse)
                .ok_or_else(|| invalid(format!("bad content_hash for {name}")))?;
            let normative = item["normative"]
                .as_bool()
                .ok_or_else(|| invalid(format!("missing normative flag for {name}")))?;
            Ok(ManifestEntry {
                name: name.to_string(),
                content_hash,
                normative,
            })
        })
        .collect()
}

/// A bare file name that is not one of the metadata files.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !METADATA_FILES.contains(&name)
}

fn stage_and_rename(dir: &Path, name: &str, content: &[u8]) -> Result<(), BundleDirWriteError> {
    let staged = dir.join(format!("{STAGING_PREFIX}{name}"));
    let target = dir.join(name);
    std::fs::write(&staged, content).map_err(|e| BundleDirWriteError::Io {
        detail: format!("write {}: {e}", staged.display()),
    })?;
    std::fs::rename(&staged, &target).map_err(|e| BundleDirWriteError::Io {
        detail: format!("rename {} to {}: {e}", staged.display(), target.display()),
    })
}

fn read_metadata(dir: &Path, filename: &str) -> Result<Vec<u8>, BundleDirReadError> {
    std::fs::read(dir.join(filename)).map_err(|_| BundleDirReadError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, staging leftovers excluded.
fn list_files(dir: &Path) -> Result<Vec<String>, BundleDirReadError> {
    let io = |e: std::io::Error| BundleDirReadError::Io {
        detail: format!("list {}: {e}", dir.display()),
    };
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let entry = entry.map_err(io)?;
        if !entry.file_type().map_err(io)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(STAGING_PREFIX) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
