//! Helpers for rebuilding artifact bundles in negative tests.
//!
//! Rebuilding keeps artifact hashes, manifest and bundle digest consistent,
//! so a test trips exactly the semantic check it targets instead of a
//! plain hash mismatch.

use sokowahn_harness::bundle::{build_bundle, ArtifactBundleV1};
use sokowahn_kernel::proof::canon::canonical_json_bytes;

/// The bundle's artifacts as `(name, content, normative)` build inputs.
#[must_use]
pub fn artifact_inputs(bundle: &ArtifactBundleV1) -> Vec<(String, Vec<u8>, bool)> {
    bundle
        .artifacts
        .values()
        .map(|a| (a.name.clone(), a.content.clone(), a.normative))
        .collect()
}

/// Edit one JSON artifact and rebuild the bundle around it.
///
/// The verification report is not patched, so its bindings go stale.
///
/// # Panics
///
/// Panics if `name` is absent or not JSON. Test-only invariants.
pub fn rebuild_with_modified_json(
    bundle: &ArtifactBundleV1,
    name: &str,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ArtifactBundleV1 {
    let mut value = bundle.artifact_json(name).unwrap();
    modify(&mut value);
    let bytes = canonical_json_bytes(&value).unwrap();
    let inputs = artifact_inputs(bundle)
        .into_iter()
        .map(|(n, content, normative)| {
            if n == name {
                (n, bytes.clone(), normative)
            } else {
                (n, content, normative)
            }
        })
        .collect();
    build_bundle(inputs).unwrap()
}

/// Rebuild the bundle without one artifact.
///
/// # Panics
///
/// Panics if the remaining artifacts cannot be bundled.
#[must_use]
pub fn rebuild_without_artifact(bundle: &ArtifactBundleV1, name: &str) -> ArtifactBundleV1 {
    let inputs = artifact_inputs(bundle)
        .into_iter()
        .filter(|(n, _, _)| n != name)
        .collect();
    build_bundle(inputs).unwrap()
}
