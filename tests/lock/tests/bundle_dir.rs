//! Bundle directory lock tests through the full runner pipeline:
//! run → write directory → read directory → verify.

use sokowahn_harness::bundle::verify_bundle;
use sokowahn_harness::bundle_dir::{
    read_bundle_dir, verify_bundle_dir, write_bundle_dir, BundleDirReadError,
    BundleDirVerifyError,
};
use sokowahn_harness::runner::run;
use sokowahn_harness::worlds::cycle_room::CycleRoom;
use sokowahn_harness::worlds::goal_cell::GoalCell;

#[test]
fn roundtrip_produces_equivalent_bundle() {
    let bundle = run(&CycleRoom).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    let loaded = read_bundle_dir(dir.path()).unwrap();

    assert_eq!(loaded.digest, bundle.digest);
    assert_eq!(loaded.manifest, bundle.manifest);
    assert_eq!(loaded.digest_basis, bundle.digest_basis);
    assert_eq!(loaded.artifacts, bundle.artifacts);
    verify_bundle(&loaded).unwrap();
    verify_bundle_dir(dir.path()).unwrap();
}

#[test]
fn directory_path_is_not_hashed() {
    let bundle = run(&GoalCell::corridor()).unwrap();
    let root = tempfile::tempdir().unwrap();
    let a = root.path().join("first");
    let b = root.path().join("nested").join("second");
    write_bundle_dir(&bundle, &a).unwrap();
    write_bundle_dir(&bundle, &b).unwrap();
    assert_eq!(
        read_bundle_dir(&a).unwrap().digest,
        read_bundle_dir(&b).unwrap().digest
    );
}

#[test]
fn rewrite_over_existing_directory_is_clean() {
    let bundle = run(&CycleRoom).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    verify_bundle_dir(dir.path()).unwrap();
}

#[test]
fn edited_profile_on_disk_fails_verification() {
    let bundle = run(&CycleRoom).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    std::fs::write(dir.path().join("profile.json"), b"{}").unwrap();
    assert!(matches!(
        verify_bundle_dir(dir.path()),
        Err(BundleDirVerifyError::Verify(_))
    ));
}

#[test]
fn manifest_with_unknown_version_is_rejected() {
    let bundle = run(&CycleRoom).unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    std::fs::write(
        dir.path().join("bundle_manifest.json"),
        br#"{"artifacts":[],"schema_version":"bundle.v0"}"#,
    )
    .unwrap();
    assert!(matches!(
        read_bundle_dir(dir.path()),
        Err(BundleDirReadError::ManifestVersionMismatch { found }) if found == "bundle.v0"
    ));
}
