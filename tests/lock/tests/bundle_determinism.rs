//! Bundle determinism and binding lock tests.

use lock_tests::bundle_test_helpers::{rebuild_with_modified_json, rebuild_without_artifact};
use sokowahn_harness::bundle::{verify_bundle, BundleVerifyError, PROFILE, REPORT, STATS};
use sokowahn_harness::runner::{run, run_profile};
use sokowahn_harness::worlds::all_worlds;
use sokowahn_harness::worlds::cycle_room::CycleRoom;
use sokowahn_search::ProfilePolicyV1;

#[test]
fn repeated_runs_are_byte_identical() {
    for world in all_worlds() {
        let a = run(world.as_ref()).unwrap();
        let b = run(world.as_ref()).unwrap();
        assert_eq!(a.digest, b.digest, "{}", world.world_id());
        assert_eq!(a.manifest, b.manifest);
        assert_eq!(a.artifacts, b.artifacts);
        verify_bundle(&a).unwrap();
    }
}

#[test]
fn worlds_have_distinct_digests() {
    let mut digests: Vec<String> = all_worlds()
        .iter()
        .map(|w| run(w.as_ref()).unwrap().digest.as_str().to_string())
        .collect();
    let total = digests.len();
    digests.sort();
    digests.dedup();
    assert_eq!(digests.len(), total);
}

#[test]
fn stats_are_observational() {
    let bundle = run(&CycleRoom).unwrap();
    let edited = rebuild_with_modified_json(&bundle, STATS, |stats| {
        stats["steps"] = serde_json::json!(0);
    });
    assert_eq!(edited.digest, bundle.digest);
    assert_ne!(edited.manifest, bundle.manifest);
    verify_bundle(&edited).unwrap();
}

#[test]
fn edited_profile_breaks_report_binding() {
    let bundle = run(&CycleRoom).unwrap();
    let edited = rebuild_with_modified_json(&bundle, PROFILE, |profile| {
        profile["chains"] = serde_json::json!([]);
    });
    assert_ne!(edited.digest, bundle.digest);
    assert!(matches!(
        verify_bundle(&edited),
        Err(BundleVerifyError::ReportBindingMismatch {
            field: "profile_digest",
            ..
        })
    ));
}

#[test]
fn missing_profile_is_detected() {
    let bundle = run(&CycleRoom).unwrap();
    let stripped = rebuild_without_artifact(&bundle, PROFILE);
    assert_eq!(
        verify_bundle(&stripped),
        Err(BundleVerifyError::ArtifactMissing {
            artifact: PROFILE.into()
        })
    );
}

#[test]
fn bundle_without_report_still_verifies_integrity() {
    let bundle = run(&CycleRoom).unwrap();
    verify_bundle(&rebuild_without_artifact(&bundle, REPORT)).unwrap();
}

#[test]
fn recorded_and_unrecorded_chains_differ_only_in_chain_list() {
    let recorded = run(&CycleRoom).unwrap();
    let counted = run_profile(
        &CycleRoom,
        &ProfilePolicyV1 {
            record_chains: false,
            ..ProfilePolicyV1::default()
        },
    )
    .unwrap();
    let a = recorded.artifact_json(PROFILE).unwrap();
    let b = counted.artifact_json(PROFILE).unwrap();
    assert_eq!(a["chain_count"], b["chain_count"]);
    assert_eq!(b["chains"], serde_json::json!([]));
    assert_ne!(recorded.digest, counted.digest);
}
