//! Binary that profiles a fixture world, writes the bundle to a temp
//! directory, reads it back, verifies it, and prints deterministic output
//! lines for cross-process verification.
//!
//! Usage: `profile_fixture [world_id] [dedup]`
//! (defaults: `cycle_room`, `none`; dedup is `none` or `visited_cost`)
//!
//! Output: seven lines, each `key=value`:
//!   `world_id`=cycle_room
//!   `bundle_digest`=sha256:...
//!   `profile_digest`=sha256:...
//!   `chain_count`=9
//!   `steps`=28
//!   `artifact_count`=4
//!   `roundtrip`=ok
//!
//! Logs go to stderr (`RUST_LOG` selects the level) so stdout stays stable.

use sokowahn_harness::bundle::{PROFILE, REPORT, STATS};
use sokowahn_harness::bundle_dir::{read_bundle_dir, verify_bundle_dir, write_bundle_dir};
use sokowahn_harness::runner::run_profile;
use sokowahn_harness::worlds::world_by_id;
use sokowahn_search::{DedupModeV1, ProfilePolicyV1};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let world_id = args.next().unwrap_or_else(|| "cycle_room".to_string());
    let dedup = args.next().map_or(DedupModeV1::None, |s| {
        DedupModeV1::parse(&s).unwrap_or_else(|| panic!("unknown dedup mode: {s}"))
    });

    let world = world_by_id(&world_id).unwrap_or_else(|| panic!("unknown world: {world_id}"));
    let policy = ProfilePolicyV1 {
        dedup,
        ..ProfilePolicyV1::default()
    };
    let bundle = run_profile(world.as_ref(), &policy).expect("profile run failed");

    let dir = std::env::temp_dir().join(format!(
        "sokowahn_profile_fixture_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    write_bundle_dir(&bundle, &dir).expect("write_bundle_dir failed");
    let loaded = read_bundle_dir(&dir).expect("read_bundle_dir failed");
    verify_bundle_dir(&dir).expect("verify_bundle_dir failed");
    let _ = std::fs::remove_dir_all(&dir);

    let report = loaded.artifact_json(REPORT).expect("missing report");
    let profile = loaded.artifact_json(PROFILE).expect("missing profile");
    let stats = loaded.artifact_json(STATS).expect("missing stats");

    let roundtrip = if loaded.digest == bundle.digest
        && loaded.manifest == bundle.manifest
        && loaded.digest_basis == bundle.digest_basis
    {
        "ok"
    } else {
        "MISMATCH"
    };

    println!("world_id={world_id}");
    println!("bundle_digest={}", loaded.digest);
    println!(
        "profile_digest={}",
        report["profile_digest"].as_str().expect("missing profile_digest")
    );
    println!("chain_count={}", profile["chain_count"]);
    println!("steps={}", stats["steps"]);
    println!("artifact_count={}", loaded.artifacts.len());
    println!("roundtrip={roundtrip}");
}
