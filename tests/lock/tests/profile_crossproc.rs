//! Cross-process determinism for persisted profile bundles.
//!
//! Spawns the `profile_fixture` binary under several environment variants
//! and asserts every run prints identical output. Bundle production,
//! persistence and read-back must not depend on process-level state.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("profile_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, args: &[&str], env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();

    let mut command = Command::new(&bin);
    command.current_dir(work_dir).args(args);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "profile_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[], &[]);

    for expected in [
        "world_id=cycle_room",
        "bundle_digest=sha256:",
        "chain_count=9",
        "steps=28",
        "artifact_count=4",
        "roundtrip=ok",
    ] {
        assert!(baseline.contains(expected), "baseline missing {expected}:\n{baseline}");
    }

    let alt_cwd = if cfg!(target_os = "windows") {
        "C:\\"
    } else {
        "/tmp"
    };
    assert_eq!(
        baseline,
        run_variant(alt_cwd, &[], &[]),
        "output differs when cwd changes from {root} to {alt_cwd}"
    );

    assert_eq!(
        baseline,
        run_variant(&root, &[], &[("LC_ALL", "C"), ("LANG", "C")]),
        "output differs when LC_ALL=C LANG=C"
    );

    assert_eq!(
        baseline,
        run_variant(
            &root,
            &[],
            &[
                ("SOKOWAHN_NOISE", "should_not_matter"),
                ("TZ", "America/New_York"),
                ("RUST_LOG", "trace"),
            ],
        ),
        "output differs with spurious env vars or trace logging"
    );
}

#[test]
fn crossproc_dedup_run_is_stable() {
    let root = workspace_root();
    let args = ["goal_corridor", "visited_cost"];
    let first = run_variant(&root, &args, &[]);
    let second = run_variant("/tmp", &args, &[("LC_ALL", "C")]);
    assert_eq!(first, second);
    assert!(first.contains("world_id=goal_corridor"));
    assert!(first.contains("roundtrip=ok"));
}

#[test]
fn crossproc_worlds_have_distinct_digests() {
    let root = workspace_root();
    let digest_line = |world: &str| {
        run_variant(&root, &[world], &[])
            .lines()
            .find(|l| l.starts_with("bundle_digest="))
            .expect("bundle_digest line")
            .to_string()
    };
    assert_ne!(digest_line("trivial_room"), digest_line("single_swap"));
}
