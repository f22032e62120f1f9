//! Cross-process determinism for plan runs.
//!
//! Spawns the `plan_fixture` binary under several environment variants and
//! asserts every variant prints identical output. Plan production must not
//! depend on the working directory, locale or unrelated environment.

use std::path::Path;
use std::process::Command;

const FIXTURE: &str = env!("CARGO_BIN_EXE_plan_fixture");

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(args: &[&str], work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let mut command = Command::new(FIXTURE);
    command
        .args(args)
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {FIXTURE} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "plan_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn field<'a>(output: &'a str, key: &str) -> &'a str {
    output
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
        .unwrap_or_else(|| panic!("output missing {key}:\n{output}"))
}

#[test]
fn default_request_output_is_stable_across_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&[], &root, &[]);

    assert!(field(&baseline, "bundle_digest").starts_with("sha256:"));
    assert!(field(&baseline, "graph_digest").starts_with("sha256:"));
    assert_eq!(
        field(&baseline, "plan"),
        "Eiffel Tower|Louvre Museum|Notre Dame Cathedral|Champs-Élysées|\
         Seine River Boat Ride|Montmartre|Sacré-Cœur Basilica|Palace of Versailles"
    );
    assert_eq!(field(&baseline, "total_cost"), "100");
    assert_eq!(field(&baseline, "total_expansions"), "8");
    assert_eq!(field(&baseline, "artifact_count"), "5");

    let alt_cwd = std::env::temp_dir();
    let variant_cwd = run_variant(&[], &alt_cwd.to_string_lossy(), &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes");

    let variant_locale = run_variant(&[], &root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    let variant_noise = run_variant(
        &[],
        &root,
        &[
            ("TRAILHEAD_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("RUST_LOG", "trace"),
        ],
    );
    assert_eq!(baseline, variant_noise, "output differs with spurious env vars");
}

#[test]
fn explicit_arguments_select_the_request() {
    let root = workspace_root();
    let one_day = run_variant(&["1", "50"], &root, &[]);
    assert_eq!(
        field(&one_day, "plan"),
        "Eiffel Tower|Louvre Museum|Notre Dame Cathedral|Champs-Élysées|Seine River Boat Ride"
    );
    assert_eq!(field(&one_day, "total_cost"), "40");
    assert_eq!(field(&one_day, "total_expansions"), "5");

    let default = run_variant(&[], &root, &[]);
    let explicit = run_variant(&["2", "100"], &root, &[]);
    assert_eq!(default, explicit);
    assert_ne!(
        field(&one_day, "bundle_digest"),
        field(&default, "bundle_digest")
    );
    assert_eq!(
        field(&one_day, "graph_digest"),
        field(&default, "graph_digest")
    );
}
