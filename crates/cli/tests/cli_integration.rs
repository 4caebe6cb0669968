//! End-to-end tests driving the `greenloop` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn greenloop() -> Command {
    Command::cargo_bin("greenloop").expect("binary built")
}

#[test]
fn show_on_a_fresh_store_prints_seeds_and_welcome_bonus() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    greenloop()
        .args(["--quiet", "show", "--state"])
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Eco-Warrior (50 points)"))
        .stdout(predicate::str::contains("Greenview Apartments"))
        .stdout(predicate::str::contains("Sunrise Towers"));
}

#[test]
fn show_emits_machine_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    let output = greenloop()
        .args(["--quiet", "show", "--output", "json", "--state"])
        .arg(&state)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["profile"]["points"], 50);
    assert_eq!(summary["buildings"][0]["id"], "BLD001");
    assert_eq!(summary["vehicles"][0]["status"], "Idle");
}

#[test]
fn shell_reports_persist_to_the_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    greenloop()
        .args(["--quiet", "shell", "--state"])
        .arg(&state)
        .write_stdin("report Overflowing bin near the park\nhistory\nbadges\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("report filed"))
        .stdout(predicate::str::contains("Overflowing bin near the park"))
        .stdout(predicate::str::contains("status: Pending"))
        // First report unlocks eco-reporter.
        .stdout(predicate::str::contains("* eco-reporter"));

    // A separate invocation reads the same store.
    greenloop()
        .args(["--quiet", "show", "--state"])
        .arg(&state)
        .assert()
        .success()
        .stdout(predicate::str::contains("Overflowing bin near the park"));
}

#[test]
fn shell_moderation_blocks_and_allows() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    let script = "\
create Green Downtown Neighborhood cleanup crew\n\
communities\n\
quit\n";
    let output = greenloop()
        .args(["--quiet", "shell", "--state"])
        .arg(&state)
        .write_stdin(script)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("created Green (Downtown)"), "{stdout}");

    // Fish the community id out of the output to message it. The prompt
    // is printed without a trailing newline, so the marker sits mid-line.
    let marker = "created Green (Downtown) [";
    let id = stdout
        .lines()
        .find_map(|line| {
            let start = line.find(marker)? + marker.len();
            let rest = &line[start..];
            Some(rest[..rest.find(']')?].to_string())
        })
        .expect("community id in output");

    greenloop()
        .args(["--quiet", "shell", "--state"])
        .arg(&state)
        .write_stdin(format!(
            "say {id} this is total spam honestly\nsay {id} see you at the cleanup\nmessages {id}\nquit\n"
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected: message contains a blocked term"))
        .stdout(predicate::str::contains("see you at the cleanup"));
}

#[test]
fn unknown_ids_do_not_crash_the_shell() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");

    greenloop()
        .args(["--quiet", "shell", "--state"])
        .arg(&state)
        .write_stdin("status report-missing resolved\nwarn BLD999 overflowing bins\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("no such report: report-missing"))
        .stdout(predicate::str::contains("no such building: BLD999"));
}
