mod common;

use common::{run, stdout_json};

#[test]
fn delete_returns_removed_task() {
    let output = run(&["delete", "3", "--json"]);
    assert!(output.status.success());

    let task = stdout_json(&output);
    assert_eq!(task["id"], "3");
    assert_eq!(task["title"], "Lunch at Le Marais");
}

#[test]
fn delete_plain_prints_notice() {
    let output = run(&["delete", "4"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task removed: Seine River walk (4)"));
}

#[test]
fn notes_are_replaced_verbatim_in_one_shot_mode() {
    let output = run(&["notes", "3", "Order the falafel special", "--json"]);
    assert!(output.status.success());

    let task = stdout_json(&output);
    assert_eq!(task["notes"], "Order the falafel special");
}

#[test]
fn add_after_reference_gets_fresh_id() {
    let output = run(&[
        "add",
        "2",
        "Tuileries stroll",
        "--time",
        "11:30 AM",
        "--json",
    ]);
    assert!(output.status.success());

    let task = stdout_json(&output);
    assert_eq!(task["id"], "6");
    assert_eq!(task["status"], "pending");
    assert_eq!(task["scheduled_time"], "11:30 AM");
    assert_eq!(task["location"]["name"], "Tuileries stroll");
    assert_eq!(task["location"]["lat"], 48.8606);
}

#[test]
fn add_rejects_blank_title() {
    let output = run(&["add", "2", "   "]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("title is required"));
}

#[test]
fn distance_update_relabels_task() {
    let output = run(&["distance", "5", "300"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated distance: Dinner reservation (5) is 300m away"));
}

#[test]
fn map_and_share_emit_local_notices() {
    let map = run(&["map", "2"]);
    assert!(map.status.success());
    assert!(String::from_utf8_lossy(&map.stdout).contains("Opening map for Louvre Museum"));

    let share = run(&["share", "2", "--json"]);
    assert!(share.status.success());
    let payload = stdout_json(&share);
    assert_eq!(payload["notice"], "Location link copied");
    assert_eq!(payload["task_id"], "2");
}

#[test]
fn map_on_missing_task_fails() {
    let output = run(&["map", "9"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("task_not_found"));
}
