use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::Sandbox;

fn add_slot(sb: &Sandbox, kind: &str, day: &str, subject: &str, start: &str, end: &str) {
    sb.admin()
        .args([
            "schedule", "add", "--kind", kind, "--day", day, "--subject", subject, "--start",
            start, "--end", end,
        ])
        .assert()
        .success();
}

#[test]
fn test_fixed_week_lists_every_day_in_order() {
    let sb = Sandbox::with_admin("schedule_fixed");

    add_slot(&sb, "activity", "friday", "Vigilia", "20:00", "23:00");
    add_slot(&sb, "activity", "2", "Estudio bíblico", "19:00", "20:30");
    add_slot(&sb, "activity", "2", "Oración", "7:00", "8:00");

    let out = sb
        .cmd()
        .args(["schedule", "list", "--order", "fixed"])
        .output()
        .expect("run schedule list");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);

    let pos = |s: &str| text.find(s).unwrap_or_else(|| panic!("{} missing in:\n{}", s, text));
    assert!(pos("Sunday") < pos("Tuesday"));
    assert!(pos("Tuesday") < pos("Friday"));
    assert!(pos("Friday") < pos("Saturday"));
    // times are zero-padded and sorted inside the day
    assert!(pos("07:00-08:00") < pos("19:00-20:30"));
}

#[test]
fn test_services_are_separate_from_activities() {
    let sb = Sandbox::with_admin("schedule_services");

    add_slot(&sb, "service", "sunday", "Culto dominical", "10:00", "12:00");

    sb.cmd()
        .args(["schedule", "list", "--kind", "service", "--order", "today"])
        .assert()
        .success()
        .stdout(contains("Culto dominical"));

    sb.cmd()
        .args(["schedule", "list"])
        .assert()
        .success()
        .stdout(contains("No activities scheduled").and(contains("Culto dominical").not()));
}

#[test]
fn test_rejects_end_before_start_and_bad_day() {
    let sb = Sandbox::with_admin("schedule_invalid");

    sb.admin()
        .args([
            "schedule", "add", "--day", "3", "--subject", "X", "--start", "10:00", "--end", "09:00",
        ])
        .assert()
        .failure();

    sb.admin()
        .args([
            "schedule", "add", "--day", "9", "--subject", "X", "--start", "10:00", "--end", "11:00",
        ])
        .assert()
        .failure()
        .stderr(contains("unknown weekday"));
}

#[test]
fn test_delete_slot_by_id_prefix() {
    let sb = Sandbox::with_admin("schedule_delete");

    let out = sb
        .admin()
        .args([
            "schedule", "add", "--day", "1", "--subject", "Consejería", "--start", "15:00",
            "--end", "17:00",
        ])
        .output()
        .expect("add slot");
    let text = String::from_utf8_lossy(&out.stdout).to_string();
    let id = text
        .split("(id ")
        .nth(1)
        .and_then(|s| s.split(')').next())
        .expect("id in output")
        .to_string();

    sb.admin()
        .args(["schedule", "del", &id, "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted"));

    sb.cmd()
        .args(["schedule", "list"])
        .assert()
        .success()
        .stdout(contains("Consejería").not());
}
