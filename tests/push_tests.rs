use predicates::str::contains;
use std::fs;

mod common;
use common::Sandbox;

#[test]
fn test_register_is_idempotent() {
    let sb = Sandbox::with_admin("push_register");

    sb.cmd()
        .args(["push", "register", "ExponentPushToken[abc]"])
        .assert()
        .success()
        .stdout(contains("Device registered"));

    sb.cmd()
        .args(["push", "register", " ExponentPushToken[abc] "])
        .assert()
        .success()
        .stdout(contains("already registered"));

    sb.admin()
        .args(["push", "list"])
        .assert()
        .success()
        .stdout(contains("Registered devices (1)"));

    sb.cmd()
        .args(["push", "unregister", "ExponentPushToken[abc]"])
        .assert()
        .success()
        .stdout(contains("Removed 1 registration(s)"));
}

#[test]
fn test_dry_run_batches_by_hundred() {
    let sb = Sandbox::with_admin("push_batches");

    let tokens: Vec<serde_json::Value> = (0..150)
        .map(|i| serde_json::json!({ "Token": format!("ExponentPushToken[{}]", i) }))
        .collect();
    let file = sb.file("tokens.json");
    fs::write(&file, serde_json::to_string(&tokens).unwrap()).unwrap();

    sb.admin()
        .args(["import", "--collection", "push-tokens", "--file", &file])
        .assert()
        .success()
        .stdout(contains("Imported 150 document(s) into PushTokens"));

    sb.admin()
        .args(["push", "send", "--title", "Culto", "--body", "Hoy 19:00", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("batch 1: 100 message(s)"))
        .stdout(contains("batch 2: 50 message(s)"))
        .stdout(contains("Would send 150 notification(s) in 2 batch(es)"));
}

#[test]
fn test_send_requires_title_and_body() {
    let sb = Sandbox::with_admin("push_validation");

    sb.admin()
        .args(["push", "send", "--title", "", "--body", "x", "--dry-run"])
        .assert()
        .failure()
        .stderr(contains("title and body are required"));
}

#[test]
fn test_send_without_devices_makes_no_request() {
    let sb = Sandbox::with_admin("push_no_devices");

    // the sandbox gateway URL is unreachable, so success means nothing was posted
    sb.admin()
        .args(["push", "send", "--title", "Aviso", "--body", "Sin dispositivos"])
        .assert()
        .success()
        .stdout(contains("No devices registered"));
}

#[test]
fn test_gateway_failure_is_reported() {
    let sb = Sandbox::with_admin("push_gateway_down");

    sb.cmd()
        .args(["push", "register", "ExponentPushToken[x]"])
        .assert()
        .success();

    sb.admin()
        .args(["push", "send", "--title", "Aviso", "--body", "Hola"])
        .assert()
        .failure()
        .stderr(contains("Network error"))
        .stderr(contains("0 of 1 batch(es) already sent"));
}
