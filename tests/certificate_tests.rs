use predicates::str::contains;

mod common;
use common::{ADMIN_ID, Sandbox};

/// The JSON line printed by `cert issue`.
fn issued_payload(sb: &Sandbox, key: &str, kind: &str) -> String {
    let out = sb
        .admin()
        .args(["cert", "issue", key, "--type", kind])
        .output()
        .expect("run cert issue");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .find(|l| l.starts_with('{'))
        .expect("payload line")
        .to_string()
}

#[test]
fn test_issued_card_verifies() {
    let sb = Sandbox::with_admin("cert_card_roundtrip");

    let payload = issued_payload(&sb, ADMIN_ID, "carnet");
    assert!(payload.contains("\"certificateType\":\"carnet\""));

    sb.admin()
        .args(["cert", "verify", &payload])
        .assert()
        .success()
        .stdout(contains("Valid Membership card"))
        .stdout(contains("Ana María Pérez"))
        .stdout(contains("Photo     : none"));
}

#[test]
fn test_unknown_member_is_record_not_found() {
    let sb = Sandbox::with_admin("cert_unknown_member");

    let raw = r#"{"certificateType":"carnet","Cedula":"000","Nombres":"X","Apellidos":"Y"}"#;
    sb.admin()
        .args(["cert", "verify", raw])
        .assert()
        .failure()
        .stderr(contains("No member record matches certificate ID 000"));
}

#[test]
fn test_unsupported_and_malformed_payloads() {
    let sb = Sandbox::with_admin("cert_bad_payloads");

    sb.admin()
        .args(["cert", "verify", r#"{"certificateType":"diploma"}"#])
        .assert()
        .failure()
        .stderr(contains("Unsupported certificate type: diploma"));

    sb.admin()
        .args(["cert", "verify", "not json"])
        .assert()
        .failure()
        .stderr(contains("Malformed certificate payload"));
}

#[test]
fn test_baptism_needs_a_baptized_member() {
    let sb = Sandbox::with_admin("cert_baptism");

    sb.admin()
        .args(["cert", "issue", ADMIN_ID, "--type", "bautismo"])
        .assert()
        .failure()
        .stderr(contains("not registered as baptized"));

    sb.admin()
        .args([
            "person",
            "edit",
            ADMIN_ID,
            "--water-baptized",
            "true",
            "--baptism-date",
            "2015-06-07",
            "--officiant",
            "Pastor Daniel",
        ])
        .assert()
        .success();

    let payload = issued_payload(&sb, ADMIN_ID, "bautismo");
    sb.admin()
        .args(["cert", "verify", &payload])
        .assert()
        .success()
        .stdout(contains("Valid Baptism certificate"))
        .stdout(contains("Pastor Daniel"));
}

#[test]
fn test_scan_keeps_going_after_a_bad_line() {
    let sb = Sandbox::with_admin("cert_scan");
    let payload = issued_payload(&sb, ADMIN_ID, "carnet");

    sb.admin()
        .args(["cert", "scan"])
        .write_stdin(format!("garbage\n\n{}\n", payload))
        .assert()
        .success()
        .stderr(contains("Malformed certificate payload"))
        .stdout(contains("Valid Membership card"));
}

#[test]
fn test_verify_needs_login() {
    let sb = Sandbox::with_admin("cert_login");

    sb.cmd()
        .args(["cert", "verify", "{}"])
        .assert()
        .failure()
        .stderr(contains("login required"));
}
