use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use rchurch::db::store::DocumentStore;
use rchurch::models::Collection;

mod common;
use common::{ADMIN_ID, ADMIN_SECRET, Sandbox};

#[test]
fn test_first_admin_can_only_be_bootstrapped_once() {
    let sb = Sandbox::with_admin("bootstrap_once");

    // a second registration without a session is refused
    sb.cmd()
        .args([
            "person",
            "add",
            "--first-names",
            "Intruso",
            "--last-names",
            "X",
            "--id",
            "999",
            "--password",
            "x",
        ])
        .assert()
        .failure()
        .stderr(contains("Operation not allowed"));
}

#[test]
fn test_bootstrap_requires_a_password() {
    let sb = Sandbox::new("bootstrap_needs_secret");
    sb.init();

    sb.cmd()
        .args(["person", "add", "--first-names", "Ana", "--last-names", "P", "--id", "1"])
        .assert()
        .failure()
        .stderr(contains("--password"));
}

#[test]
fn test_login_create_wrong_secret_delete_lifecycle() {
    let sb = Sandbox::with_admin("login_lifecycle");

    // admin logs in
    sb.cmd()
        .args(["--pass", ADMIN_SECRET, "login", ADMIN_ID])
        .assert()
        .success()
        .stdout(contains("Welcome, Ana María Pérez"))
        .stdout(contains("Administrator"));

    // admin registers a member
    sb.admin()
        .args([
            "person",
            "add",
            "--first-names",
            "Luis",
            "--last-names",
            "Mora",
            "--id",
            "0911223344",
            "--password",
            "secreto",
            "--mobile",
            "0991234567",
        ])
        .assert()
        .success()
        .stdout(contains("Member Luis Mora registered"));

    // member can log in with the right secret
    sb.cmd()
        .args(["--pass", "secreto", "login", "0911223344"])
        .assert()
        .success()
        .stdout(contains("Member"));

    // wrong secret
    sb.cmd()
        .args(["--pass", "otra", "login", "0911223344"])
        .assert()
        .failure()
        .stderr(contains("Invalid credentials for 0911223344"));

    // delete, then the identifier is unknown
    sb.admin()
        .args(["person", "del", "0911223344", "--yes"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    sb.cmd()
        .args(["--pass", "secreto", "login", "0911223344"])
        .assert()
        .failure()
        .stderr(contains("Not found: member 0911223344"));
}

#[test]
fn test_duplicate_national_id_is_rejected() {
    let sb = Sandbox::with_admin("duplicate_cedula");

    sb.admin()
        .args([
            "person",
            "add",
            "--first-names",
            "Otra",
            "--last-names",
            "Ana",
            "--id",
            ADMIN_ID,
        ])
        .assert()
        .failure()
        .stderr(contains("Already exists"));
}

#[test]
fn test_members_cannot_mutate() {
    let sb = Sandbox::with_admin("member_cannot_mutate");

    sb.admin()
        .args([
            "person",
            "add",
            "--first-names",
            "Rosa",
            "--last-names",
            "Vera",
            "--id",
            "777",
            "--password",
            "rosa",
        ])
        .assert()
        .success();

    sb.cmd()
        .args(["--user", "777", "--pass", "rosa", "news", "add", "--title", "Hola"])
        .assert()
        .failure()
        .stderr(contains("is not an administrator"));
}

#[test]
fn test_list_show_and_edit() {
    let sb = Sandbox::with_admin("list_show_edit");

    sb.admin()
        .args([
            "person",
            "add",
            "--first-names",
            "Pedro",
            "--last-names",
            "Salas",
            "--id",
            "555",
            "--email",
            "pedro@example.org",
        ])
        .assert()
        .success();

    // listing needs a session
    sb.cmd()
        .args(["person", "list"])
        .assert()
        .failure()
        .stderr(contains("login required"));

    sb.admin()
        .args(["person", "list", "--search", "salas"])
        .assert()
        .success()
        .stdout(contains("Pedro Salas").and(contains("Ana María Pérez").not()));

    sb.admin()
        .args([
            "person",
            "edit",
            "555",
            "--church-role",
            "Diácono",
            "--water-baptized",
            "true",
            "--baptism-date",
            "2020-01-12",
        ])
        .assert()
        .success()
        .stdout(contains("updated"));

    sb.admin()
        .args(["person", "show", "555"])
        .assert()
        .success()
        .stdout(contains("Diácono"))
        .stdout(contains("2020-01-12"))
        .stdout(contains("Can log in      : no"));
}

#[test]
fn test_edit_rejects_bad_date() {
    let sb = Sandbox::with_admin("edit_bad_date");

    sb.admin()
        .args(["person", "edit", ADMIN_ID, "--birth-date", "31-12-1990"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_welcome_mail_is_queued_unless_disabled() {
    let sb = Sandbox::with_admin("welcome_outbox");

    for (id, extra) in [("601", None), ("602", Some("--no-welcome"))] {
        let mut cmd = sb.admin();
        cmd.args([
            "person",
            "add",
            "--first-names",
            "Marta",
            "--last-names",
            "Ríos",
            "--id",
            id,
            "--email",
            "marta@example.org",
        ]);
        if let Some(flag) = extra {
            cmd.arg(flag);
        }
        cmd.assert().success();
    }

    let store = DocumentStore::open(&sb.db).unwrap();
    assert_eq!(store.count(Collection::CorreosSalientes).unwrap(), 1);
}
