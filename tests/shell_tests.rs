use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{ADMIN_ID, ADMIN_SECRET, Sandbox};

#[test]
fn test_shell_keeps_the_session_between_commands() {
    let sb = Sandbox::with_admin("shell_session");

    let script = format!(
        "--pass {} login {}\nwhoami\nnews add --title \"Santa Cena\"\nnews list\nlogout\nnews add --title Otra\nexit\n",
        ADMIN_SECRET, ADMIN_ID
    );

    sb.cmd()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Welcome, Ana María Pérez"))
        .stdout(contains("Santa Cena"))
        .stdout(contains("Session closed for Ana María Pérez"))
        .stderr(contains("login required"));
}

#[test]
fn test_shell_survives_bad_lines() {
    let sb = Sandbox::with_admin("shell_bad_lines");

    sb.cmd()
        .arg("shell")
        .write_stdin("frobnicate\nperson show 0000\nwhoami\n")
        .assert()
        .success()
        .stdout(contains("Not logged in"))
        .stderr(contains("login required").or(contains("Not found")));
}
