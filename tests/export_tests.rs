use predicates::str::contains;
use std::fs;

mod common;
use common::{ADMIN_ID, Sandbox};

#[test]
fn test_export_csv_has_no_secrets() {
    let sb = Sandbox::with_admin("export_csv");
    let out = sb.file("directory.csv");

    sb.admin()
        .args(["export", "--format", "csv", "--file", &out])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let text = fs::read_to_string(&out).expect("csv written");
    assert!(text.contains(ADMIN_ID));
    assert!(text.contains("Ana María"));
    assert!(!text.contains("pbkdf2"));
}

#[test]
fn test_export_json_is_an_array() {
    let sb = Sandbox::with_admin("export_json");
    let out = sb.file("directory.json");

    sb.admin()
        .args(["export", "--format", "json", "--file", &out])
        .assert()
        .success();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_export_relative_path_fails() {
    let sb = Sandbox::with_admin("export_relative");

    sb.admin()
        .args(["export", "--file", "directory.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn test_import_keeps_ids_and_skips_existing() {
    let sb = Sandbox::with_admin("import_ids");
    let file = sb.file("news.json");
    fs::write(
        &file,
        r#"[
            {"id": "noticia-1", "Titulo": "Aniversario", "Fecha": "2025-05-01"},
            {"id": "noticia-1", "Titulo": "Repetida", "Fecha": "2025-05-01"},
            "no es un objeto"
        ]"#,
    )
    .unwrap();

    sb.admin()
        .args(["import", "--collection", "noticias", "--file", &file])
        .assert()
        .success()
        .stdout(contains("Imported 1 document(s) into Noticias (2 skipped)"));

    sb.admin()
        .args(["news", "del", "noticia", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted noticia"));
}

#[test]
fn test_backup_copies_database() {
    let sb = Sandbox::with_admin("backup_copy");
    let dest = sb.file("backup.sqlite");

    sb.admin()
        .args(["backup", "--file", &dest])
        .assert()
        .success();

    assert!(std::path::Path::new(&dest).exists());
}
