//! Member directory export and bulk document import.

use crate::db::log::audit;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::Collection;
use crate::models::person::Person;
use crate::ui::messages::{ask_confirmation, success};
use clap::ValueEnum;
use csv::Writer;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Flat directory row. Secrets and photos never leave the store.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DirectoryEntry {
    pub id: String,
    pub national_id: String,
    pub first_names: String,
    pub last_names: String,
    pub role: String,
    pub church_role: String,
    pub email: String,
    pub mobile: String,
    pub phone: String,
    pub city: String,
    pub water_baptized: bool,
    pub church_married: bool,
}

impl DirectoryEntry {
    fn from_person(id: &str, p: &Person) -> Self {
        let s = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            id: id.to_string(),
            national_id: p.national_id.clone(),
            first_names: p.first_names.clone(),
            last_names: p.last_names.clone(),
            role: p.role.to_db_str().to_string(),
            church_role: s(&p.church_role),
            email: s(&p.email),
            mobile: s(&p.mobile),
            phone: s(&p.phone),
            city: s(&p.city),
            water_baptized: p.water_baptized,
            church_married: p.church_married,
        }
    }
}

const HEADERS: [&str; 12] = [
    "id",
    "national_id",
    "first_names",
    "last_names",
    "role",
    "church_role",
    "email",
    "mobile",
    "phone",
    "city",
    "water_baptized",
    "church_married",
];

fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }
    if ask_confirmation(&format!("The file '{}' already exists. Overwrite?", path.display())) {
        return Ok(());
    }
    Err(AppError::Cancelled("existing file not overwritten".into()))
}

fn write_csv(path: &Path, rows: &[DirectoryEntry]) -> AppResult<()> {
    let err = |e: csv::Error| AppError::Export(e.to_string());
    let mut wtr = Writer::from_path(path).map_err(err)?;

    wtr.write_record(HEADERS).map_err(err)?;
    for r in rows {
        wtr.write_record([
            r.id.as_str(),
            r.national_id.as_str(),
            r.first_names.as_str(),
            r.last_names.as_str(),
            r.role.as_str(),
            r.church_role.as_str(),
            r.email.as_str(),
            r.mobile.as_str(),
            r.phone.as_str(),
            r.city.as_str(),
            if r.water_baptized { "true" } else { "false" },
            if r.church_married { "true" } else { "false" },
        ])
        .map_err(err)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json(path: &Path, rows: &[DirectoryEntry]) -> AppResult<()> {
    fs::write(path, serde_json::to_string_pretty(rows)?)?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Directory rows sorted by last name, then first name.
    pub fn directory(store: &mut DocumentStore) -> AppResult<Vec<DirectoryEntry>> {
        let mut rows: Vec<DirectoryEntry> = store
            .list::<Person>()?
            .iter()
            .map(|p| DirectoryEntry::from_person(&p.id, &p.data))
            .collect();
        rows.sort_by(|a, b| {
            (a.last_names.to_lowercase(), a.first_names.to_lowercase())
                .cmp(&(b.last_names.to_lowercase(), b.first_names.to_lowercase()))
        });
        Ok(rows)
    }

    /// Write the member directory to an absolute `file`. Returns the row count.
    pub fn export(
        store: &mut DocumentStore,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!("output file path must be absolute: {}", file)));
        }

        let rows = Self::directory(store)?;
        if rows.is_empty() {
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => write_csv(path, &rows)?,
            ExportFormat::Json => write_json(path, &rows)?,
        }

        audit(
            store.conn(),
            "export",
            &path.to_string_lossy(),
            &format!("{} members as {}", rows.len(), format.as_str()),
        );
        success(format!("{} export completed: {}", format.as_str().to_uppercase(), path.display()));
        Ok(rows.len())
    }

    /// Load a JSON array of documents into `collection`. An `id` key keeps
    /// the original document id; documents whose id already exists are skipped.
    pub fn import(
        store: &mut DocumentStore,
        collection: Collection,
        file: &Path,
    ) -> AppResult<ImportReport> {
        let raw = fs::read_to_string(file)?;
        let docs = match serde_json::from_str::<Value>(&raw)? {
            Value::Array(items) => items,
            _ => {
                return Err(AppError::InvalidInput(
                    "import file must contain a JSON array of objects".into(),
                ));
            }
        };

        let mut report = ImportReport::default();

        for doc in docs {
            let Value::Object(mut obj) = doc else {
                report.skipped += 1;
                continue;
            };

            match obj.remove("id") {
                Some(Value::String(id)) => {
                    if store.get_by_id(collection, &id)?.is_some() {
                        report.skipped += 1;
                        continue;
                    }
                    store.add_with_id(collection, &id, Value::Object(obj))?;
                }
                _ => {
                    store.add(collection, Value::Object(obj))?;
                }
            }
            report.added += 1;
        }

        audit(
            store.conn(),
            "import",
            collection.name(),
            &format!("{} added, {} skipped from {}", report.added, report.skipped, file.display()),
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tmp(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rchurch-{}-{}", std::process::id(), name))
    }

    fn seeded() -> DocumentStore {
        let mut s = DocumentStore::open_in_memory().unwrap();
        s.add(
            Collection::Personas,
            json!({"Nombres": "Luis", "Apellidos": "Mora", "Cedula": "02",
                   "PasswordHash": "pbkdf2-sha256$1$AA==$AA==", "Foto": "data:x"}),
        )
        .unwrap();
        s.add(
            Collection::Personas,
            json!({"Nombres": "Ana", "Apellidos": "Andrade", "Cedula": "01", "Email": "a@b.ec"}),
        )
        .unwrap();
        s
    }

    #[test]
    fn directory_is_sorted_and_has_no_secrets() {
        let mut s = seeded();
        let rows = ExportLogic::directory(&mut s).unwrap();
        assert_eq!(rows[0].last_names, "Andrade");

        let path = tmp("dir.json");
        ExportLogic::export(&mut s, ExportFormat::Json, &path.to_string_lossy(), true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("pbkdf2"));
        assert!(!text.contains("data:x"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut s = seeded();
        let path = tmp("dir.csv");
        let file = path.to_string_lossy();
        let n = ExportLogic::export(&mut s, ExportFormat::Csv, &file, true).unwrap();
        assert_eq!(n, 2);

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,national_id,first_names"));
        assert_eq!(lines.count(), 2);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn relative_export_path_is_rejected() {
        let mut s = seeded();
        assert!(matches!(
            ExportLogic::export(&mut s, ExportFormat::Csv, "out.csv", true),
            Err(AppError::Export(_))
        ));
    }

    #[test]
    fn import_keeps_ids_and_skips_existing() {
        let mut s = DocumentStore::open_in_memory().unwrap();
        let path = tmp("import.json");
        fs::write(
            &path,
            r#"[{"id": "fs-1", "Titulo": "a", "Fecha": "2025-01-01"},
                {"Titulo": "b", "Fecha": "2025-01-02"},
                "not an object"]"#,
        )
        .unwrap();

        let first = ExportLogic::import(&mut s, Collection::Noticias, &path).unwrap();
        assert_eq!(first, ImportReport { added: 2, skipped: 1 });
        assert!(s.get_by_id(Collection::Noticias, "fs-1").unwrap().is_some());

        let again = ExportLogic::import(&mut s, Collection::Noticias, &path).unwrap();
        assert_eq!(again.skipped, 2);
        let _ = fs::remove_file(path);
    }
}
