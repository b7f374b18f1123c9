use crate::db::log::audit;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{ask_confirmation, info, success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally zipped.
    /// Returns the path written, or None when the user declined to overwrite.
    pub fn backup(
        store: &DocumentStore,
        db_path: &str,
        dest_file: &str,
        compress: bool,
        assume_yes: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("database {}", src.display())));
        }
        if !dest.is_absolute() {
            return Err(AppError::InvalidInput(format!(
                "backup destination must be an absolute path: {}",
                dest.display()
            )));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let question = format!("The file '{}' already exists. Overwrite?", dest.display());
        if dest.exists() && !assume_yes && !ask_confirmation(&question) {
            info("Backup cancelled.");
            return Ok(None);
        }

        fs::copy(src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        let final_path = if compress {
            let zipped = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Failed to remove uncompressed backup: {}", e));
            }
            zipped
        } else {
            dest.to_path_buf()
        };

        audit(
            store.conn(),
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(Some(final_path))
    }
}

fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rchurch.sqlite".to_string());

    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    success(format!("Compressed: {}", zip_path.display()));
    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_copies_and_zips() {
        let dir = std::env::temp_dir().join(format!("rchurch-backup-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let db = dir.join("src.sqlite");
        let db_str = db.to_string_lossy().to_string();
        let store = DocumentStore::open(&db_str).unwrap();

        let plain = dir.join("copy.sqlite");
        let out = BackupLogic::backup(&store, &db_str, &plain.to_string_lossy(), false, true)
            .unwrap()
            .unwrap();
        assert!(out.exists());

        let zipped = BackupLogic::backup(&store, &db_str, &plain.to_string_lossy(), true, true)
            .unwrap()
            .unwrap();
        assert_eq!(zipped.extension().unwrap(), "zip");
        assert!(zipped.exists());
        assert!(!plain.exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn relative_destinations_are_rejected() {
        let dir = std::env::temp_dir().join(format!("rchurch-backup-rel-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let db = dir.join("src.sqlite").to_string_lossy().to_string();
        let store = DocumentStore::open(&db).unwrap();

        assert!(matches!(
            BackupLogic::backup(&store, &db, "relative.sqlite", false, true),
            Err(AppError::InvalidInput(_))
        ));
        let _ = fs::remove_dir_all(dir);
    }
}
