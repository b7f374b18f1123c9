use crate::core::auth::hash_secret;
use crate::core::welcome::WelcomeMailer;
use crate::db::log::audit;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::person::{Person, Role};
use crate::models::{Collection, Stored};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::Path;

/// Business logic for the `person` command.
pub struct PersonLogic;

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

fn photo_mime(path: &Path) -> AppResult<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        other => Err(AppError::InvalidInput(format!(
            "unsupported photo format '{}' (png, jpg, gif, webp)",
            other
        ))),
    }
}

/// Read an image file into an inline `data:` URI.
pub fn photo_data_uri(path: &Path) -> AppResult<String> {
    let mime = photo_mime(path)?;
    let bytes = fs::read(path)?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

impl PersonLogic {
    /// Any administrator on record? Without one, the first admin may be
    /// created without a session.
    pub fn admin_exists(store: &mut DocumentStore) -> AppResult<bool> {
        let admins = store.get_where(
            Collection::Personas,
            "Rol",
            &json!(Role::Administrator.to_db_str()),
        )?;
        Ok(!admins.is_empty())
    }

    pub fn find_by_national_id(
        store: &mut DocumentStore,
        national_id: &str,
    ) -> AppResult<Option<Stored<Person>>> {
        Ok(store
            .find_where_strict::<Person>("Cedula", &json!(national_id.trim()))?
            .into_iter()
            .next())
    }

    /// Resolve a member by national ID first, then by document id (prefix).
    pub fn resolve(store: &mut DocumentStore, key: &str) -> AppResult<Stored<Person>> {
        if let Some(p) = Self::find_by_national_id(store, key)? {
            return Ok(p);
        }
        let id = store.resolve_id(Collection::Personas, key)?;
        store.fetch::<Person>(&id)
    }

    fn ensure_unique(
        store: &mut DocumentStore,
        national_id: &str,
        except: Option<&str>,
    ) -> AppResult<()> {
        let taken = store
            .get_where(Collection::Personas, "Cedula", &json!(national_id))?
            .into_iter()
            .any(|d| Some(d.id.as_str()) != except);

        if taken {
            return Err(AppError::Duplicate(format!("member with ID {}", national_id)));
        }
        Ok(())
    }

    /// Register a member. The secret is hashed; the welcome mail is
    /// best effort.
    pub fn create(
        store: &mut DocumentStore,
        mut person: Person,
        secret: Option<&str>,
        iterations: u32,
        mailer: &mut dyn WelcomeMailer,
    ) -> AppResult<String> {
        person.national_id = person.national_id.trim().to_string();
        require("first names", &person.first_names)?;
        require("last names", &person.last_names)?;
        require("national ID", &person.national_id)?;

        Self::ensure_unique(store, &person.national_id, None)?;

        person.legacy_password = None;
        person.password_hash = match secret.filter(|s| !s.is_empty()) {
            Some(s) => Some(hash_secret(s, iterations)?),
            None => None,
        };

        let id = store.insert(&person)?;

        audit(
            store.conn(),
            "person_add",
            &person.national_id,
            &format!("{} ({})", person.display_name(), person.role.to_db_str()),
        );

        if let Some(email) = person.email.as_deref().filter(|e| !e.trim().is_empty())
            && let Err(e) = mailer.send(store, email.trim(), &person.display_name())
        {
            log::warn!("welcome mail to {} not queued: {}", email, e);
        }

        Ok(id)
    }

    /// Shallow-merge `patch` (document keys) into the member.
    /// A new secret replaces any stored one.
    pub fn update(
        store: &mut DocumentStore,
        id: &str,
        mut patch: Map<String, Value>,
        secret: Option<&str>,
        iterations: u32,
    ) -> AppResult<Stored<Person>> {
        let current = store
            .get_by_id(Collection::Personas, id)?
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", Collection::Personas, id)))?;

        if let Some(v) = patch.get("Cedula") {
            let cedula = v.as_str().unwrap_or_default().trim().to_string();
            require("national ID", &cedula)?;
            Self::ensure_unique(store, &cedula, Some(id))?;
            patch.insert("Cedula".into(), json!(cedula));
        }

        let rehashed = match secret.filter(|s| !s.is_empty()) {
            Some(s) => {
                patch.insert("PasswordHash".into(), json!(hash_secret(s, iterations)?));
                true
            }
            None => false,
        };

        // the merged document must still read as a Person
        let mut merged = current.data.as_object().cloned().unwrap_or_default();
        for (k, v) in &patch {
            merged.insert(k.clone(), v.clone());
        }
        let checked: Person = serde_json::from_value(Value::Object(merged))
            .map_err(|e| AppError::InvalidInput(format!("invalid member data: {}", e)))?;
        require("first names", &checked.first_names)?;
        require("last names", &checked.last_names)?;

        let fields: Vec<String> = patch.keys().filter(|k| *k != "PasswordHash").cloned().collect();
        store.update(Collection::Personas, id, Value::Object(patch))?;
        if rehashed {
            store.delete_field(Collection::Personas, id, "password")?;
        }

        audit(
            store.conn(),
            "person_edit",
            &checked.national_id,
            &format!("fields: {}", fields.join(", ")),
        );

        store.fetch::<Person>(id)
    }

    pub fn set_photo(store: &mut DocumentStore, id: &str, path: &Path) -> AppResult<()> {
        let uri = photo_data_uri(path)?;
        store.update(Collection::Personas, id, json!({ "Foto": uri }))?;
        audit(store.conn(), "person_photo", id, &path.display().to_string());
        Ok(())
    }

    pub fn remove_photo(store: &mut DocumentStore, id: &str) -> AppResult<()> {
        store.delete_field(Collection::Personas, id, "Foto")?;
        audit(store.conn(), "person_photo", id, "removed");
        Ok(())
    }

    pub fn delete(store: &mut DocumentStore, id: &str) -> AppResult<()> {
        let person = store.fetch::<Person>(id)?;
        store.delete(Collection::Personas, id)?;
        audit(
            store.conn(),
            "person_del",
            &person.data.national_id,
            &person.data.display_name(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{check_credentials, verify_secret};
    use crate::core::welcome::{NoMailer, OutboxMailer};
    use crate::models::outbox::OutboxMail;

    const ROUNDS: u32 = 1_000;

    fn ana() -> Person {
        Person {
            first_names: "Ana".into(),
            last_names: "Pérez".into(),
            national_id: "0101010101".into(),
            email: Some("ana@example.com".into()),
            ..Person::default()
        }
    }

    #[test]
    fn create_hashes_and_queues_welcome() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        let mut mailer = OutboxMailer::new("no-reply@x", "Iglesia");
        let id = PersonLogic::create(&mut store, ana(), Some("abcd"), ROUNDS, &mut mailer).unwrap();

        let p = store.fetch::<Person>(&id).unwrap();
        assert!(verify_secret("abcd", p.data.password_hash.as_deref().unwrap()));
        assert_eq!(store.list::<OutboxMail>().unwrap().len(), 1);
    }

    #[test]
    fn duplicate_national_id_is_rejected() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        PersonLogic::create(&mut store, ana(), None, ROUNDS, &mut NoMailer).unwrap();

        let mut other = ana();
        other.national_id = " 0101010101 ".into();
        assert!(matches!(
            PersonLogic::create(&mut store, other, None, ROUNDS, &mut NoMailer),
            Err(AppError::Duplicate(_))
        ));
    }

    #[test]
    fn edit_rechecks_uniqueness_and_rehashes() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        let a =
            PersonLogic::create(&mut store, ana(), Some("abcd"), ROUNDS, &mut NoMailer).unwrap();
        let mut luis = ana();
        luis.first_names = "Luis".into();
        luis.national_id = "0202".into();
        PersonLogic::create(&mut store, luis, None, ROUNDS, &mut NoMailer).unwrap();

        let mut clash = Map::new();
        clash.insert("Cedula".into(), json!("0202"));
        assert!(matches!(
            PersonLogic::update(&mut store, &a, clash, None, ROUNDS),
            Err(AppError::Duplicate(_))
        ));

        let mut patch = Map::new();
        patch.insert("Ciudad".into(), json!("Quito"));
        patch.insert("Cedula".into(), json!("0101010101"));
        let p = PersonLogic::update(&mut store, &a, patch, Some("nueva"), ROUNDS).unwrap();
        assert_eq!(p.data.city.as_deref(), Some("Quito"));

        assert!(check_credentials(&mut store, "0101010101", "nueva", ROUNDS).is_ok());
        assert!(matches!(
            check_credentials(&mut store, "0101010101", "abcd", ROUNDS),
            Err(AppError::InvalidCredential(_))
        ));
    }

    #[test]
    fn edit_cannot_break_the_document_shape() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        let a = PersonLogic::create(&mut store, ana(), None, ROUNDS, &mut NoMailer).unwrap();

        let mut patch = Map::new();
        patch.insert("BautizadoAgua".into(), json!("yes"));
        assert!(matches!(
            PersonLogic::update(&mut store, &a, patch, None, ROUNDS),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn photo_set_and_remove() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        let a = PersonLogic::create(&mut store, ana(), None, ROUNDS, &mut NoMailer).unwrap();

        let path = std::env::temp_dir().join(format!("rchurch-photo-{}.png", std::process::id()));
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        PersonLogic::set_photo(&mut store, &a, &path).unwrap();
        let p = store.fetch::<Person>(&a).unwrap();
        assert_eq!(p.data.photo.as_deref(), Some("data:image/png;base64,iVBORw=="));

        PersonLogic::remove_photo(&mut store, &a).unwrap();
        assert!(store.fetch::<Person>(&a).unwrap().data.photo.is_none());

        assert!(matches!(
            PersonLogic::set_photo(&mut store, &a, Path::new("photo.bmp")),
            Err(AppError::InvalidInput(_))
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn bootstrap_and_resolution() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        assert!(!PersonLogic::admin_exists(&mut store).unwrap());

        let mut admin = ana();
        admin.role = Role::Administrator;
        let id = PersonLogic::create(&mut store, admin, None, ROUNDS, &mut NoMailer).unwrap();
        assert!(PersonLogic::admin_exists(&mut store).unwrap());

        assert_eq!(PersonLogic::resolve(&mut store, "0101010101").unwrap().id, id);
        assert_eq!(PersonLogic::resolve(&mut store, &id[..8]).unwrap().id, id);

        PersonLogic::delete(&mut store, &id).unwrap();
        assert!(matches!(
            PersonLogic::resolve(&mut store, "0101010101"),
            Err(AppError::NotFound(_))
        ));
    }
}
