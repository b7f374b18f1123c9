//! What a command handler works with: configuration, the open store, the
//! session and the request generation. One per process, or one per
//! interactive shell.

use crate::config::Config;
use crate::core::auth::check_credentials;
use crate::core::generation::Generation;
use crate::core::people::PersonLogic;
use crate::core::session::{Session, SessionStore};
use crate::db::cache::Change;
use crate::db::log::audit;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::Collection;
use crate::models::person::Person;
use crate::ui::messages::{ask_confirmation, prompt_secret};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Context {
    pub cfg: Config,
    pub store: DocumentStore,
    pub session: SessionStore,
    pub generation: Generation,
    pending: Rc<RefCell<Vec<Change>>>,
}

impl Context {
    /// One-shot context: no cache, the process ends after one command.
    pub fn open(cfg: Config) -> AppResult<Self> {
        let store = DocumentStore::open(&cfg.database)?;
        Ok(Self::with_store(cfg, store))
    }

    fn with_store(cfg: Config, store: DocumentStore) -> Self {
        Self {
            cfg,
            store,
            session: SessionStore::new(),
            generation: Generation::new(),
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Long-lived context for the shell: cached reads, and member changes
    /// are watched so the session follows edits and deletions.
    pub fn open_interactive(cfg: Config) -> AppResult<Self> {
        let store = DocumentStore::open(&cfg.database)?.with_cache();
        let mut ctx = Self::with_store(cfg, store);

        let sink = Rc::clone(&ctx.pending);
        ctx.store.subscribe(
            Some(Collection::Personas),
            Box::new(move |c: &Change| sink.borrow_mut().push(c.clone())),
        );
        Ok(ctx)
    }

    /// Check `national_id` + secret and start a session. The secret is
    /// prompted for when not given.
    pub fn authenticate(&mut self, national_id: &str, secret: Option<&str>) -> AppResult<&Session> {
        let secret = match secret {
            Some(s) => s.to_string(),
            None => prompt_secret("Secret")?,
        };

        let result = check_credentials(
            &mut self.store,
            national_id,
            &secret,
            self.cfg.kdf_iterations,
        );
        let profile = match result {
            Ok(p) => p,
            Err(e) => {
                audit(self.store.conn(), "login_failed", national_id.trim(), &e.to_string());
                return Err(e);
            }
        };

        audit(self.store.conn(), "login", &profile.national_id, &profile.display_name);
        Ok(self.session.login(profile))
    }

    pub fn require_login(&self) -> AppResult<&Session> {
        self.session.require_login()
    }

    pub fn require_admin(&self) -> AppResult<&Session> {
        self.session.require_admin()
    }

    /// Admin session, or no administrator exists yet (first setup).
    /// Returns true in the second case.
    pub fn require_admin_or_bootstrap(&mut self) -> AppResult<bool> {
        if self.session.require_admin().is_ok() {
            return Ok(false);
        }
        if !PersonLogic::admin_exists(&mut self.store)? {
            return Ok(true);
        }
        self.session.require_admin().map(|_| false)
    }

    /// Apply member changes seen since the last call to the session.
    pub fn sync_session(&mut self) -> AppResult<()> {
        let changes: Vec<Change> = self.pending.borrow_mut().drain(..).collect();

        let Some(current) = self.session.current().map(|s| s.profile.person_id.clone()) else {
            return Ok(());
        };

        if changes.iter().any(|c| c.id == current) {
            let person = match self.store.fetch::<Person>(&current) {
                Ok(p) => Some(p.data),
                Err(AppError::NotFound(_)) => None,
                Err(e) => return Err(e),
            };
            self.session.refresh(&current, person.as_ref());
        }
        Ok(())
    }

    /// `--yes` or an interactive "y".
    pub fn confirm(&self, prompt: &str, yes: bool) -> bool {
        yes || ask_confirmation(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::welcome::NoMailer;
    use crate::models::person::Role;
    use serde_json::Map;

    fn ctx() -> Context {
        let dir = std::env::temp_dir().join(format!(
            "rchurch-ctx-{}-{}",
            std::process::id(),
            uuid::Uuid::new_v4()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let cfg = Config {
            database: dir.join("ctx.sqlite").to_string_lossy().to_string(),
            kdf_iterations: 1_000,
            ..Config::default()
        };
        Context::open_interactive(cfg).unwrap()
    }

    #[test]
    fn bootstrap_only_until_an_admin_exists() {
        let mut c = ctx();
        assert!(c.require_admin_or_bootstrap().unwrap());

        let admin = Person {
            first_names: "Ana".into(),
            last_names: "Pérez".into(),
            national_id: "01".into(),
            role: Role::Administrator,
            ..Person::default()
        };
        PersonLogic::create(&mut c.store, admin, Some("abcd"), 1_000, &mut NoMailer).unwrap();

        assert!(matches!(
            c.require_admin_or_bootstrap(),
            Err(AppError::Unauthorized(_))
        ));
        c.authenticate("01", Some("abcd")).unwrap();
        assert!(!c.require_admin_or_bootstrap().unwrap());
    }

    #[test]
    fn session_follows_member_edits() {
        let mut c = ctx();
        let p = Person {
            first_names: "Luis".into(),
            last_names: "Mora".into(),
            national_id: "02".into(),
            ..Person::default()
        };
        let id = PersonLogic::create(&mut c.store, p, Some("x"), 1_000, &mut NoMailer).unwrap();
        c.authenticate("02", Some("x")).unwrap();

        let mut patch = Map::new();
        patch.insert("Rol".into(), serde_json::json!("Administrador"));
        PersonLogic::update(&mut c.store, &id, patch, None, 1_000).unwrap();
        c.sync_session().unwrap();
        assert!(c.require_admin().is_ok());

        PersonLogic::delete(&mut c.store, &id).unwrap();
        c.sync_session().unwrap();
        assert!(c.require_login().is_err());
    }
}
