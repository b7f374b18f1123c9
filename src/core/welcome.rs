//! Welcome mail sent when a member with an email address is registered.
//!
//! Delivery is fire-and-forget: the caller logs a failure and moves on.

use crate::db::store::DocumentStore;
use crate::errors::AppResult;
use crate::models::outbox::OutboxMail;

pub const WELCOME_SUBJECT: &str = "Bienvenido a la familia de la iglesia";

pub trait WelcomeMailer {
    fn send(&mut self, store: &mut DocumentStore, to: &str, display_name: &str) -> AppResult<()>;
}

/// Queues the mail into `CorreosSalientes` for the external relay.
pub struct OutboxMailer {
    pub sender: String,
    pub church_name: String,
}

impl OutboxMailer {
    pub fn new(sender: &str, church_name: &str) -> Self {
        Self {
            sender: sender.to_string(),
            church_name: church_name.to_string(),
        }
    }
}

impl WelcomeMailer for OutboxMailer {
    fn send(&mut self, store: &mut DocumentStore, to: &str, display_name: &str) -> AppResult<()> {
        store.insert(&OutboxMail {
            from: self.sender.clone(),
            to: to.to_string(),
            subject: WELCOME_SUBJECT.to_string(),
            html: welcome_html(&self.church_name, display_name),
            status: "pendiente".to_string(),
        })?;
        Ok(())
    }
}

/// Drops every mail (`person add --no-welcome`).
pub struct NoMailer;

impl WelcomeMailer for NoMailer {
    fn send(&mut self, _: &mut DocumentStore, _: &str, _: &str) -> AppResult<()> {
        Ok(())
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn welcome_html(church_name: &str, display_name: &str) -> String {
    format!(
        "<html><body style=\"font-family: sans-serif\">\
         <h2>¡Bienvenido, {name}!</h2>\
         <p>Nos alegra que formes parte de {church}.</p>\
         <p>Ya puedes ingresar a la aplicación con tu número de cédula.</p>\
         <p>Bendiciones.</p>\
         </body></html>",
        name = escape(display_name),
        church = escape(church_name)
    )
}
