pub mod audio;
pub mod auth;
pub mod backup;
pub mod cert;
pub mod config;
pub mod contact;
pub mod db;
pub mod devotional;
pub mod event;
pub mod export;
pub mod init;
pub mod log;
pub mod news;
pub mod person;
pub mod push;
pub mod schedule;
pub mod social;

use crate::cli::context::Context;
use crate::core::content::ContentLogic;
use crate::errors::AppResult;
use crate::models::Collection;
use crate::ui::messages::{info, success};
use crate::utils::formatting::short_id;

/// Admin-only delete by id or id prefix, after a confirmation.
pub(crate) fn delete_confirmed(
    ctx: &mut Context,
    collection: Collection,
    key: &str,
    yes: bool,
) -> AppResult<()> {
    ctx.require_admin()?;
    let id = ctx.store.resolve_id(collection, key)?;
    if !ctx.confirm(&format!("Delete {} from {}?", short_id(&id), collection), yes) {
        info("Cancelled.");
        return Ok(());
    }
    ContentLogic::delete(&mut ctx.store, collection, &id)?;
    success(format!("Deleted {} from {}", short_id(&id), collection));
    Ok(())
}
