use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{AudioCmd, Commands};
use crate::core::content::ContentLogic;
use crate::errors::{AppError, AppResult};
use crate::models::audio::AudioResource;
use crate::models::{Collection, Record};
use crate::ui::messages::{header, success, warning};
use crate::utils::formatting::short_id;
use crate::utils::table::{Column, Table};
use chrono::Local;

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Audio { action } = cmd else {
        return Ok(());
    };

    match action {
        AudioCmd::Add {
            name,
            description,
            category,
            url,
        } => {
            ctx.require_admin()?;
            let url = url.trim();
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("audio name is required".into()));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::InvalidInput(format!("not an http(s) URL: {}", url)));
            }

            let audio = AudioResource {
                name: name.trim().to_string(),
                description: description.trim().to_string(),
                category: *category,
                url: url.to_string(),
                uploaded_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            };
            let id = ContentLogic::add(
                &mut ctx.store,
                AudioResource::COLLECTION,
                &audio,
                &format!("{} [{}]", audio.name, category.label()),
            )?;
            success(format!("Audio '{}' added (id {})", audio.name, short_id(&id)));
        }
        AudioCmd::List { category } => {
            let items = ContentLogic::audios(&mut ctx.store, *category)?;
            if items.is_empty() {
                warning("No audio resources.");
                return Ok(());
            }
            header("Audio");
            let mut t = Table::new(vec![
                Column::new("ID", 8),
                Column::new("Category", 8),
                Column::new("Name", 30),
                Column::new("URL", 40),
            ]);
            for a in items {
                t.add_row(vec![
                    short_id(&a.id),
                    a.data.category.label().to_string(),
                    a.data.name,
                    a.data.url,
                ]);
            }
            print!("{}", t.render());
        }
        AudioCmd::Del { id, yes } => delete_confirmed(ctx, Collection::Audios, id, *yes)?,
    }
    Ok(())
}
