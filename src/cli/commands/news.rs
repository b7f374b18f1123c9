use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{Commands, NewsCmd};
use crate::core::content::ContentLogic;
use crate::core::people::photo_data_uri;
use crate::errors::{AppError, AppResult};
use crate::models::news::NewsItem;
use crate::models::{Collection, Record};
use crate::ui::messages::{header, success, warning};
use crate::utils::date::{parse_date, today};
use crate::utils::formatting::short_id;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::News { action } = cmd else {
        return Ok(());
    };

    match action {
        NewsCmd::Add {
            title,
            description,
            date,
            photo,
        } => {
            ctx.require_admin()?;
            if title.trim().is_empty() {
                return Err(AppError::InvalidInput("news title is required".into()));
            }
            let date = match date {
                Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                None => today(),
            };
            let photo = match photo {
                Some(p) => Some(photo_data_uri(&expand_tilde(p))?),
                None => None,
            };

            let item = NewsItem {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                photo,
            };
            let id = ContentLogic::add(&mut ctx.store, NewsItem::COLLECTION, &item, &item.title)?;
            success(format!("News '{}' published (id {})", item.title, short_id(&id)));
        }
        NewsCmd::List => {
            let items = ContentLogic::news(&mut ctx.store)?;
            if items.is_empty() {
                warning("No news.");
                return Ok(());
            }
            header("News");
            for n in items {
                let pic = if n.data.photo.is_some() { " 🖼" } else { "" };
                println!("{}  {}{}  [{}]", n.data.date, n.data.title, pic, short_id(&n.id));
                if !n.data.description.is_empty() {
                    println!("    {}", n.data.description);
                }
            }
        }
        NewsCmd::Del { id, yes } => delete_confirmed(ctx, Collection::Noticias, id, *yes)?,
    }
    Ok(())
}
