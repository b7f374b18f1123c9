use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{Commands, SocialCmd};
use crate::core::content::ContentLogic;
use crate::errors::{AppError, AppResult};
use crate::models::social::SocialLink;
use crate::models::{Collection, Record};
use crate::ui::messages::{header, success, warning};
use crate::utils::colors::swatch;
use crate::utils::formatting::short_id;

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Social { action } = cmd else {
        return Ok(());
    };

    match action {
        SocialCmd::Add {
            network,
            name,
            link,
        } => {
            ctx.require_admin()?;
            if name.trim().is_empty() || link.trim().is_empty() {
                return Err(AppError::InvalidInput("name and link are required".into()));
            }
            let s = SocialLink {
                network: *network,
                name: name.trim().to_string(),
                link: network.link_for(link),
            };
            let id = ContentLogic::add(&mut ctx.store, SocialLink::COLLECTION, &s, &s.link)?;
            success(format!("Link {} added (id {})", s.link, short_id(&id)));
        }
        SocialCmd::List => {
            let items = ctx.store.list::<SocialLink>()?;
            if items.is_empty() {
                warning("No social links.");
                return Ok(());
            }
            header("Social networks");
            for s in items {
                println!(
                    "{} {:<14} {:<24} {}  [{}]",
                    swatch(s.data.network.color()),
                    s.data.network.icon(),
                    s.data.name,
                    s.data.link,
                    short_id(&s.id)
                );
            }
        }
        SocialCmd::Del { id, yes } => delete_confirmed(ctx, Collection::RedesSociales, id, *yes)?,
    }
    Ok(())
}
