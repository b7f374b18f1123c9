use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{Commands, EventCmd};
use crate::core::content::ContentLogic;
use crate::errors::{AppError, AppResult};
use crate::models::activity::OneTimeActivity;
use crate::models::{Collection, Record};
use crate::ui::messages::{header, success, warning};
use crate::utils::date::{parse_date, today};
use crate::utils::formatting::short_id;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Event { action } = cmd else {
        return Ok(());
    };

    match action {
        EventCmd::Add {
            name,
            place,
            start,
            end,
        } => {
            ctx.require_admin()?;
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("event name is required".into()));
            }
            let s = parse_date(start).ok_or_else(|| AppError::InvalidDate(start.clone()))?;
            let e = match end {
                Some(e) => parse_date(e).ok_or_else(|| AppError::InvalidDate(e.clone()))?,
                None => s,
            };
            if e < s {
                return Err(AppError::InvalidInput(format!(
                    "event ends ({}) before it starts ({})",
                    e, s
                )));
            }

            let event = OneTimeActivity::new(name.trim(), place.trim(), s, e);
            let id = ContentLogic::add(
                &mut ctx.store,
                OneTimeActivity::COLLECTION,
                &event,
                &format!("{} ({})", event.name, event.dates),
            )?;
            success(format!(
                "Event '{}' added for {} (id {})",
                event.name,
                event.dates,
                short_id(&id)
            ));
        }
        EventCmd::List { upcoming } => {
            let events = if *upcoming {
                ContentLogic::upcoming_events(&mut ctx.store, today())?
            } else {
                ContentLogic::events(&mut ctx.store)?
            };

            if events.is_empty() {
                warning("No events found.");
                return Ok(());
            }

            header("Events");
            let mut t = Table::new(vec![
                Column::new("ID", 8),
                Column::new("Dates", 23),
                Column::new("Name", 30),
                Column::new("Place", 24),
            ]);
            for ev in events {
                t.add_row(vec![short_id(&ev.id), ev.data.dates, ev.data.name, ev.data.place]);
            }
            print!("{}", t.render());
        }
        EventCmd::Del { id, yes } => delete_confirmed(ctx, Collection::Actividades, id, *yes)?,
    }
    Ok(())
}
