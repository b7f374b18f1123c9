use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{Commands, DevotionalCmd, Lang};
use crate::core::content::ContentLogic;
use crate::errors::{AppError, AppResult};
use crate::models::Collection;
use crate::models::devotional::Devotional;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{parse_date, today};
use crate::utils::formatting::{bold, short_id};

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Devotional { action } = cmd else {
        return Ok(());
    };

    match action {
        DevotionalCmd::Add {
            title,
            reference_es,
            reference_en,
            text_es,
            text_en,
            day,
            month,
        } => {
            ctx.require_admin()?;
            let d = Devotional {
                title: title.trim().to_string(),
                reference_es: reference_es.trim().to_string(),
                reference_en: reference_en.trim().to_string(),
                body_es: text_es.trim().to_string(),
                body_en: text_en.trim().to_string(),
                day: *day,
                month: *month,
            };
            let id = ContentLogic::add_devotional(&mut ctx.store, &d)?;
            success(format!(
                "Message for {:02}/{:02} saved (id {})",
                d.day,
                d.month,
                short_id(&id)
            ));
        }
        DevotionalCmd::Today { lang, date } => {
            let date = match date {
                Some(s) => parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
                None => today(),
            };
            match ContentLogic::devotional_for(&mut ctx.store, date)? {
                Some(m) => print_message(&m.data, *lang),
                None => info(format!("No message for {}.", date.format("%d/%m"))),
            }
        }
        DevotionalCmd::List => {
            let items = ContentLogic::devotionals(&mut ctx.store)?;
            if items.is_empty() {
                warning("No devotional messages.");
                return Ok(());
            }
            header("Devotional messages");
            for m in items {
                println!(
                    "{:02}/{:02}  {}  ({})  [{}]",
                    m.data.day,
                    m.data.month,
                    m.data.title,
                    m.data.reference_es,
                    short_id(&m.id)
                );
            }
        }
        DevotionalCmd::Del { id, yes } => delete_confirmed(ctx, Collection::Mensajes, id, *yes)?,
    }
    Ok(())
}

/// English falls back to Spanish when no translation was stored.
fn print_message(d: &Devotional, lang: Lang) {
    let (reference, body) = match lang {
        Lang::En if !d.body_en.is_empty() => (&d.reference_en, &d.body_en),
        _ => (&d.reference_es, &d.body_es),
    };
    header(&d.title);
    println!("{}\n", bold(reference));
    println!("{}", body);
}
