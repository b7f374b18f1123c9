use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{Commands, OrderArg, ScheduleCmd};
use crate::core::content::ContentLogic;
use crate::core::schedule::DayOrder;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::ScheduleKind;
use crate::ui::messages::{header, success, warning};
use crate::utils::colors::swatch;
use crate::utils::date::{parse_weekday, today_weekday, weekday_label};
use crate::utils::formatting::short_id;

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Schedule { action } = cmd else {
        return Ok(());
    };

    match action {
        ScheduleCmd::Add {
            kind,
            day,
            subject,
            start,
            end,
            color,
        } => {
            ctx.require_admin()?;
            let weekday = parse_weekday(day)
                .ok_or_else(|| AppError::InvalidInput(format!("unknown weekday: {}", day)))?;
            let id = ContentLogic::add_schedule(
                &mut ctx.store,
                *kind,
                weekday,
                subject,
                start,
                end,
                color.as_deref(),
            )?;
            success(format!(
                "Added to {} on {} (id {})",
                kind.label(),
                weekday_label(weekday).unwrap_or("?"),
                short_id(&id)
            ));
        }
        ScheduleCmd::List { kind, order } => {
            let order = resolve_order(ctx, *kind, *order);
            let week = ContentLogic::week(&mut ctx.store, *kind, order)?;

            if week.is_empty() {
                warning(format!("No {} scheduled.", kind.label()));
                return Ok(());
            }

            header(format!("Weekly {}", kind.label()));
            for day in week {
                println!("{}", day.label);
                if day.activities.is_empty() {
                    println!("    --");
                }
                for a in day.activities {
                    println!(
                        "    {} {}-{}  {}  [{}]",
                        swatch(&a.data.color),
                        a.data.start,
                        a.data.end,
                        a.data.subject,
                        short_id(&a.id)
                    );
                }
            }
        }
        ScheduleCmd::Del { kind, id, yes } => delete_confirmed(ctx, kind.collection(), id, *yes)?,
    }
    Ok(())
}

/// Activities follow the configured default, services start from today.
fn resolve_order(ctx: &Context, kind: ScheduleKind, arg: Option<OrderArg>) -> DayOrder {
    let today = today_weekday();
    match arg {
        Some(OrderArg::Fixed) => DayOrder::Fixed,
        Some(OrderArg::Today) => DayOrder::FromToday(today),
        None => match kind {
            ScheduleKind::Service => DayOrder::FromToday(today),
            ScheduleKind::Activity => {
                DayOrder::parse(&ctx.cfg.default_schedule_order, today).unwrap_or(DayOrder::Fixed)
            }
        },
    }
}
