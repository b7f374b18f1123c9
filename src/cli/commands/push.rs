use crate::cli::context::Context;
use crate::cli::parser::{Commands, PushCmd};
use crate::core::push::{
    DispatchReport, HttpPushGateway, PushDispatcher, PushGateway, PushMessage, PushOptions,
    register_token, registered_tokens, unregister_token,
};
use crate::db::log::audit;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success, warning};

/// Counts batches instead of posting them.
#[derive(Default)]
struct DryRunGateway {
    sizes: Vec<usize>,
}

impl PushGateway for DryRunGateway {
    fn send_batch(&mut self, batch: &[PushMessage]) -> AppResult<()> {
        self.sizes.push(batch.len());
        Ok(())
    }
}

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Push { action } = cmd else {
        return Ok(());
    };

    match action {
        PushCmd::Register { token } => {
            if register_token(&mut ctx.store, token)? {
                success("Device registered for notifications.");
            } else {
                info("Device was already registered.");
            }
        }
        PushCmd::Unregister { token } => match unregister_token(&mut ctx.store, token)? {
            0 => warning("Token not registered."),
            n => success(format!("Removed {} registration(s).", n)),
        },
        PushCmd::List => {
            ctx.require_admin()?;
            let tokens = registered_tokens(&mut ctx.store)?;
            if tokens.is_empty() {
                warning("No devices registered.");
                return Ok(());
            }
            header(format!("Registered devices ({})", tokens.len()));
            for t in tokens {
                println!("  {}", t);
            }
        }
        PushCmd::Send {
            title,
            body,
            dry_run,
        } => {
            ctx.require_admin()?;
            let tokens = registered_tokens(&mut ctx.store)?;
            let options = PushOptions::from_config(&ctx.cfg);
            let ticket = ctx.generation.ticket();

            if *dry_run {
                let mut gateway = DryRunGateway::default();
                let report = PushDispatcher::new(&mut gateway, options)
                    .dispatch(&tokens, title, body, &ticket)?;
                for (i, n) in gateway.sizes.iter().enumerate() {
                    println!("  batch {}: {} message(s)", i + 1, n);
                }
                print_report(&report, true);
                return Ok(());
            }

            let mut gateway = HttpPushGateway::from_config(&ctx.cfg)?;
            let mut dispatcher = PushDispatcher::new(&mut gateway, options);
            let report = match dispatcher.dispatch(&tokens, title, body, &ticket) {
                Ok(r) => r,
                Err(e) => {
                    // sent batches stay sent
                    if let AppError::PartialSend { sent, total, .. } = &e
                        && *sent > 0
                    {
                        audit(
                            ctx.store.conn(),
                            "push_send_partial",
                            title,
                            &format!("{} of {} batch(es) sent before failure", sent, total),
                        );
                    }
                    return Err(e);
                }
            };

            audit(
                ctx.store.conn(),
                "push_send",
                title,
                &format!(
                    "{} message(s) in {} batch(es) to {} device(s)",
                    report.messages_sent, report.batches_sent, report.tokens
                ),
            );
            print_report(&report, false);
        }
    }
    Ok(())
}

fn print_report(r: &DispatchReport, dry_run: bool) {
    if r.tokens == 0 {
        warning("No devices registered. Nothing sent.");
        return;
    }
    let verb = if dry_run { "Would send" } else { "Sent" };
    let msg = format!(
        "{} {} notification(s) in {} batch(es).",
        verb, r.messages_sent, r.batches_sent
    );
    if r.cancelled {
        warning(format!("{} Stopped early: interrupted.", msg));
    } else {
        success(msg);
    }
}
