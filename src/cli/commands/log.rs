use crate::cli::context::Context;
use crate::cli::parser::Commands;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    if let Commands::Log {
        print,
        operation,
        last,
    } = cmd
    {
        if *print || operation.is_some() || last.is_some() {
            ctx.require_admin()?;
            LogLogic::print_log(&ctx.store, operation.as_deref(), *last)?;
        } else {
            info("Use --print to show the internal log.");
        }
    }
    Ok(())
}
