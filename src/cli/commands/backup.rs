use crate::cli::context::Context;
use crate::cli::parser::Commands;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        yes,
    } = cmd
    {
        ctx.require_admin()?;
        BackupLogic::backup(&ctx.store, &ctx.cfg.database, file, *compress, *yes)?;
    }
    Ok(())
}
