use crate::cli::context::Context;
use crate::cli::parser::Commands;
use crate::core::export::ExportLogic;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

/// `export` and `import`
pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    match cmd {
        Commands::Export {
            format,
            file,
            force,
        } => {
            ctx.require_admin()?;
            let n = ExportLogic::export(&mut ctx.store, *format, file, *force)?;
            if n == 0 {
                warning("No members found. Nothing to export.");
            }
        }
        Commands::Import { collection, file } => {
            ctx.require_admin()?;
            let report = ExportLogic::import(&mut ctx.store, *collection, Path::new(file))?;
            success(format!(
                "Imported {} document(s) into {} ({} skipped)",
                report.added, collection, report.skipped
            ));
        }
        _ => {}
    }
    Ok(())
}
