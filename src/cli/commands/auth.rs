use crate::cli::context::Context;
use crate::cli::parser::Commands;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::or_dash;

/// `login`, `logout` and `whoami`
pub fn handle(cmd: &Commands, ctx: &mut Context, secret: Option<&str>) -> AppResult<()> {
    match cmd {
        Commands::Login { national_id } => {
            let session = ctx.authenticate(national_id, secret)?;
            success(format!("Welcome, {}", session.profile.display_name));
            print_session(session);
        }
        Commands::Logout => match ctx.session.logout() {
            Some(s) => success(format!("Session closed for {}", s.profile.display_name)),
            None => info("No active session."),
        },
        Commands::Whoami => match ctx.session.current() {
            Some(s) => print_session(s),
            None => info("Not logged in."),
        },
        _ => {}
    }
    Ok(())
}

fn print_session(s: &Session) {
    let p = &s.profile;
    println!("  Name     : {}", p.display_name);
    println!("  ID       : {}", p.national_id);
    println!("  Role     : {}", p.role.label());
    println!("  Position : {}", or_dash(&p.church_role));
    println!("  Since    : {}", s.started_at.format("%Y-%m-%d %H:%M"));
}
