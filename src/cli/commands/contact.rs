use crate::cli::commands::delete_confirmed;
use crate::cli::context::Context;
use crate::cli::parser::{Commands, ContactCmd};
use crate::core::content::ContentLogic;
use crate::errors::{AppError, AppResult};
use crate::models::contact::Contact;
use crate::models::{Collection, Record};
use crate::ui::messages::{header, success, warning};
use crate::utils::formatting::{or_dash, short_id};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Contact { action } = cmd else {
        return Ok(());
    };

    match action {
        ContactCmd::Add {
            name,
            role,
            phone,
            email,
        } => {
            ctx.require_admin()?;
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("contact name is required".into()));
            }
            if phone.is_none() && email.is_none() {
                return Err(AppError::InvalidInput("give at least --phone or --email".into()));
            }
            let c = Contact {
                name: name.trim().to_string(),
                position: role.trim().to_string(),
                phone: phone.as_ref().map(|s| s.trim().to_string()),
                email: email.as_ref().map(|s| s.trim().to_string()),
            };
            let id = ContentLogic::add(&mut ctx.store, Contact::COLLECTION, &c, &c.name)?;
            success(format!("Contact {} added (id {})", c.name, short_id(&id)));
        }
        ContactCmd::List => {
            let items = ctx.store.list::<Contact>()?;
            if items.is_empty() {
                warning("No contacts.");
                return Ok(());
            }
            header("Contacts");
            let mut t = Table::new(vec![
                Column::new("ID", 8),
                Column::new("Name", 24),
                Column::new("Position", 18),
                Column::new("Phone", 14),
                Column::new("Email", 28),
            ]);
            for c in items {
                t.add_row(vec![
                    short_id(&c.id),
                    c.data.name.clone(),
                    c.data.position.clone(),
                    or_dash(&c.data.phone),
                    or_dash(&c.data.email),
                ]);
            }
            print!("{}", t.render());
        }
        ContactCmd::Del { id, yes } => delete_confirmed(ctx, Collection::Contactos, id, *yes)?,
    }
    Ok(())
}
