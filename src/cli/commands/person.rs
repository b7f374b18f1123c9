use crate::cli::context::Context;
use crate::cli::parser::{Commands, PersonCmd, PersonFields};
use crate::core::people::PersonLogic;
use crate::core::welcome::{NoMailer, OutboxMailer, WelcomeMailer};
use crate::errors::{AppError, AppResult};
use crate::models::Stored;
use crate::models::person::{Person, Role};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::parse_date;
use crate::utils::formatting::{describe_photo, or_dash, short_id, yes_no};
use crate::utils::path::expand_tilde;
use crate::utils::table::{Column, Table};
use serde_json::{Map, Value, json};

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Person { action } = cmd else {
        return Ok(());
    };

    match action {
        PersonCmd::Add { fields, no_welcome } => add(ctx, fields, *no_welcome),
        PersonCmd::List { role, search } => {
            ctx.require_login()?;
            list(ctx, *role, search.as_deref())
        }
        PersonCmd::Show { key } => {
            ctx.require_login()?;
            let p = PersonLogic::resolve(&mut ctx.store, key)?;
            print_person(&p);
            Ok(())
        }
        PersonCmd::Edit { key, fields } => {
            ctx.require_admin()?;
            let p = PersonLogic::resolve(&mut ctx.store, key)?;
            let patch = to_patch(fields)?;
            if patch.is_empty() && fields.password.is_none() {
                info("Nothing to change.");
                return Ok(());
            }
            let updated = PersonLogic::update(
                &mut ctx.store,
                &p.id,
                patch,
                fields.password.as_deref(),
                ctx.cfg.kdf_iterations,
            )?;
            success(format!("Member {} updated", updated.data.display_name()));
            Ok(())
        }
        PersonCmd::Photo { key, set, remove } => {
            ctx.require_admin()?;
            let p = PersonLogic::resolve(&mut ctx.store, key)?;
            match (set, remove) {
                (Some(file), _) => {
                    PersonLogic::set_photo(&mut ctx.store, &p.id, &expand_tilde(file))?;
                    success(format!("Photo updated for {}", p.data.display_name()));
                }
                (None, true) => {
                    PersonLogic::remove_photo(&mut ctx.store, &p.id)?;
                    success(format!("Photo removed for {}", p.data.display_name()));
                }
                (None, false) => info("Use --set <FILE> or --remove."),
            }
            Ok(())
        }
        PersonCmd::Del { key, yes } => {
            ctx.require_admin()?;
            let p = PersonLogic::resolve(&mut ctx.store, key)?;
            let prompt = format!(
                "Delete member {} ({})? This cannot be undone.",
                p.data.display_name(),
                p.data.national_id
            );
            if !ctx.confirm(&prompt, *yes) {
                info("Cancelled.");
                return Ok(());
            }
            PersonLogic::delete(&mut ctx.store, &p.id)?;
            success(format!("Member {} deleted", p.data.display_name()));
            Ok(())
        }
    }
}

fn add(ctx: &mut Context, fields: &PersonFields, no_welcome: bool) -> AppResult<()> {
    let bootstrap = ctx.require_admin_or_bootstrap()?;
    let mut person = to_person(fields)?;

    if bootstrap {
        match fields.role {
            Some(Role::Member) => {
                return Err(AppError::Unauthorized(
                    "no administrator exists yet; the first member must be an administrator".into(),
                ));
            }
            _ => person.role = Role::Administrator,
        }
        if fields.password.as_deref().is_none_or(str::is_empty) {
            return Err(AppError::InvalidInput(
                "the first administrator needs a --password".into(),
            ));
        }
        warning("No administrator found: registering the first one.");
    }

    let mut outbox = OutboxMailer::new(&ctx.cfg.mail_sender, &ctx.cfg.church_name);
    let mut silent = NoMailer;
    let mailer: &mut dyn WelcomeMailer = if no_welcome { &mut silent } else { &mut outbox };

    let name = person.display_name();
    let id = PersonLogic::create(
        &mut ctx.store,
        person,
        fields.password.as_deref(),
        ctx.cfg.kdf_iterations,
        mailer,
    )?;

    success(format!("Member {} registered (id {})", name, short_id(&id)));
    Ok(())
}

fn list(ctx: &mut Context, role: Option<Role>, search: Option<&str>) -> AppResult<()> {
    let needle = search.map(|s| s.trim().to_lowercase());
    let mut people: Vec<Stored<Person>> = ctx
        .store
        .list::<Person>()?
        .into_iter()
        .filter(|p| role.is_none_or(|r| p.data.role == r))
        .filter(|p| {
            needle.as_deref().is_none_or(|n| {
                p.data.display_name().to_lowercase().contains(n) || p.data.national_id.contains(n)
            })
        })
        .collect();

    if people.is_empty() {
        warning("No members found.");
        return Ok(());
    }

    people.sort_by_key(|p| (p.data.last_names.to_lowercase(), p.data.first_names.to_lowercase()));

    header(format!("Members ({})", people.len()));
    let mut t = Table::new(vec![
        Column::new("ID", 8),
        Column::new("Cédula", 12),
        Column::new("Name", 28),
        Column::new("Role", 13),
        Column::new("Position", 16),
        Column::new("Mobile", 14),
    ]);
    for p in &people {
        t.add_row(vec![
            short_id(&p.id),
            p.data.national_id.clone(),
            p.data.display_name(),
            p.data.role.label().to_string(),
            or_dash(&p.data.church_role),
            or_dash(&p.data.mobile),
        ]);
    }
    print!("{}", t.render());
    Ok(())
}

fn print_person(p: &Stored<Person>) {
    let d = &p.data;
    header(d.display_name());
    println!("  Document id     : {}", p.id);
    println!("  Cédula          : {}", d.national_id);
    println!("  Role            : {}", d.role.label());
    println!("  Position        : {}", or_dash(&d.church_role));
    println!("  Birth date      : {}", or_dash(&d.birth_date));
    println!("  Sex             : {}", or_dash(&d.sex));
    println!("  Marital status  : {}", or_dash(&d.marital_status));
    println!("  Spouse          : {}", or_dash(&d.spouse_name));
    println!("  Country / city  : {} / {}", or_dash(&d.country), or_dash(&d.city));
    println!("  Address         : {}", or_dash(&d.address));
    println!("  Phone / mobile  : {} / {}", or_dash(&d.phone), or_dash(&d.mobile));
    println!("  Email           : {}", or_dash(&d.email));
    println!("  Water baptism   : {}", yes_no(d.water_baptized));
    if d.water_baptized {
        println!("    date          : {}", or_dash(&d.baptism_date));
        println!("    minister      : {}", or_dash(&d.baptism_officiant));
        println!("    church        : {}", or_dash(&d.baptism_church));
    }
    println!("  Spirit baptism  : {}", yes_no(d.spirit_baptized));
    println!("  Church marriage : {}", yes_no(d.church_married));
    if d.church_married {
        println!("    date          : {}", or_dash(&d.marriage_date));
        println!("    church        : {}", or_dash(&d.marriage_church));
    }
    println!("  Photo           : {}", describe_photo(&d.photo));
    let can_log_in = d.password_hash.is_some() || d.legacy_password.is_some();
    println!("  Can log in      : {}", yes_no(can_log_in));
    println!("  Registered      : {}", p.created_at);
}

fn checked_date(label: &str, value: &Option<String>) -> AppResult<Option<String>> {
    match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(|d| Some(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| AppError::InvalidDate(format!("{}: {}", label, s))),
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn to_person(f: &PersonFields) -> AppResult<Person> {
    Ok(Person {
        first_names: trimmed(&f.first_names).unwrap_or_default(),
        last_names: trimmed(&f.last_names).unwrap_or_default(),
        national_id: trimmed(&f.national_id).unwrap_or_default(),
        birth_date: checked_date("birth date", &f.birth_date)?,
        sex: trimmed(&f.sex),
        marital_status: trimmed(&f.marital_status),
        spouse_name: trimmed(&f.spouse),
        country: trimmed(&f.country),
        city: trimmed(&f.city),
        address: trimmed(&f.address),
        phone: trimmed(&f.phone),
        mobile: trimmed(&f.mobile),
        email: trimmed(&f.email),
        church_role: trimmed(&f.church_role),
        water_baptized: f.water_baptized.unwrap_or(false),
        baptism_date: checked_date("baptism date", &f.baptism_date)?,
        baptism_officiant: trimmed(&f.officiant),
        baptism_church: trimmed(&f.baptism_church),
        spirit_baptized: f.spirit_baptized.unwrap_or(false),
        church_married: f.church_married.unwrap_or(false),
        marriage_date: checked_date("marriage date", &f.marriage_date)?,
        marriage_church: trimmed(&f.marriage_church),
        role: f.role.unwrap_or_default(),
        ..Person::default()
    })
}

/// Only the flags that were given, under their document keys.
fn to_patch(f: &PersonFields) -> AppResult<Map<String, Value>> {
    let mut m = Map::new();

    let text = [
        ("Nombres", &f.first_names),
        ("Apellidos", &f.last_names),
        ("Cedula", &f.national_id),
        ("Sexo", &f.sex),
        ("EstadoCivil", &f.marital_status),
        ("NombreConyuge", &f.spouse),
        ("Pais", &f.country),
        ("Ciudad", &f.city),
        ("Direccion", &f.address),
        ("Telefono", &f.phone),
        ("Celular", &f.mobile),
        ("Email", &f.email),
        ("Cargo", &f.church_role),
        ("Ministro", &f.officiant),
        ("IglesiaBautismo", &f.baptism_church),
        ("IglesiaMatrimonio", &f.marriage_church),
    ];
    for (key, value) in text {
        if let Some(v) = value {
            m.insert(key.into(), json!(v.trim()));
        }
    }

    let dates = [
        ("FechaNacimiento", &f.birth_date),
        ("FechaBautismo", &f.baptism_date),
        ("FechaMatrimonio", &f.marriage_date),
    ];
    for (key, value) in dates {
        if let Some(d) = checked_date(key, value)? {
            m.insert(key.into(), json!(d));
        }
    }

    let flags = [
        ("BautizadoAgua", f.water_baptized),
        ("BautizadoEspiritu", f.spirit_baptized),
        ("CasadoIglesia", f.church_married),
    ];
    for (key, value) in flags {
        if let Some(b) = value {
            m.insert(key.into(), json!(b));
        }
    }

    if let Some(r) = f.role {
        m.insert("Rol".into(), json!(r.to_db_str()));
    }

    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_holds_only_given_flags() {
        let f = PersonFields {
            mobile: Some(" 0999 ".into()),
            water_baptized: Some(true),
            role: Some(Role::Administrator),
            ..PersonFields::default()
        };
        let m = to_patch(&f).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m["Celular"], "0999");
        assert_eq!(m["BautizadoAgua"], true);
        assert_eq!(m["Rol"], "Administrador");
    }

    #[test]
    fn bad_dates_are_rejected() {
        let f = PersonFields {
            birth_date: Some("31/12/1990".into()),
            ..PersonFields::default()
        };
        assert!(matches!(to_person(&f), Err(AppError::InvalidDate(_))));
        assert!(matches!(to_patch(&f), Err(AppError::InvalidDate(_))));
    }
}
