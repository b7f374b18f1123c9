use crate::cli::context::Context;
use crate::cli::parser::{CertCmd, Commands};
use crate::core::certificate::{CertificatePayload, CertificateValidator, VerifiedCertificate};
use crate::core::people::PersonLogic;
use crate::errors::{AppError, AppResult};
use crate::models::person::Role;
use crate::ui::messages::{error, header, info, success, warning};
use crate::utils::formatting::{describe_photo, or_dash};
use std::io::{self, BufRead};

pub fn handle(cmd: &Commands, ctx: &mut Context) -> AppResult<()> {
    let Commands::Cert { action } = cmd else {
        return Ok(());
    };

    match action {
        CertCmd::Issue { key, kind } => {
            let session = ctx.require_login()?;
            let is_admin = session.profile.role == Role::Administrator;
            let own_id = session.profile.person_id.clone();

            let person = PersonLogic::resolve(&mut ctx.store, key)?;
            if !is_admin && person.id != own_id {
                return Err(AppError::Unauthorized(
                    "members can only issue their own certificates".into(),
                ));
            }

            let payload = CertificateValidator::issue(&person, *kind)?;
            info(format!("{} for {}", kind.label(), person.data.display_name()));
            println!("{}", payload);
        }
        CertCmd::Verify { payload } => {
            ctx.require_login()?;
            let verified = CertificateValidator::validate(&mut ctx.store, payload)?;
            print_verified(&verified);
        }
        CertCmd::Scan => {
            ctx.require_login()?;
            info("Reading one payload per line. Ctrl-D to stop.");
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                // a bad scan never stops the scanner
                match CertificateValidator::validate(&mut ctx.store, &line) {
                    Ok(v) => print_verified(&v),
                    Err(e) => error(e),
                }
            }
        }
    }
    Ok(())
}

fn print_verified(v: &VerifiedCertificate) {
    let h = v.payload.holder();
    if v.mismatches.is_empty() {
        success(format!("Valid {}", v.payload.kind().label()));
    } else {
        warning(format!(
            "{} matches member {} but differs on: {}",
            v.payload.kind().label(),
            h.national_id,
            v.mismatches.join(", ")
        ));
    }

    header(format!("{} {}", h.first_names, h.last_names));
    println!("  Cédula    : {}", h.national_id);
    println!("  Position  : {}", or_dash(&v.church_role));
    match &v.payload {
        CertificatePayload::Carnet(_) => {}
        CertificatePayload::Bautismo { officiant, date, .. } => {
            println!("  Baptized  : {}", date);
            println!("  Minister  : {}", officiant);
        }
        CertificatePayload::Matrimonio { spouse, date, .. } => {
            println!("  Married   : {}", date);
            println!("  Spouse    : {}", spouse);
        }
    }
    println!("  Photo     : {}", describe_photo(&v.photo));
}
