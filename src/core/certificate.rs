//! QR certificate payloads: issuing and validating.
//!
//! A payload is a JSON object with a `certificateType` discriminator
//! (`carnet`, `bautismo`, `matrimonio`) plus identity fields. Validation is
//! stateless, so a caller can go straight back to scanning after any outcome.
//!
//! Every certificate type is cross-checked against `Personas` by `Cedula`;
//! the stored photo is merged into the result since payloads carry no
//! binary data.

use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::Stored;
use crate::models::person::Person;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CertificateType {
    /// Membership card
    Carnet,
    /// Baptism
    Bautismo,
    /// Marriage
    Matrimonio,
}

impl CertificateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::Carnet => "carnet",
            CertificateType::Bautismo => "bautismo",
            CertificateType::Matrimonio => "matrimonio",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "carnet" => Some(CertificateType::Carnet),
            "bautismo" => Some(CertificateType::Bautismo),
            "matrimonio" => Some(CertificateType::Matrimonio),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CertificateType::Carnet => "Membership card",
            CertificateType::Bautismo => "Baptism certificate",
            CertificateType::Matrimonio => "Marriage certificate",
        }
    }
}

/// Identity fields common to every payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    #[serde(rename = "Cedula")]
    pub national_id: String,
    #[serde(rename = "Nombres")]
    pub first_names: String,
    #[serde(rename = "Apellidos")]
    pub last_names: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct BaptismFields {
    #[serde(rename = "Ministro")]
    officiant: String,
    #[serde(rename = "FechaBautismo")]
    date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct MarriageFields {
    #[serde(rename = "Conyuge")]
    spouse: String,
    #[serde(rename = "FechaMatrimonio")]
    date: String,
}

/// Decoded payload before any store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificatePayload {
    Carnet(Holder),
    Bautismo {
        holder: Holder,
        officiant: String,
        date: String,
    },
    Matrimonio {
        holder: Holder,
        spouse: String,
        date: String,
    },
}

impl CertificatePayload {
    pub fn holder(&self) -> &Holder {
        match self {
            CertificatePayload::Carnet(h) => h,
            CertificatePayload::Bautismo { holder, .. } => holder,
            CertificatePayload::Matrimonio { holder, .. } => holder,
        }
    }

    pub fn kind(&self) -> CertificateType {
        match self {
            CertificatePayload::Carnet(_) => CertificateType::Carnet,
            CertificatePayload::Bautismo { .. } => CertificateType::Bautismo,
            CertificatePayload::Matrimonio { .. } => CertificateType::Matrimonio,
        }
    }
}

/// A payload that matched a stored member.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedCertificate {
    pub payload: CertificatePayload,
    pub person_id: String,
    pub photo: Option<String>,
    pub church_role: Option<String>,
    /// Payload fields that disagree with the stored record.
    pub mismatches: Vec<String>,
}

fn malformed(msg: impl Into<String>) -> AppError {
    AppError::MalformedPayload(msg.into())
}

/// Decode and classify a raw scan (steps 1 and 2, no store access).
pub fn parse_payload(raw: &str) -> AppResult<CertificatePayload> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| malformed(e.to_string()))?;

    let tag = value
        .as_object()
        .ok_or_else(|| malformed("payload is not a JSON object"))?
        .get("certificateType")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing certificateType"))?;

    let kind =
        CertificateType::from_tag(tag).ok_or_else(|| AppError::UnsupportedType(tag.to_string()))?;

    let holder: Holder =
        serde_json::from_value(value.clone()).map_err(|e| malformed(e.to_string()))?;
    if holder.national_id.trim().is_empty() {
        return Err(malformed("empty Cedula"));
    }

    Ok(match kind {
        CertificateType::Carnet => CertificatePayload::Carnet(holder),
        CertificateType::Bautismo => {
            let f: BaptismFields =
                serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
            CertificatePayload::Bautismo {
                holder,
                officiant: f.officiant,
                date: f.date,
            }
        }
        CertificateType::Matrimonio => {
            let f: MarriageFields =
                serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
            CertificatePayload::Matrimonio {
                holder,
                spouse: f.spouse,
                date: f.date,
            }
        }
    })
}

fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn mismatches(payload: &CertificatePayload, p: &Person) -> Vec<String> {
    let mut out = Vec::new();
    let h = payload.holder();

    if !same(&h.first_names, &p.first_names) {
        out.push("Nombres".to_string());
    }
    if !same(&h.last_names, &p.last_names) {
        out.push("Apellidos".to_string());
    }

    match payload {
        CertificatePayload::Carnet(_) => {}
        CertificatePayload::Bautismo { officiant, date, .. } => {
            if !p.water_baptized {
                out.push("BautizadoAgua".to_string());
            }
            if p.baptism_officiant.as_deref().is_some_and(|o| !same(o, officiant)) {
                out.push("Ministro".to_string());
            }
            if p.baptism_date.as_deref().is_some_and(|d| !same(d, date)) {
                out.push("FechaBautismo".to_string());
            }
        }
        CertificatePayload::Matrimonio { spouse, date, .. } => {
            if !p.church_married {
                out.push("CasadoIglesia".to_string());
            }
            if p.spouse_name.as_deref().is_some_and(|s| !same(s, spouse)) {
                out.push("Conyuge".to_string());
            }
            if p.marriage_date.as_deref().is_some_and(|d| !same(d, date)) {
                out.push("FechaMatrimonio".to_string());
            }
        }
    }

    out
}

pub struct CertificateValidator;

impl CertificateValidator {
    /// Parse, classify and cross-check a raw scan.
    pub fn validate(store: &mut DocumentStore, raw: &str) -> AppResult<VerifiedCertificate> {
        let payload = parse_payload(raw)?;
        let id = payload.holder().national_id.trim().to_string();

        let matches = store.find_where_strict::<Person>("Cedula", &json!(id))?;
        let Some(found) = matches.into_iter().next() else {
            return Err(AppError::RecordNotFound(id));
        };

        let mismatches = mismatches(&payload, &found.data);
        if !mismatches.is_empty() {
            log::warn!(
                "{} certificate for {} disagrees with stored record on {:?}",
                payload.kind().as_str(),
                id,
                mismatches
            );
        }

        Ok(VerifiedCertificate {
            payload,
            person_id: found.id,
            photo: found.data.photo,
            church_role: found.data.church_role,
            mismatches,
        })
    }

    /// Build the JSON payload that goes into a member's QR code.
    pub fn issue(person: &Stored<Person>, kind: CertificateType) -> AppResult<String> {
        let p = &person.data;
        let mut payload = json!({
            "certificateType": kind.as_str(),
            "Cedula": p.national_id,
            "Nombres": p.first_names,
            "Apellidos": p.last_names,
        });

        let extra = match kind {
            CertificateType::Carnet => json!({}),
            CertificateType::Bautismo => {
                if !p.water_baptized {
                    return Err(AppError::InvalidInput(format!(
                        "{} is not registered as baptized",
                        p.display_name()
                    )));
                }
                json!({
                    "Ministro": p.baptism_officiant.clone().unwrap_or_default(),
                    "FechaBautismo": p.baptism_date.clone().unwrap_or_default(),
                })
            }
            CertificateType::Matrimonio => {
                if !p.church_married {
                    return Err(AppError::InvalidInput(format!(
                        "{} has no church marriage on record",
                        p.display_name()
                    )));
                }
                json!({
                    "Conyuge": p.spouse_name.clone().unwrap_or_default(),
                    "FechaMatrimonio": p.marriage_date.clone().unwrap_or_default(),
                })
            }
        };

        if let (Some(obj), Value::Object(more)) = (payload.as_object_mut(), extra) {
            obj.extend(more);
        }

        Ok(payload.to_string())
    }
}
