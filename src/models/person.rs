use crate::models::{Collection, Record};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Role {
    #[serde(rename = "Administrador")]
    #[value(name = "admin")]
    Administrator,
    #[default]
    #[serde(rename = "Miembro")]
    #[value(name = "member")]
    Member,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Member => "Member",
        }
    }

    /// Convert enum → stored string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrador",
            Role::Member => "Miembro",
        }
    }
}

/// A church member or attendee (feligrés).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "Nombres", default)]
    pub first_names: String,
    #[serde(rename = "Apellidos", default)]
    pub last_names: String,
    #[serde(rename = "Cedula")]
    pub national_id: String,

    #[serde(rename = "FechaNacimiento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "Sexo", default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(rename = "EstadoCivil", default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(rename = "NombreConyuge", default, skip_serializing_if = "Option::is_none")]
    pub spouse_name: Option<String>,

    #[serde(rename = "Pais", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "Ciudad", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "Direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "Telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Celular", default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Cargo", default, skip_serializing_if = "Option::is_none")]
    pub church_role: Option<String>,

    #[serde(rename = "BautizadoAgua", default)]
    pub water_baptized: bool,
    #[serde(rename = "FechaBautismo", default, skip_serializing_if = "Option::is_none")]
    pub baptism_date: Option<String>,
    #[serde(rename = "Ministro", default, skip_serializing_if = "Option::is_none")]
    pub baptism_officiant: Option<String>,
    #[serde(rename = "IglesiaBautismo", default, skip_serializing_if = "Option::is_none")]
    pub baptism_church: Option<String>,
    #[serde(rename = "BautizadoEspiritu", default)]
    pub spirit_baptized: bool,

    #[serde(rename = "CasadoIglesia", default)]
    pub church_married: bool,
    #[serde(rename = "FechaMatrimonio", default, skip_serializing_if = "Option::is_none")]
    pub marriage_date: Option<String>,
    #[serde(rename = "IglesiaMatrimonio", default, skip_serializing_if = "Option::is_none")]
    pub marriage_church: Option<String>,

    #[serde(rename = "Rol", default)]
    pub role: Role,

    /// PBKDF2 hash, see core::auth
    #[serde(rename = "PasswordHash", default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Plaintext secret carried by imported documents until the next login.
    #[serde(rename = "password", default, skip_serializing_if = "Option::is_none")]
    pub legacy_password: Option<String>,

    /// Inline `data:` URI
    #[serde(rename = "Foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Record for Person {
    const COLLECTION: Collection = Collection::Personas;
}

impl Person {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_names.trim(), self.last_names.trim())
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_app_documents_with_missing_fields() {
        let doc = json!({
            "Nombres": "Ana",
            "Apellidos": "Pérez",
            "Cedula": "0101010101",
            "Rol": "Administrador",
            "password": "abcd"
        });
        let p: Person = serde_json::from_value(doc).unwrap();
        assert!(p.is_admin());
        assert_eq!(p.legacy_password.as_deref(), Some("abcd"));
        assert!(!p.water_baptized);
        assert_eq!(p.display_name(), "Ana Pérez");
    }

    #[test]
    fn skips_empty_optionals_when_written() {
        let p = Person {
            first_names: "Luis".into(),
            national_id: "1".into(),
            ..Person::default()
        };
        let v = serde_json::to_value(&p).unwrap();
        assert!(v.get("Foto").is_none());
        assert!(v.get("password").is_none());
        assert_eq!(v["Rol"], "Miembro");
    }
}
