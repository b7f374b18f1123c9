use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// Every collection the document store knows about.
/// The string form is the collection name used by the mobile apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum Collection {
    Personas,
    Noticias,
    Horarios,
    HorariosCulto,
    Actividades,
    Contactos,
    RedesSociales,
    Audios,
    Mensajes,
    PushTokens,
    CorreosSalientes,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Personas,
        Collection::Noticias,
        Collection::Horarios,
        Collection::HorariosCulto,
        Collection::Actividades,
        Collection::Contactos,
        Collection::RedesSociales,
        Collection::Audios,
        Collection::Mensajes,
        Collection::PushTokens,
        Collection::CorreosSalientes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Personas => "Personas",
            Collection::Noticias => "Noticias",
            Collection::Horarios => "Horarios",
            Collection::HorariosCulto => "HorariosCulto",
            Collection::Actividades => "Actividades",
            Collection::Contactos => "Contactos",
            Collection::RedesSociales => "RedesSociales",
            Collection::Audios => "Audios",
            Collection::Mensajes => "mensajes",
            Collection::PushTokens => "PushTokens",
            Collection::CorreosSalientes => "CorreosSalientes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
