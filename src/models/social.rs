use crate::models::{Collection, Record};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SocialNetwork {
    Facebook,
    Instagram,
    #[serde(rename = "YouTube")]
    #[value(name = "youtube")]
    YouTube,
    #[serde(rename = "TikTok")]
    #[value(name = "tiktok")]
    TikTok,
    #[serde(rename = "WhatsApp")]
    #[value(name = "whatsapp")]
    WhatsApp,
    Twitter,
    Web,
    Email,
    #[serde(rename = "Telefono")]
    Phone,
}

impl SocialNetwork {
    /// Icon name used by the apps' icon set.
    pub fn icon(&self) -> &'static str {
        match self {
            SocialNetwork::Facebook => "logo-facebook",
            SocialNetwork::Instagram => "logo-instagram",
            SocialNetwork::YouTube => "logo-youtube",
            SocialNetwork::TikTok => "logo-tiktok",
            SocialNetwork::WhatsApp => "logo-whatsapp",
            SocialNetwork::Twitter => "logo-twitter",
            SocialNetwork::Web => "globe-outline",
            SocialNetwork::Email => "mail-outline",
            SocialNetwork::Phone => "call-outline",
        }
    }

    /// Brand color
    pub fn color(&self) -> &'static str {
        match self {
            SocialNetwork::Facebook => "#1877F2",
            SocialNetwork::Instagram => "#E4405F",
            SocialNetwork::YouTube => "#FF0000",
            SocialNetwork::TikTok => "#000000",
            SocialNetwork::WhatsApp => "#25D366",
            SocialNetwork::Twitter => "#1DA1F2",
            SocialNetwork::Web => "#4A5568",
            SocialNetwork::Email => "#D44638",
            SocialNetwork::Phone => "#34A853",
        }
    }

    /// Handle-only networks get a link built from the handle.
    pub fn link_for(&self, handle: &str) -> String {
        let h = handle.trim();
        if h.starts_with("http://") || h.starts_with("https://") {
            return h.to_string();
        }
        match self {
            SocialNetwork::WhatsApp => {
                let digits: String = h.chars().filter(|c| c.is_ascii_digit()).collect();
                format!("https://wa.me/{}", digits)
            }
            SocialNetwork::Email => format!("mailto:{}", h),
            SocialNetwork::Phone => format!("tel:{}", h),
            _ => h.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(rename = "Red")]
    pub network: SocialNetwork,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Enlace")]
    pub link: String,
}

impl Record for SocialLink {
    const COLLECTION: Collection = Collection::RedesSociales;
}
