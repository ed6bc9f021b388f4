use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The single record describing all editable site content.
///
/// Serialized with camelCase keys; this is the exact JSON persisted under the
/// content key and served to the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub version: u32,
    pub general: GeneralInfo,
    pub contact: ContactInfo,
    pub social: SocialLinks,
    pub bank: BankInfo,
    pub history: String,
    pub sermons: Vec<Sermon>,
    pub services: Vec<Service>,
    pub events: Vec<Event>,
    pub gallery: Vec<GalleryImage>,
    pub multimedia: MultimediaConfig,
}

impl ContentDocument {
    /// The featured weekly service shown on the weekly-service page.
    pub fn main_service(&self) -> Option<&Service> {
        self.services.iter().find(|s| s.day == MAIN_SERVICE_DAY)
    }
}

pub const MAIN_SERVICE_DAY: &str = "Sábado";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralInfo {
    pub church_name: String,
    pub pastor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pastor_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_audio_url: Option<String>,
    pub welcome_message: String,
    pub verse: String,
    pub verse_reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub address: String,
    pub city_state: String,
    pub whatsapp: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub instagram: String,
    pub facebook: String,
    pub youtube: String,
}

/// Kind of instant-payment key published for donations. Serialized with the
/// labels the admin panel offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PixKeyType {
    #[default]
    #[serde(rename = "CNPJ")]
    Cnpj,
    #[serde(rename = "CPF")]
    Cpf,
    #[serde(rename = "E-mail")]
    Email,
    #[serde(rename = "Telefone")]
    Phone,
    #[serde(rename = "Aleatória")]
    Random,
}

/// Case-insensitive; English names are accepted too. Unknown values map to
/// [`PixKeyType::Cnpj`].
impl FromStr for PixKeyType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "cpf" => PixKeyType::Cpf,
            "e-mail" | "email" => PixKeyType::Email,
            "telefone" | "phone" => PixKeyType::Phone,
            "aleatória" | "aleatoria" | "random" => PixKeyType::Random,
            _ => PixKeyType::Cnpj,
        })
    }
}

impl<'de> Deserialize<'de> for PixKeyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(raw) => raw.parse().unwrap_or_default(),
            _ => PixKeyType::default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankInfo {
    pub bank: String,
    pub agency: String,
    pub account: String,
    /// Payee name.
    pub favored: String,
    /// Payee tax id.
    pub cnpj: String,
    pub pix_key: String,
    /// Full copy-and-paste payment code, preferred over the bare key when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pix_code: Option<String>,
    pub pix_key_type: PixKeyType,
}

impl BankInfo {
    /// Payload encoded into the donation QR code.
    pub fn payment_payload(&self) -> &str {
        match self.pix_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code,
            _ => &self.pix_key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivePlatform {
    Youtube,
    Facebook,
    Instagram,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultimediaConfig {
    pub live_url: String,
    pub is_live_now: bool,
    pub live_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_live_url: Option<String>,
}

impl MultimediaConfig {
    /// Link for a live-stream button: the platform's own live URL, then the
    /// generic live URL, then the platform's social profile.
    pub fn live_url_for<'a>(&'a self, platform: LivePlatform, social: &'a SocialLinks) -> &'a str {
        let (specific, profile) = match platform {
            LivePlatform::Youtube => (&self.youtube_live_url, &social.youtube),
            LivePlatform::Facebook => (&self.facebook_live_url, &social.facebook),
            LivePlatform::Instagram => (&self.instagram_live_url, &social.instagram),
        };
        [specific.as_deref(), Some(self.live_url.as_str())]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .unwrap_or(profile.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sermon {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub preacher: String,
    pub date: String,
    pub thumbnail: String,
    pub duration: String,
    pub video_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub day: String,
    pub time: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub date: String,
    pub time: String,
    pub image: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub url: String,
    /// Caption.
    pub alt: String,
}

/// List entries addressed by a string id.
pub trait ListItem {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! list_item {
    ($($ty:ty),*) => {
        $(impl ListItem for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })*
    };
}

list_item!(Sermon, Service, Event, GalleryImage);

/// Ids arrive as strings or numbers; anything else reads as blank and is
/// replaced by the sanitiser.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
