//! The compiled-in content document.
//!
//! Stored documents are reconciled against this one on load, and `reset`
//! falls back to it.

use super::model::{
    BankInfo, ContactInfo, ContentDocument, Event, GalleryImage, GeneralInfo, MultimediaConfig,
    PixKeyType, Sermon, Service, SocialLinks,
};

/// Version of the built-in document. Bump together with a new entry in
/// [`super::migrate::MIGRATIONS`].
pub const CURRENT_VERSION: u32 = 60;

/// Key the serialized document is persisted under.
pub const STORAGE_KEY: &str = "churchData";

/// Host of the stock-photo placeholder older documents shipped as hero image.
pub const PLACEHOLDER_IMAGE_HOST: &str = "unsplash";

/// Site-local hero in place of the stock photo older documents pointed at.
/// `backfill_hero_media` swaps placeholder heroes for it on upgrade.
const HERO_IMAGE: &str = "/media/hero/lion.jpg";

const HISTORY: &str = "<p>A Igreja Ministério Pleno Avivamento na Cidade de Bauru-SP nasceu após um tempo precioso com o Senhor. Ele nos direcionou a começar essa obra que a cada dia tem crescido em nossa cidade!</p>\n<p>Começamos em uma garagem com poucas pessoas e hoje estamos crescendo na Graça e no Conhecimento, com muitos sinais onde Deus tem manifestado sua glória entre nós!</p>\n<p>Buscamos os Dons Espirituais e acreditamos na manifestação do Poder de Deus na vida das pessoas.</p>";

/// Build the compiled-in document.
pub fn builtin() -> ContentDocument {
    ContentDocument {
        version: CURRENT_VERSION,
        general: GeneralInfo {
            church_name: "Ministério Pleno Avivamento".into(),
            pastor_name: "Ev. Wellington Villares".into(),
            pastor_image: Some("https://i.imgur.com/9239bd33.jpg".into()),
            hero_image: Some(HERO_IMAGE.into()),
            hero_video: Some(String::new()),
            background_audio_url: None,
            welcome_message: "Avivando Vidas, Transformando Destinos".into(),
            verse: "Ouvi, Senhor, a tua palavra, e temi; aviva, ó Senhor, a tua obra no meio dos anos, no meio dos anos a notifica; na ira lembra-te da misericórdia.".into(),
            verse_reference: "Habacuque 3:2".into(),
        },
        contact: ContactInfo {
            address: "Rua do Avivamento, 777 - Centro".into(),
            city_state: "Bauru - SP".into(),
            whatsapp: "(11) 98888-8888".into(),
            phone: "(14) 3333-3333".into(),
            email: "contato@avivamentopleno.com.br".into(),
            map_url: None,
        },
        social: SocialLinks {
            instagram: "https://instagram.com".into(),
            facebook: "https://facebook.com".into(),
            youtube: "https://youtube.com".into(),
        },
        bank: BankInfo {
            bank: "Banco do Brasil (001)".into(),
            agency: "1234-5".into(),
            account: "99999-X".into(),
            favored: "Min. Pleno Avivamento".into(),
            cnpj: "00.000.000/0001-00".into(),
            pix_key: "00.000.000/0001-00".into(),
            pix_code: None,
            pix_key_type: PixKeyType::Cnpj,
        },
        history: HISTORY.into(),
        sermons: vec![
            sermon("1", "O Poder da Perseverança", "Pr. Wellington Vilares", "10 Set 2023", 231, "45:20"),
            sermon("2", "Avivamento Genuíno", "Pr. Wellington Vilares", "03 Set 2023", 232, "52:10"),
            sermon("3", "Família no Altar", "Pra. Ana Vilares", "27 Ago 2023", 233, "38:45"),
        ],
        services: vec![
            service("1", "Sábado", "19:30h", "Culto de Avivamento"),
            service("2", "Domingo", "18:00h", "Culto da Família"),
            service("3", "Quarta-feira", "20:00h", "Culto de Oração"),
        ],
        events: vec![Event {
            id: "1".into(),
            title: "Conferência de Avivamento".into(),
            date: "15/11".into(),
            time: "19:30".into(),
            image: "https://picsum.photos/800/500".into(),
            description: "Três noites de louvor, palavra e oração.".into(),
            tag: Some("Evento".into()),
        }],
        gallery: vec![GalleryImage {
            id: "1".into(),
            url: "https://picsum.photos/id/1015/800/600".into(),
            alt: "Culto de Avivamento".into(),
        }],
        multimedia: MultimediaConfig {
            live_url: "https://youtube.com".into(),
            is_live_now: true,
            live_title: "Culto de Domingo - Ao Vivo".into(),
            youtube_live_url: None,
            facebook_live_url: None,
            instagram_live_url: None,
        },
    }
}

fn sermon(id: &str, title: &str, preacher: &str, date: &str, photo: u32, duration: &str) -> Sermon {
    Sermon {
        id: id.into(),
        title: title.into(),
        preacher: preacher.into(),
        date: date.into(),
        thumbnail: format!("https://picsum.photos/id/{photo}/600/400"),
        duration: duration.into(),
        video_url: String::new(),
    }
}

fn service(id: &str, day: &str, time: &str, name: &str) -> Service {
    Service {
        id: id.into(),
        day: day.into(),
        time: time.into(),
        name: name.into(),
    }
}
