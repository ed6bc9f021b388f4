//! The site content document and the store that owns it.

pub mod defaults;
pub mod error;
pub mod merge;
pub mod migrate;
pub mod model;
pub mod patch;
pub mod sanitize;
pub mod store;

pub use defaults::{builtin, CURRENT_VERSION, STORAGE_KEY};
pub use error::ContentError;
pub use model::{
    BankInfo, ContactInfo, ContentDocument, Event, GalleryImage, GeneralInfo, LivePlatform,
    MultimediaConfig, PixKeyType, Sermon, Service, SocialLinks,
};
pub use patch::ContentPatch;
pub use store::ContentStore;
