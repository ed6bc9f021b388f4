//! Content, inbox, media and admin-session building blocks for the church
//! site service.

pub mod auth;
pub mod content;
pub mod events;
pub mod kv;
pub mod media;
pub mod messages;
