//! Contact-form inbox.

pub mod inbox;
pub mod memory;
pub mod model;
pub mod postgres;

pub use inbox::{InboxError, MessageInbox};
pub use memory::MemoryInbox;
pub use model::{ContactMessage, MessageCategory, MessageValidationError, NewContactMessage};
pub use postgres::PgInbox;
