//! Image uploads to object storage.

pub mod memory;
pub mod path;
pub mod store;
pub mod supabase;
pub mod upload;

pub use memory::MemoryObjectStore;
pub use path::{object_path, MediaFolder, ALLOWED_EXTENSIONS};
pub use store::{MediaError, ObjectBytes, ObjectStore};
pub use supabase::SupabaseStorage;
pub use upload::{upload_batch, upload_one, StoredObject, Upload, UploadFailure, UploadReport};
