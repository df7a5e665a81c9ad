mod json_file_store;
mod memory_store;
mod session_store;
mod store_error;

pub mod session_keys;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use session_store::SessionStore;
pub use store_error::StoreError;
