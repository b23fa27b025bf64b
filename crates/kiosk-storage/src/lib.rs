//! kiosk-storage
//!
//! Key/value persistence for a kiosk session. Thin stores (on disk or in
//! memory) underneath one [`SessionRepository`] that owns every read and
//! write of session data.

pub mod error;
pub mod session;
pub mod state;
pub mod store;

pub use error::StorageError;
pub use session::{QuestionnaireRecord, SessionRepository};
pub use store::{FileStore, KeyValueStore, MemoryStore};
