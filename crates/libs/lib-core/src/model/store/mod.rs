//! # Contact Store
//!
//! Storage seam for contact submissions.
//!
//! Handlers only ever see `Arc<dyn ContactStore>`; the server wires in
//! [`MemContactStore`] at startup. Records live for the life of the process.

// region: --- Modules
pub mod contact_store;
pub mod models;
// endregion: --- Modules

// region: --- Re-exports
pub use contact_store::MemContactStore;
pub use models::{ContactSubmission, NewContact};
// endregion: --- Re-exports

// region: --- Trait
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for contact submissions.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persist a validated submission, assigning the next id and creation time.
    async fn create(&self, new: NewContact) -> Result<ContactSubmission>;

    /// All submissions in id order.
    async fn list(&self) -> Result<Vec<ContactSubmission>>;

    /// Look up a submission by id.
    async fn get(&self, id: i64) -> Result<Option<ContactSubmission>>;
}
// endregion: --- Trait
