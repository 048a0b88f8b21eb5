//! # In-Memory Contact Store
//!
//! Id assignment and insertion happen under a single write lock, so ids are
//! unique and strictly increasing even with concurrent requests.

use super::models::{ContactSubmission, NewContact};
use super::ContactStore;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, ContactSubmission>,
}

/// Process-local contact store. Contents are lost on restart.
#[derive(Debug)]
pub struct MemContactStore {
    inner: RwLock<Inner>,
}

impl MemContactStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemContactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactStore for MemContactStore {
    async fn create(&self, new: NewContact) -> Result<ContactSubmission> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let submission = new.into_submission(id, Utc::now());
        inner.records.insert(id, submission.clone());

        tracing::debug!(id, total = inner.records.len(), "[CONTACT] stored submission");
        Ok(submission)
    }

    async fn list(&self) -> Result<Vec<ContactSubmission>> {
        let inner = self.inner.read().await;
        Ok(inner.records.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<ContactSubmission>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }
}
