// ABOUTME: Session persistence seam plus an in-memory implementation for tests and single-process use
// ABOUTME: Records are loaded, mutated as values, and written back; last write wins
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Session persistence.
//!
//! The verification and guard functions mutate a [`SessionRecord`] they are
//! handed; getting that record in and out of storage is the embedding
//! service's job, behind [`SessionStore`]. Two requests racing on one session
//! resolve by last write wins; the flows tolerate that (worst case a
//! challenge survives one extra check or a rate limit misfires once).

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::models::SessionRecord;

/// Keyed session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the record for a session id, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be reached.
    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    /// Write the record for a session id, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be reached.
    async fn save(&self, session_id: &str, record: &SessionRecord) -> Result<()>;

    /// Remove the record for a session id; removing a missing id is fine.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be reached.
    async fn delete(&self, session_id: &str) -> Result<()>;
}

/// Process-local [`SessionStore`] on a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<DashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions, for tests and metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.records.get(session_id).map(|entry| entry.clone()))
    }

    async fn save(&self, session_id: &str, record: &SessionRecord) -> Result<()> {
        self.records.insert(session_id.into(), record.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.records.remove(session_id);
        Ok(())
    }
}
