// ABOUTME: User directory seam exposing the persisted per-user permission level
// ABOUTME: Backed by whatever store owns user records in the embedding service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! User directory seam.

use anyhow::Result;
use async_trait::async_trait;

/// Read-only view of user records, as much of it as the guards need.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Permission level of the user, higher meaning more privileged.
    ///
    /// # Errors
    ///
    /// Returns an error when the user does not exist or the store cannot be
    /// reached.
    async fn level_by_id(&self, user_id: &str) -> Result<i32>;
}
