// ABOUTME: Outbound mail seam used to deliver email verification codes
// ABOUTME: Implementations resolve template ids and talk to the actual mail provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Mail delivery seam.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One outgoing verification mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Template id the provider resolves to a body.
    pub template: String,
    /// Template variables (`code`, `time`).
    pub vars: Value,
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message.
    ///
    /// `Ok(false)` means the provider accepted the call but reported the
    /// message undeliverable; callers treat it the same as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached at all.
    async fn send_email(&self, message: &EmailMessage) -> Result<bool>;
}
