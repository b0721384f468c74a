// ABOUTME: Outbound SMS seam used to deliver phone verification codes
// ABOUTME: Implementations talk to the actual SMS gateway
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! SMS delivery seam.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Outbound SMS transport.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Deliver the verification code in `vars` to `phone`.
    ///
    /// `Ok(false)` means the gateway reported the message undeliverable;
    /// callers treat it the same as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway cannot be reached at all.
    async fn send_sms(&self, phone: &str, vars: Value) -> Result<bool>;
}
