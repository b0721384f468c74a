// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides fixed secrets, stub collaborators, and artifact forging helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `meridian_auth`
//!
//! Secrets here are fixed strings so tests can forge artifacts with the
//! public primitives and know exactly what the managers will accept.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Mutex, Once};

use meridian_auth::auth::AuthManager;
use meridian_auth::config::{AuthSecrets, VerificationConfig};
use meridian_auth::crypto::{encrypt, sha512_hex};
use meridian_auth::external::{CaptchaRenderer, EmailMessage, Mailer, SmsSender, UserDirectory};
use meridian_auth::verification::VerificationManager;

/// Code secret every fixture manager is keyed on.
pub const CODE_SECRET: &str = "itest-code-secret";
/// Token secret every fixture manager is keyed on.
pub const TOKEN_SECRET: &str = "itest-token-secret";
/// Signature padding every fixture manager is keyed on.
pub const TOKEN_PADDING: &str = "itest-token-padding";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fixture secrets matching the `forge_*` helpers.
pub fn test_secrets() -> AuthSecrets {
    AuthSecrets::new(CODE_SECRET, TOKEN_SECRET, TOKEN_PADDING)
}

/// Auth manager keyed on the fixture secrets.
pub fn test_auth_manager() -> AuthManager {
    init_test_logging();
    AuthManager::new(test_secrets())
}

/// Verification manager with default settings.
pub fn test_verification_manager() -> VerificationManager {
    init_test_logging();
    VerificationManager::new(VerificationConfig::default())
}

/// Forge an authorization code with an arbitrary issuance timestamp.
pub fn forge_code_at(user_id: &str, app_id: &str, issued_at_ms: i64) -> String {
    let payload = json!({ "t": issued_at_ms, "u": user_id, "a": app_id });
    encrypt(&payload.to_string(), CODE_SECRET)
}

/// Forge a code envelope from raw payload JSON (for structural edge cases).
pub fn forge_code_payload(payload_json: &str) -> String {
    encrypt(payload_json, CODE_SECRET)
}

/// Forge a bearer token wrapping the given code string.
pub fn forge_token_wrapping(code: &str, state: i64) -> String {
    let payload = json!({ "c": code, "s": state, "t": "MAC-Token" });
    sign_token_segment(&encrypt(&payload.to_string(), TOKEN_SECRET))
}

/// Forge a token envelope from raw payload JSON (for structural edge cases).
pub fn forge_token_payload(payload_json: &str) -> String {
    sign_token_segment(&encrypt(payload_json, TOKEN_SECRET))
}

/// Append the valid signature for an encrypted token segment.
pub fn sign_token_segment(enc: &str) -> String {
    format!("{enc}&{}", sha512_hex(&format!("{enc}{TOKEN_PADDING}")))
}

/// Mailer stub that records every message and answers a fixed verdict.
pub struct RecordingMailer {
    /// Messages seen so far.
    pub sent: Mutex<Vec<EmailMessage>>,
    verdict: Result<bool, String>,
}

impl RecordingMailer {
    /// Mailer that accepts everything.
    pub fn accepting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            verdict: Ok(true),
        }
    }

    /// Mailer whose provider reports every message undeliverable.
    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            verdict: Ok(false),
        }
    }

    /// Mailer whose provider is unreachable.
    pub fn unreachable() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            verdict: Err("smtp relay offline".into()),
        }
    }

    /// Messages recorded so far.
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_email(&self, message: &EmailMessage) -> Result<bool> {
        self.sent.lock().unwrap().push(message.clone());
        match &self.verdict {
            Ok(accepted) => Ok(*accepted),
            Err(reason) => Err(anyhow!(reason.clone())),
        }
    }
}

/// SMS stub that records deliveries and answers a fixed verdict.
pub struct RecordingSms {
    /// `(phone, vars)` pairs seen so far.
    pub sent: Mutex<Vec<(String, serde_json::Value)>>,
    verdict: Result<bool, String>,
}

impl RecordingSms {
    /// Gateway that accepts everything.
    pub fn accepting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            verdict: Ok(true),
        }
    }

    /// Gateway that reports every message undeliverable.
    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            verdict: Ok(false),
        }
    }

    /// Deliveries recorded so far.
    pub fn deliveries(&self) -> Vec<(String, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send_sms(&self, phone: &str, vars: serde_json::Value) -> Result<bool> {
        self.sent.lock().unwrap().push((phone.into(), vars));
        match &self.verdict {
            Ok(accepted) => Ok(*accepted),
            Err(reason) => Err(anyhow!(reason.clone())),
        }
    }
}

/// Renderer stub that wraps the digits in a recognizable data URI.
pub struct StubRenderer;

impl CaptchaRenderer for StubRenderer {
    fn render(&self, digits: &str) -> String {
        format!("data:image/png;base64,stub-{digits}")
    }
}

/// Directory stub answering a fixed level for every user.
pub struct FixedLevelDirectory(pub i32);

#[async_trait]
impl UserDirectory for FixedLevelDirectory {
    async fn level_by_id(&self, _user_id: &str) -> Result<i32> {
        Ok(self.0)
    }
}
