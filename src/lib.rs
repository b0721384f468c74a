// ABOUTME: Main library entry point for the Meridian auth core
// ABOUTME: Provides code/token issuance, verification challenges, and session guards
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

// Crate-level attributes:
// - deny(unsafe_code): nothing in this crate has any business being unsafe
#![deny(unsafe_code)]

//! # Meridian Auth Core
//!
//! Issues and validates the stateless authorization artifacts of the Meridian
//! identity platform (encrypted authorization codes and MAC-style bearer
//! tokens) and runs the session-bound verification challenges that gate
//! sensitive account operations: image captcha, email codes, and phone
//! codes.
//!
//! ## Protocol shape
//!
//! - **Authorization code**: AES-256-CFB-encrypted `{t, u, a}` JSON in a
//!   `hex(IV || ciphertext)` envelope, valid ten minutes by default.
//! - **Bearer token**: an encrypted `{c, s, t}` payload wrapping a fresh
//!   code, signed `enc & sha512_hex(enc || padding)`, valid fifteen days by
//!   default. The signature is checked before anything is decrypted.
//!
//! Both artifacts are stateless by design: possession within the window is
//! validity, and nothing revokes one early. There is no replay cache; callers
//! that need single-use exchange semantics must track consumed artifacts
//! themselves.
//!
//! ## Session state
//!
//! Session data is an explicit value ([`models::SessionRecord`]) the caller
//! loads, hands to the verification and guard functions as `&mut`, and
//! persists again through [`session_store::SessionStore`]. External effects
//! (mail, SMS, captcha rendering, user lookups) cross the trait seams in
//! [`external`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use meridian_auth::auth::AuthManager;
//! use meridian_auth::config::AuthConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AuthConfig::from_env()?;
//!     let auth = AuthManager::new(config.secrets);
//!
//!     let token = auth.generate_token("user-1", "app-1", 7);
//!     let grant = auth.read_token(&token)?;
//!     println!("token belongs to {}", grant.user_id);
//!
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────

/// Authorization code and bearer token protocol
pub mod auth;

/// Configuration management for secrets and verification settings
pub mod config;

/// Validity windows, protocol literals, and environment variable names
pub mod constants;

/// Envelope cipher, digest, CSPRNG, and password hashing primitives
pub mod crypto;

/// Closed error taxonomy with stable wire identifiers
pub mod errors;

/// Collaborator seams for mail, SMS, captcha rendering, and user lookups
pub mod external;

/// Session guards for login freshness and user-level checks
pub mod guards;

/// Structured logging configuration
pub mod logging;

/// Session records, challenges, and grant results
pub mod models;

/// Session persistence seam and in-memory implementation
pub mod session_store;

/// Verification challenge issuance, checking, and delivery
pub mod verification;

pub use auth::AuthManager;
pub use config::{AuthConfig, AuthSecrets, VerificationConfig};
pub use errors::{AuthError, AuthResult};
pub use models::{ChallengePurpose, CodeGrant, SessionRecord, TokenGrant};
pub use verification::VerificationManager;
