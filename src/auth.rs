// ABOUTME: Authorization code and MAC-style bearer token issuance and validation
// ABOUTME: Implements the encrypt-then-sign wire protocol and its exact validation order
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! # Code and Token Protocol
//!
//! An authorization code is an encrypted `{"t": issued_ms, "u": user,
//! "a": app}` payload; a bearer token wraps a fresh code in an encrypted
//! `{"c": code, "s": state, "t": "MAC-Token"}` payload and appends a keyed
//! SHA-512 signature over the encrypted segment. Both artifacts are
//! stateless: validity is decided entirely from the artifact plus the
//! secrets, so nothing revokes them before their window ends and a validated
//! artifact stays valid until then. Callers that need single-use semantics
//! layer their own replay tracking on top.
//!
//! Validation order is part of the contract: a token's signature is checked
//! before any decryption, structure before expiry. The embedded code is
//! checked against the token's window, not the much shorter code default.

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::config::AuthSecrets;
use crate::constants::protocol::{TOKEN_SEPARATOR, TOKEN_TYPE_TAG};
use crate::constants::windows::{CODE_MAX_AGE_MS, TOKEN_MAX_AGE_MS};
use crate::crypto::{decrypt, encrypt, sha512_hex};
use crate::errors::{AuthError, AuthResult};
use crate::models::{CodeGrant, TokenGrant};

/// Decrypted authorization-code payload.
///
/// Field presence is enforced by deserialization; zero/empty values are
/// rejected separately because they count as missing.
#[derive(Debug, Deserialize)]
struct CodePayload {
    #[serde(rename = "t")]
    issued_at_ms: i64,
    #[serde(rename = "u")]
    user_id: String,
    #[serde(rename = "a")]
    app_id: String,
}

/// Decrypted bearer-token payload.
#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(rename = "c")]
    code: String,
    #[serde(rename = "s")]
    state: i64,
    #[serde(rename = "t")]
    type_tag: String,
}

/// Issues and validates authorization codes and bearer tokens.
///
/// Stateless apart from the injected secrets; cheap to share behind an `Arc`
/// or to clone per task.
#[derive(Debug, Clone)]
pub struct AuthManager {
    secrets: AuthSecrets,
}

impl AuthManager {
    /// Manager keyed on the given secrets.
    #[must_use]
    pub const fn new(secrets: AuthSecrets) -> Self {
        Self { secrets }
    }

    /// Issue an authorization code binding `user_id` to `app_id`, stamped
    /// with the current time.
    #[must_use]
    pub fn generate_code(&self, user_id: &str, app_id: &str) -> String {
        let payload = json!({
            "t": Utc::now().timestamp_millis(),
            "u": user_id,
            "a": app_id,
        });
        encrypt(&payload.to_string(), self.secrets.code_secret())
    }

    /// Validate a code against the default ten-minute window.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCode`] when the code does not decrypt to a
    /// complete payload, [`AuthError::CodeExpired`] when it does but the
    /// window has passed.
    pub fn read_code(&self, code: &str) -> AuthResult<CodeGrant> {
        self.read_code_with_max_age(code, CODE_MAX_AGE_MS)
    }

    /// Validate a code against an explicit window.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_code`].
    pub fn read_code_with_max_age(&self, code: &str, max_age_ms: i64) -> AuthResult<CodeGrant> {
        let plain = decrypt(code, self.secrets.code_secret()).map_err(|err| {
            debug!(error = %err, "authorization code failed to decrypt");
            AuthError::InvalidCode
        })?;

        let payload: CodePayload = serde_json::from_str(&plain).map_err(|err| {
            debug!(error = %err, "authorization code payload is not a complete JSON object");
            AuthError::InvalidCode
        })?;

        // Zero and empty count as missing, same as absent fields
        if payload.issued_at_ms == 0 || payload.user_id.is_empty() || payload.app_id.is_empty() {
            return Err(AuthError::InvalidCode);
        }

        let age_ms = Utc::now().timestamp_millis() - payload.issued_at_ms;
        if age_ms >= max_age_ms {
            warn!(age_ms, max_age_ms, "authorization code past its window");
            return Err(AuthError::CodeExpired);
        }

        Ok(CodeGrant {
            user_id: payload.user_id,
            app_id: payload.app_id,
        })
    }

    /// Issue a bearer token for `user_id` and `app_id` carrying the caller's
    /// `state`.
    ///
    /// A `state` of zero produces a token [`Self::read_token`] will reject,
    /// because zero counts as missing on the validation side; callers pick
    /// nonzero state values.
    #[must_use]
    pub fn generate_token(&self, user_id: &str, app_id: &str, state: i64) -> String {
        let payload = json!({
            "c": self.generate_code(user_id, app_id),
            "s": state,
            "t": TOKEN_TYPE_TAG,
        });
        let enc = encrypt(&payload.to_string(), self.secrets.token_secret());
        let signature = sha512_hex(&format!("{enc}{}", self.secrets.token_padding()));
        format!("{enc}{TOKEN_SEPARATOR}{signature}")
    }

    /// Validate a token against the default fifteen-day window.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidToken`] for structural or signature failures,
    /// [`AuthError::InvalidCode`] / [`AuthError::CodeExpired`] propagated
    /// from the embedded code.
    pub fn read_token(&self, token: &str) -> AuthResult<TokenGrant> {
        self.read_token_with_max_age(token, TOKEN_MAX_AGE_MS)
    }

    /// Validate a token against an explicit window.
    ///
    /// The window applies to the embedded code's timestamp; the token carries
    /// no separate clock.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_token`].
    pub fn read_token_with_max_age(&self, token: &str, max_age_ms: i64) -> AuthResult<TokenGrant> {
        let mut segments = token.split(TOKEN_SEPARATOR);
        let (Some(enc), Some(signature), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            debug!("bearer token does not split into exactly two segments");
            return Err(AuthError::InvalidToken);
        };

        // Signature first: nothing gets decrypted unless the MAC holds
        let expected = sha512_hex(&format!("{enc}{}", self.secrets.token_padding()));
        let signature_ok: bool = expected.as_bytes().ct_eq(signature.as_bytes()).into();
        if !signature_ok {
            warn!("bearer token signature mismatch");
            return Err(AuthError::InvalidToken);
        }

        let plain = decrypt(enc, self.secrets.token_secret()).map_err(|err| {
            debug!(error = %err, "bearer token failed to decrypt");
            AuthError::InvalidToken
        })?;

        let payload: TokenPayload = serde_json::from_str(&plain).map_err(|err| {
            debug!(error = %err, "bearer token payload is not a complete JSON object");
            AuthError::InvalidToken
        })?;

        // Zero and empty count as missing, and the type tag is fixed
        if payload.code.is_empty() || payload.state == 0 || payload.type_tag != TOKEN_TYPE_TAG {
            return Err(AuthError::InvalidToken);
        }

        let grant = self.read_code_with_max_age(&payload.code, max_age_ms)?;
        Ok(TokenGrant {
            user_id: grant.user_id,
            app_id: grant.app_id,
            state: payload.state,
        })
    }

    /// Stable pseudonymous id for a user within one application.
    ///
    /// Deterministic, so the same pair always maps to the same id, and
    /// unlinkable across applications without the inputs.
    #[must_use]
    pub fn generate_open_id(&self, user_id: &str, app_id: &str) -> String {
        sha512_hex(&format!("{user_id}{app_id}"))
    }
}
