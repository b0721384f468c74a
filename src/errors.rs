// ABOUTME: Closed error taxonomy for the code/token protocol and verification flows
// ABOUTME: Maps every failure to a stable wire identifier and an HTTP status
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! # Unified Error Handling
//!
//! Every failure a caller can observe from this crate is one of the variants
//! of [`AuthError`]. The set is closed on purpose: HTTP layers and clients
//! switch on the wire identifier returned by [`AuthError::kind`], so adding a
//! variant is a protocol change, not a refactor.
//!
//! Low-level envelope decode faults ([`CryptoError`]) never cross a public
//! protocol API; the protocol layer folds them into `invalid_code` /
//! `invalid_token` before they reach a caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type AuthResult<T> = Result<T, AuthError>;

/// Every caller-observable failure in the protocol and verification flows.
///
/// Wire identifiers (the serde names) are part of the external contract and
/// must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum AuthError {
    /// Authorization code failed structural or cryptographic validation.
    #[serde(rename = "invalid_code")]
    #[error("authorization code failed validation")]
    InvalidCode,

    /// Authorization code (or a channel verification code) is past its window.
    #[serde(rename = "timeout_code")]
    #[error("code is past its validity window")]
    CodeExpired,

    /// Bearer token failed structural or signature validation.
    #[serde(rename = "invalid_token")]
    #[error("bearer token failed validation")]
    InvalidToken,

    /// Login session is past its 24-hour non-remember window.
    #[serde(rename = "timeout_token")]
    #[error("login session expired")]
    TokenExpired,

    /// Submitted captcha digits do not match the issued challenge.
    #[serde(rename = "error_captcha")]
    #[error("captcha answer does not match")]
    CaptchaMismatch,

    /// Captcha challenge is missing or past its five-minute window.
    #[serde(rename = "timeout_captcha")]
    #[error("captcha challenge expired")]
    CaptchaExpired,

    /// Challenge exists but was issued for a different operation.
    #[serde(rename = "error_operator")]
    #[error("verification code was issued for a different operation")]
    OperatorMismatch,

    /// Submitted channel verification code does not match the issued one.
    #[serde(rename = "error_code")]
    #[error("verification code does not match")]
    CodeMismatch,

    /// A challenge was requested again within the 60-second resend window.
    #[serde(rename = "limit_time")]
    #[error("verification code requested too soon")]
    RateLimited,

    /// The mail or SMS collaborator reported a delivery failure.
    #[serde(rename = "send_fail")]
    #[error("verification code delivery failed")]
    DeliveryFailed,

    /// Candidate password does not match the stored verifier.
    #[serde(rename = "error_password")]
    #[error("password does not match")]
    PasswordMismatch,

    /// Authenticated user does not hold the required level.
    #[serde(rename = "permission_deny")]
    #[error("user level does not permit this operation")]
    PermissionDenied,
}

impl AuthError {
    /// Stable wire identifier for this error.
    ///
    /// This is the string clients and HTTP adapters switch on; it matches the
    /// serde rename of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCode => "invalid_code",
            Self::CodeExpired => "timeout_code",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "timeout_token",
            Self::CaptchaMismatch => "error_captcha",
            Self::CaptchaExpired => "timeout_captcha",
            Self::OperatorMismatch => "error_operator",
            Self::CodeMismatch => "error_code",
            Self::RateLimited => "limit_time",
            Self::DeliveryFailed => "send_fail",
            Self::PasswordMismatch => "error_password",
            Self::PermissionDenied => "permission_deny",
        }
    }

    /// HTTP status an adapter should answer with for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidCode
            | Self::CodeExpired
            | Self::CaptchaMismatch
            | Self::CaptchaExpired
            | Self::OperatorMismatch
            | Self::CodeMismatch
            | Self::PasswordMismatch => 400,

            // 401 Unauthorized
            Self::InvalidToken | Self::TokenExpired => 401,

            // 403 Forbidden
            Self::PermissionDenied => 403,

            // 429 Too Many Requests
            Self::RateLimited => 429,

            // 502 Bad Gateway
            Self::DeliveryFailed => 502,
        }
    }
}

/// Faults raised while decoding a cipher envelope.
///
/// These stay inside the crate: protocol callers map them onto
/// [`AuthError::InvalidCode`] or [`AuthError::InvalidToken`].
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Envelope string is not valid lowercase hex.
    #[error("envelope is not valid hex: {0}")]
    MalformedHex(#[from] hex::FromHexError),

    /// Envelope decodes to fewer bytes than one IV block.
    #[error("envelope holds {0} bytes, shorter than one IV block")]
    TruncatedEnvelope(usize),

    /// Decrypted bytes are not UTF-8, which is what a wrong key produces.
    #[error("decrypted bytes are not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
