// ABOUTME: Core data models for sessions, verification challenges, and grant results
// ABOUTME: Defines SessionRecord, challenge state, and the decoded code/token payloads
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! # Data Models
//!
//! Session state is an explicit value: callers load a [`SessionRecord`] from
//! wherever they keep sessions, hand `&mut` borrows to the verification and
//! guard functions, and persist the record afterwards. Everything is serde so
//! the external session service can store records as JSON.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full per-session state carried across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// Login identity, if any.
    pub user: SessionUser,
    /// Pending verification challenges.
    pub verify: VerificationState,
}

impl SessionRecord {
    /// Fresh anonymous session with no pending challenges.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Login identity slice of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    /// Authenticated user id; `None` until login.
    pub id: Option<String>,
    /// Remember-me sessions never idle out.
    pub remember: bool,
    /// Unix milliseconds of the last guarded request, maintained by
    /// [`crate::guards::require_login`] for non-remember sessions.
    pub last_seen_ms: Option<i64>,
}

impl SessionUser {
    /// Mark this session as logged in right now.
    pub fn login(&mut self, user_id: impl Into<String>, remember: bool) {
        self.id = Some(user_id.into());
        self.remember = remember;
        self.last_seen_ms = Some(Utc::now().timestamp_millis());
    }

    /// Drop the login identity.
    pub fn logout(&mut self) {
        self.id = None;
        self.remember = false;
        self.last_seen_ms = None;
    }

    /// Whether a user id is attached.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.id.is_some()
    }
}

/// Pending verification challenges, one slot per channel.
///
/// A slot is `Some` from issuance until the check that consumes it; clearing
/// a slot is what makes challenges single-use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationState {
    /// Image captcha challenge.
    pub captcha: Option<CaptchaChallenge>,
    /// Email verification code.
    pub email: Option<EmailChallenge>,
    /// Phone verification code.
    pub phone: Option<PhoneChallenge>,
}

impl VerificationState {
    /// Drop every pending challenge (logout, session reset).
    pub fn clear(&mut self) {
        self.captcha = None;
        self.email = None;
        self.phone = None;
    }
}

/// A four-digit image captcha waiting for its answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaptchaChallenge {
    /// The digits the user must read back.
    pub value: String,
    /// Unix milliseconds at issuance.
    pub issued_at_ms: i64,
}

/// A six-digit code mailed to an address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailChallenge {
    /// The code the user must submit.
    pub code: String,
    /// Unix milliseconds at issuance.
    pub issued_at_ms: i64,
    /// Operation this code was issued for.
    pub purpose: ChallengePurpose,
    /// Address the code was sent to.
    pub email: String,
}

/// A six-digit code texted to a phone number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneChallenge {
    /// The code the user must submit.
    pub code: String,
    /// Unix milliseconds at issuance.
    pub issued_at_ms: i64,
    /// Operation this code was issued for.
    pub purpose: ChallengePurpose,
    /// Number the code was sent to.
    pub phone: String,
}

/// Sensitive operation a verification code can gate.
///
/// The wire names are the operator tags checks compare against; a code issued
/// for one purpose never satisfies a check for another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChallengePurpose {
    /// Account registration.
    Register,
    /// Password reset.
    #[serde(rename = "reset")]
    ResetPassword,
    /// Email or phone change.
    #[serde(rename = "update")]
    UpdateContact,
}

impl fmt::Display for ChallengePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Register => "register",
            Self::ResetPassword => "reset",
            Self::UpdateContact => "update",
        };
        f.write_str(tag)
    }
}

/// Identities recovered from a valid authorization code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeGrant {
    /// User the code was issued to.
    pub user_id: String,
    /// Application the code was issued for.
    pub app_id: String,
}

/// Identities and client state recovered from a valid bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenGrant {
    /// User the token was issued to.
    pub user_id: String,
    /// Application the token was issued for.
    pub app_id: String,
    /// Opaque numeric state echoed from issuance.
    pub state: i64,
}
