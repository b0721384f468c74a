// ABOUTME: Salted double-SHA-512 password hashing and constant-time verification
// ABOUTME: Produces the { password, salt } verifier pair persisted by the user store
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Password hashing.
//!
//! The scheme is `sha512_hex(sha512_hex(input) || salt)` with a random
//! base-36 salt of 260 bits. The `input` arriving here is itself expected to
//! be the client-side SHA-512 of the user's plaintext, so the double hash is
//! intentional, not an accident of layering. Verification recomputes the
//! digest with the stored salt and compares in constant time.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::constants::protocol::SALT_BITS;
use crate::crypto::cipher::{random_base36, sha512_hex};
use crate::errors::{AuthError, AuthResult};

/// Salted password digest as persisted by the user store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordVerifier {
    /// `sha512_hex(sha512_hex(input) || salt)`, 128 hex characters.
    pub password: String,
    /// Base-36 salt the digest was computed with.
    pub salt: String,
}

/// Hash a password with a freshly generated salt.
#[must_use]
pub fn hash_password(password: &str) -> PasswordVerifier {
    let salt = random_base36(SALT_BITS);
    hash_password_with_salt(password, &salt)
}

/// Hash a password against a caller-supplied salt.
///
/// Deterministic; this is what login flows call with the salt loaded from the
/// stored verifier.
#[must_use]
pub fn hash_password_with_salt(password: &str, salt: &str) -> PasswordVerifier {
    let digest = sha512_hex(&(sha512_hex(password) + salt));
    PasswordVerifier {
        password: digest,
        salt: salt.into(),
    }
}

/// Check a candidate password against a stored verifier.
///
/// The digest comparison is constant-time; both sides are fixed-width hex so
/// length never leaks anything either.
///
/// # Errors
///
/// Returns [`AuthError::PasswordMismatch`] when the candidate does not
/// reproduce the stored digest.
pub fn verify_password(candidate: &str, stored: &PasswordVerifier) -> AuthResult<()> {
    let recomputed = hash_password_with_salt(candidate, &stored.salt);
    let matches: bool = recomputed
        .password
        .as_bytes()
        .ct_eq(stored.password.as_bytes())
        .into();
    if matches {
        Ok(())
    } else {
        Err(AuthError::PasswordMismatch)
    }
}
