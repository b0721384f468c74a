// ABOUTME: Cryptography module providing the envelope cipher and password hashing
// ABOUTME: Centralizes all cryptographic operations for meridian-auth
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Cryptographic primitives for the Meridian auth core.
//!
//! Everything here is deterministic given its inputs plus OS randomness; no
//! state, no async. The protocol layer in [`crate::auth`] composes these into
//! codes and tokens.

pub mod cipher;
pub mod password;

pub use cipher::{decrypt, encrypt, random_base36, sha512_hex};
pub use password::{hash_password, hash_password_with_salt, verify_password, PasswordVerifier};
