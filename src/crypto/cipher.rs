// ABOUTME: Envelope cipher (AES-256-CFB with SHA-256-derived keys), digest, and CSPRNG helpers
// ABOUTME: Produces and consumes the hex(IV || ciphertext) wire format used by codes and tokens
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Envelope encryption and the two generic primitives built on it.
//!
//! The wire format is lowercase `hex(IV || ciphertext)` with a fresh 16-byte
//! IV per call, AES-256 in CFB mode, and the key derived as
//! `SHA-256(secret)`. The IV rides in the clear; only the secret is required
//! to decrypt. Keys are recomputed per operation and zeroized on drop rather
//! than cached anywhere.

use aes::Aes256;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use cfb_mode::{Decryptor, Encryptor};
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use crate::constants::protocol::IV_LEN;
use crate::errors::CryptoError;

type Aes256CfbEnc = Encryptor<Aes256>;
type Aes256CfbDec = Decryptor<Aes256>;

/// Base-36 digits used by [`random_base36`].
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Bits of entropy one base-36 character carries (`log2(36)`).
const BITS_PER_BASE36_CHAR: f64 = 5.169_925_001_442_312;

/// Derive the AES-256 key for a secret string.
///
/// Any length of secret works; the digest is the key. The returned buffer
/// zeroizes itself when dropped.
fn derive_key(secret: &str) -> Zeroizing<[u8; 32]> {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0_u8; 32];
    key.copy_from_slice(&digest);
    Zeroizing::new(key)
}

/// Encrypt `plaintext` under `secret` into the hex envelope format.
///
/// Every call draws a fresh random IV, so encrypting the same plaintext twice
/// yields different envelopes.
#[must_use]
pub fn encrypt(plaintext: &str, secret: &str) -> String {
    let key = derive_key(secret);
    let mut iv = [0_u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut buf = plaintext.as_bytes().to_vec();
    Aes256CfbEnc::new(&(*key).into(), &iv.into()).encrypt(&mut buf);

    let mut envelope = Vec::with_capacity(IV_LEN + buf.len());
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&buf);
    hex::encode(envelope)
}

/// Decrypt an envelope produced by [`encrypt`] with the same `secret`.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedHex`] when the envelope is not valid hex,
/// [`CryptoError::TruncatedEnvelope`] when it decodes to fewer bytes than one
/// IV block, and [`CryptoError::InvalidUtf8`] when the decrypted bytes are
/// not UTF-8 (the usual symptom of a wrong secret).
pub fn decrypt(envelope: &str, secret: &str) -> Result<String, CryptoError> {
    let bytes = hex::decode(envelope)?;
    if bytes.len() < IV_LEN {
        return Err(CryptoError::TruncatedEnvelope(bytes.len()));
    }

    let mut iv = [0_u8; IV_LEN];
    iv.copy_from_slice(&bytes[..IV_LEN]);
    let mut buf = bytes[IV_LEN..].to_vec();

    let key = derive_key(secret);
    Aes256CfbDec::new(&(*key).into(), &iv.into()).decrypt(&mut buf);

    Ok(String::from_utf8(buf)?)
}

/// SHA-512 of `value`, as 128 lowercase hex characters.
///
/// Deterministic and unkeyed; the token signature and password verifier both
/// build on it.
#[must_use]
pub fn sha512_hex(value: &str) -> String {
    hex::encode(Sha512::digest(value.as_bytes()))
}

/// Random base-36 string carrying at least `bits` bits of entropy.
///
/// Length is `ceil(bits / log2(36))`; each character is drawn uniformly from
/// `[0-9a-z]` using the OS CSPRNG. `random_base36(260)` is the password-salt
/// shape: 51 characters.
#[must_use]
pub fn random_base36(bits: u32) -> String {
    let len = (f64::from(bits) / BITS_PER_BASE36_CHAR).ceil() as usize;
    let mut rng = OsRng;
    (0..len)
        .map(|_| char::from(BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())]))
        .collect()
}
