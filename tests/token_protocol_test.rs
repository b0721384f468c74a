// ABOUTME: Integration tests for the authorization code and bearer token protocol
// ABOUTME: Exercises round trips, expiry windows, and malformed artifact rejection
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Utc;
use common::{
    forge_code_at, forge_code_payload, forge_token_payload, forge_token_wrapping,
    sign_token_segment, test_auth_manager,
};
use meridian_auth::constants::windows::{CODE_MAX_AGE_MS, TOKEN_MAX_AGE_MS};
use meridian_auth::errors::AuthError;
use serde_json::json;

#[test]
fn code_round_trip_preserves_identity() {
    let manager = test_auth_manager();

    let code = manager.generate_code("user-77", "app-web");
    let grant = manager.read_code(&code).unwrap();

    assert_eq!(grant.user_id, "user-77");
    assert_eq!(grant.app_id, "app-web");
    assert!(
        manager.read_code_with_max_age(&code, 5_000).is_ok(),
        "a just-issued code should pass a five-second window"
    );
}

#[test]
fn each_code_envelope_is_unique() {
    let manager = test_auth_manager();

    let first = manager.generate_code("user-77", "app-web");
    let second = manager.generate_code("user-77", "app-web");

    assert_ne!(first, second, "fresh IV must vary the envelope");
    assert!(manager.read_code(&first).is_ok());
    assert!(manager.read_code(&second).is_ok());
}

#[test]
fn stale_code_reports_timeout() {
    let manager = test_auth_manager();
    let issued = Utc::now().timestamp_millis() - CODE_MAX_AGE_MS - 60_000;

    let code = forge_code_at("user-77", "app-web", issued);

    assert!(matches!(
        manager.read_code(&code),
        Err(AuthError::CodeExpired)
    ));
}

#[test]
fn code_window_can_be_overridden() {
    let manager = test_auth_manager();
    let issued = Utc::now().timestamp_millis() - CODE_MAX_AGE_MS - 60_000;
    let code = forge_code_at("user-77", "app-web", issued);

    let grant = manager
        .read_code_with_max_age(&code, CODE_MAX_AGE_MS * 4)
        .unwrap();

    assert_eq!(grant.user_id, "user-77");
}

#[test]
fn code_with_missing_claims_is_invalid() {
    let manager = test_auth_manager();
    let now = Utc::now().timestamp_millis();

    let cases = [
        json!({ "u": "user-77", "a": "app-web" }).to_string(),
        json!({ "t": 0, "u": "user-77", "a": "app-web" }).to_string(),
        json!({ "t": now, "u": "", "a": "app-web" }).to_string(),
        json!({ "t": now, "u": "user-77", "a": "" }).to_string(),
        json!({ "t": now, "u": "user-77" }).to_string(),
        "not json at all".to_string(),
        json!([1, 2, 3]).to_string(),
    ];

    for payload in cases {
        let code = forge_code_payload(&payload);
        assert!(
            matches!(manager.read_code(&code), Err(AuthError::InvalidCode)),
            "payload {payload} should be rejected as invalid"
        );
    }
}

#[test]
fn garbage_code_envelope_is_invalid_not_a_crash() {
    let manager = test_auth_manager();

    for envelope in ["", "zz", "deadbeef", "00112233445566778899aabbccddeeff"] {
        assert!(matches!(
            manager.read_code(envelope),
            Err(AuthError::InvalidCode)
        ));
    }
}

#[test]
fn code_from_another_deployment_is_invalid() {
    let manager = test_auth_manager();
    let foreign = meridian_auth::crypto::encrypt(
        &json!({ "t": Utc::now().timestamp_millis(), "u": "user-77", "a": "app-web" }).to_string(),
        "some-other-code-secret",
    );

    assert!(matches!(
        manager.read_code(&foreign),
        Err(AuthError::InvalidCode)
    ));
}

#[test]
fn token_round_trip_preserves_identity_and_state() {
    let manager = test_auth_manager();

    let token = manager.generate_token("user-77", "app-web", 42);
    let grant = manager.read_token(&token).unwrap();

    assert_eq!(grant.user_id, "user-77");
    assert_eq!(grant.app_id, "app-web");
    assert_eq!(grant.state, 42);
}

#[test]
fn token_has_envelope_and_signature_segments() {
    let manager = test_auth_manager();

    let token = manager.generate_token("user-77", "app-web", 7);
    let segments: Vec<&str> = token.split('&').collect();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].len(), 128, "signature is a SHA-512 hex digest");
}

#[test]
fn tampered_token_segments_are_rejected() {
    let manager = test_auth_manager();
    let token = manager.generate_token("user-77", "app-web", 7);
    let (enc, signature) = token.split_once('&').unwrap();

    let mut flipped_enc = enc.to_string();
    flipped_enc.replace_range(0..1, if enc.starts_with('0') { "1" } else { "0" });
    let mut flipped_sig = signature.to_string();
    flipped_sig.replace_range(0..1, if signature.starts_with('0') { "1" } else { "0" });

    for forged in [
        format!("{flipped_enc}&{signature}"),
        format!("{enc}&{flipped_sig}"),
        enc.to_string(),
        format!("{enc}&{signature}&extra"),
        format!("&{signature}"),
        format!("{enc}&"),
        String::from("bad&bad"),
        String::new(),
    ] {
        assert!(
            matches!(manager.read_token(&forged), Err(AuthError::InvalidToken)),
            "forgery {forged:?} should be rejected"
        );
    }
}

#[test]
fn token_signed_with_other_padding_is_rejected() {
    let manager = test_auth_manager();
    let token = manager.generate_token("user-77", "app-web", 7);
    let (enc, _) = token.split_once('&').unwrap();
    let resigned = format!(
        "{enc}&{}",
        meridian_auth::crypto::sha512_hex(&format!("{enc}wrong-padding"))
    );

    assert!(matches!(
        manager.read_token(&resigned),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn token_with_missing_claims_is_invalid() {
    let manager = test_auth_manager();
    let manager_code = manager.generate_code("user-77", "app-web");

    let cases = [
        json!({ "s": 1, "t": "MAC-Token" }).to_string(),
        json!({ "c": "", "s": 1, "t": "MAC-Token" }).to_string(),
        json!({ "c": manager_code, "s": 0, "t": "MAC-Token" }).to_string(),
        json!({ "c": manager_code, "s": 1, "t": "Bearer" }).to_string(),
        json!({ "c": manager_code, "s": 1 }).to_string(),
        "not json".to_string(),
    ];

    for payload in cases {
        let token = forge_token_payload(&payload);
        assert!(
            matches!(manager.read_token(&token), Err(AuthError::InvalidToken)),
            "payload {payload} should be rejected as invalid"
        );
    }
}

#[test]
fn embedded_code_is_checked_against_the_token_window() {
    let manager = test_auth_manager();

    // Issued an hour ago: far beyond the standalone code window, well within
    // the token window, so the token must still resolve.
    let issued = Utc::now().timestamp_millis() - CODE_MAX_AGE_MS * 6;
    let inner = forge_code_at("user-77", "app-web", issued);

    assert!(matches!(
        manager.read_code(&inner),
        Err(AuthError::CodeExpired)
    ));

    let grant = manager
        .read_token(&forge_token_wrapping(&inner, 9))
        .unwrap();
    assert_eq!(grant.user_id, "user-77");
}

#[test]
fn stale_token_reports_timeout() {
    let manager = test_auth_manager();
    let issued = Utc::now().timestamp_millis() - TOKEN_MAX_AGE_MS - 60_000;
    let inner = forge_code_at("user-77", "app-web", issued);

    assert!(matches!(
        manager.read_token(&forge_token_wrapping(&inner, 9)),
        Err(AuthError::CodeExpired)
    ));
}

#[test]
fn token_window_can_be_overridden() {
    let manager = test_auth_manager();
    let issued = Utc::now().timestamp_millis() - 120_000;
    let inner = forge_code_at("user-77", "app-web", issued);
    let token = forge_token_wrapping(&inner, 9);

    assert!(matches!(
        manager.read_token_with_max_age(&token, 60_000),
        Err(AuthError::CodeExpired)
    ));
    assert!(manager.read_token_with_max_age(&token, 300_000).is_ok());
}

#[test]
fn inner_garbage_wrapped_in_a_valid_signature_is_invalid() {
    let manager = test_auth_manager();

    // Correctly signed, but the encrypted segment never decrypts to a payload.
    let forged = sign_token_segment("00112233445566778899aabbccddeeff");

    assert!(matches!(
        manager.read_token(&forged),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn open_id_is_stable_per_user_app_pair() {
    let manager = test_auth_manager();

    let first = manager.generate_open_id("user-77", "app-web");
    let second = manager.generate_open_id("user-77", "app-web");
    let other_app = manager.generate_open_id("user-77", "app-ios");
    let other_user = manager.generate_open_id("user-78", "app-web");

    assert_eq!(first, second);
    assert_eq!(first.len(), 128);
    assert_ne!(first, other_app);
    assert_ne!(first, other_user);
}
