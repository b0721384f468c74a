// ABOUTME: Collaborator seams for mail, SMS, captcha rendering, and the user directory
// ABOUTME: Trait definitions only; transports live in the embedding service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! External collaborator traits.
//!
//! The auth core never talks to a network itself. Everything it needs from
//! the outside world crosses one of these seams, so tests substitute
//! recording stubs and deployments plug in real transports. I/O-bound seams
//! are async and fallible; captcha rendering is local CPU work and stays
//! synchronous.

pub mod captcha;
pub mod directory;
pub mod mailer;
pub mod sms;

pub use captcha::CaptchaRenderer;
pub use directory::UserDirectory;
pub use mailer::{EmailMessage, Mailer};
pub use sms::SmsSender;
