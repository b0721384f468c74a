// ABOUTME: Configuration management module for secrets and verification settings
// ABOUTME: Handles environment loading, injectable secrets, and email template selection
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Configuration module for the Meridian auth core.
//!
//! Secrets are plain injected values: deployments call
//! [`AuthConfig::from_env`] once at startup, tests construct
//! [`AuthSecrets`] directly with fixed strings. Nothing in this crate reads
//! an environment variable after startup.

/// Environment-backed configuration types
pub mod environment;

pub use environment::{
    AuthConfig, AuthSecrets, EmailTemplate, EmailTemplates, VerificationConfig,
};
