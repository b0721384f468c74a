// ABOUTME: Environment configuration for protocol secrets and verification delivery settings
// ABOUTME: Loads required secrets with explicit errors and optional staging overrides
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Environment-backed configuration.
//!
//! The three protocol secrets are required and have no defaults; a deployment
//! that forgot to set one fails at startup with the variable name in the
//! error. Everything else is optional with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use tracing::info;

use crate::constants::env as env_names;

/// The three secrets the code/token protocol is keyed on.
///
/// Construct explicitly in tests; load from the environment in deployments.
/// `Debug` redacts the values so configs can be logged.
#[derive(Clone)]
pub struct AuthSecrets {
    code_secret: String,
    token_secret: String,
    token_padding: String,
}

impl AuthSecrets {
    /// Build from explicit values.
    #[must_use]
    pub fn new(
        code_secret: impl Into<String>,
        token_secret: impl Into<String>,
        token_padding: impl Into<String>,
    ) -> Self {
        Self {
            code_secret: code_secret.into(),
            token_secret: token_secret.into(),
            token_padding: token_padding.into(),
        }
    }

    /// Load from `MERIDIAN_CODE_SECRET`, `MERIDIAN_TOKEN_SECRET`, and
    /// `MERIDIAN_TOKEN_PADDING`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when any of the three is unset.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            code_secret: required_env(env_names::CODE_SECRET)?,
            token_secret: required_env(env_names::TOKEN_SECRET)?,
            token_padding: required_env(env_names::TOKEN_PADDING)?,
        })
    }

    /// Secret keying authorization-code envelopes.
    pub(crate) fn code_secret(&self) -> &str {
        &self.code_secret
    }

    /// Secret keying bearer-token envelopes.
    pub(crate) fn token_secret(&self) -> &str {
        &self.token_secret
    }

    /// Padding mixed into the token signature preimage.
    pub(crate) fn token_padding(&self) -> &str {
        &self.token_padding
    }
}

impl fmt::Debug for AuthSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSecrets")
            .field("code_secret", &"[redacted]")
            .field("token_secret", &"[redacted]")
            .field("token_padding", &"[redacted]")
            .finish()
    }
}

/// Subject and collaborator-side template id for one mail kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    /// Subject line of the outgoing mail.
    pub subject: String,
    /// Template identifier the mail collaborator resolves.
    pub template: String,
}

impl EmailTemplate {
    fn new(subject: &str) -> Self {
        Self {
            subject: subject.into(),
            template: "verification_code".into(),
        }
    }
}

/// One [`EmailTemplate`] per challenge purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplates {
    /// Mail sent for account registration.
    pub register: EmailTemplate,
    /// Mail sent for password reset.
    pub reset_password: EmailTemplate,
    /// Mail sent for email/phone change confirmation.
    pub update_contact: EmailTemplate,
}

impl Default for EmailTemplates {
    fn default() -> Self {
        Self {
            register: EmailTemplate::new("Verify your Meridian account"),
            reset_password: EmailTemplate::new("Reset your Meridian password"),
            update_contact: EmailTemplate::new("Confirm your new contact address"),
        }
    }
}

/// Settings for the verification-challenge flows.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Sender address for verification mail.
    pub mail_from: String,
    /// When set, every issued SMS code takes this exact value. Staging
    /// environments pin it so QA devices need no real SMS gateway; leave
    /// unset in production.
    pub sms_code_override: Option<String>,
    /// Mail subjects and template ids per purpose.
    pub templates: EmailTemplates,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            mail_from: "no-reply@meridian.app".into(),
            sms_code_override: None,
            templates: EmailTemplates::default(),
        }
    }
}

impl VerificationConfig {
    /// Load from the environment, falling back to defaults for anything
    /// unset.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mail_from: optional_env(env_names::MAIL_FROM).unwrap_or(defaults.mail_from),
            sms_code_override: optional_env(env_names::SMS_CODE_OVERRIDE),
            templates: defaults.templates,
        }
    }
}

/// Aggregate configuration for the auth core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Protocol secrets.
    pub secrets: AuthSecrets,
    /// Verification flow settings.
    pub verification: VerificationConfig,
}

impl AuthConfig {
    /// Load the full configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required secret is unset.
    pub fn from_env() -> Result<Self> {
        info!("Loading auth configuration from environment variables");
        let config = Self {
            secrets: AuthSecrets::from_env()?,
            verification: VerificationConfig::from_env(),
        };
        info!(
            sms_code_override = config.verification.sms_code_override.is_some(),
            mail_from = %config.verification.mail_from,
            "Auth configuration loaded"
        );
        Ok(config)
    }
}

fn required_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
