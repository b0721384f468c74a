// ABOUTME: Logging configuration and structured logging setup for observability and debugging
// ABOUTME: Configures log level, output format, and the global tracing subscriber
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! Structured logging configuration.
//!
//! Validation paths log at `debug`, rejected artifacts and rate limits at
//! `warn`; nothing in this crate logs secrets, codes, or tokens. Embedders
//! that already install their own subscriber can skip [`LoggingConfig::init`]
//! entirely.

use anyhow::Result;
use std::env;
use std::io;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::constants::env as env_names;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables.
    ///
    /// `MERIDIAN_LOG_LEVEL` wins over `RUST_LOG`; unknown formats fall back
    /// to pretty.
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var(env_names::LOG_LEVEL)
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".into());

        let format = match env::var(env_names::LOG_FORMAT).as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        Self {
            level,
            format,
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
        }
    }

    /// Initialize the global tracing subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn init(&self) -> Result<()> {
        let env_filter = EnvFilter::new(&self.level).add_directive(
            format!("meridian_auth={}", self.level)
                .parse()
                .unwrap_or_else(|_| tracing::Level::INFO.into()),
        );

        let registry = tracing_subscriber::registry().with(env_filter);

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .compact();
                registry.with(compact_layer).try_init()?;
            }
        }

        Ok(())
    }
}
