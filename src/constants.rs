// ABOUTME: Protocol and verification constants with domain-separated organization
// ABOUTME: Single authority for validity windows, payload tags, and environment variable names

//! Constants module
//!
//! Validity windows and protocol literals are grouped by domain. Durations are
//! milliseconds (`i64`) because every timestamp in the crate is a Unix
//! millisecond value; changing a window here changes it everywhere.

/// Validity windows and rate-limit intervals, in milliseconds.
pub mod windows {
    /// Default maximum age of an authorization code (10 minutes).
    pub const CODE_MAX_AGE_MS: i64 = 600_000;

    /// Default maximum age of a bearer token (15 days).
    pub const TOKEN_MAX_AGE_MS: i64 = 1_296_000_000;

    /// Captcha challenges are answerable for 5 minutes.
    pub const CAPTCHA_MAX_AGE_MS: i64 = 300_000;

    /// Email verification codes are checkable for 10 minutes.
    pub const EMAIL_CODE_MAX_AGE_MS: i64 = 600_000;

    /// Phone verification codes are checkable for 5 minutes.
    pub const PHONE_CODE_MAX_AGE_MS: i64 = 300_000;

    /// A channel must stay quiet this long before a new code is issued.
    pub const RESEND_INTERVAL_MS: i64 = 60_000;

    /// Non-remember login sessions idle out after 24 hours.
    pub const SESSION_IDLE_MAX_AGE_MS: i64 = 86_400_000;
}

/// Literals baked into the wire formats.
pub mod protocol {
    /// Type tag required in the `t` field of every bearer-token payload.
    pub const TOKEN_TYPE_TAG: &str = "MAC-Token";

    /// Separator between the encrypted segment and its signature.
    pub const TOKEN_SEPARATOR: char = '&';

    /// AES block size; the envelope prefixes exactly one block of IV.
    pub const IV_LEN: usize = 16;

    /// Entropy of a freshly generated password salt, in bits.
    pub const SALT_BITS: u32 = 260;
}

/// Numeric ranges for generated challenge values.
pub mod challenge {
    /// Captcha values are four digits.
    pub const CAPTCHA_MIN: u32 = 1_000;
    /// Upper bound (inclusive) for captcha values.
    pub const CAPTCHA_MAX: u32 = 9_999;

    /// Email and phone codes are six digits.
    pub const CHANNEL_CODE_MIN: u32 = 100_000;
    /// Upper bound (inclusive) for email and phone codes.
    pub const CHANNEL_CODE_MAX: u32 = 999_999;
}

/// Environment variable names read by [`crate::config`].
pub mod env {
    /// Secret for authorization-code encryption.
    pub const CODE_SECRET: &str = "MERIDIAN_CODE_SECRET";

    /// Secret for bearer-token encryption.
    pub const TOKEN_SECRET: &str = "MERIDIAN_TOKEN_SECRET";

    /// Padding mixed into the token signature preimage.
    pub const TOKEN_PADDING: &str = "MERIDIAN_TOKEN_PADDING";

    /// When set, every issued SMS code takes this value (staging only).
    pub const SMS_CODE_OVERRIDE: &str = "MERIDIAN_SMS_CODE_OVERRIDE";

    /// Sender address for verification mail.
    pub const MAIL_FROM: &str = "MERIDIAN_MAIL_FROM";

    /// Log level (`error` | `warn` | `info` | `debug` | `trace`).
    pub const LOG_LEVEL: &str = "MERIDIAN_LOG_LEVEL";

    /// Log output format (`json` | `pretty` | `compact`).
    pub const LOG_FORMAT: &str = "MERIDIAN_LOG_FORMAT";
}
