// ABOUTME: Session-bound verification challenges for captcha, email, and phone channels
// ABOUTME: Issues single-use codes, enforces windows and resend limits, orchestrates delivery
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! # Verification Challenges
//!
//! Each session carries at most one pending challenge per channel. Issuing
//! overwrites the slot; checking consumes it whatever the outcome, so a code
//! is answerable exactly once. The one exception: an email code that merely
//! mismatched stays answerable until its window lapses, which keeps a user
//! who fat-fingered one digit from having to request a fresh mail. Phone
//! codes deliberately do not get that grace.
//!
//! All checks compare wall-clock milliseconds; nothing here schedules
//! anything. Challenge state lives in the caller's [`VerificationState`] and
//! is mutated in place.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::Rng;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::{EmailTemplate, VerificationConfig};
use crate::constants::challenge::{CAPTCHA_MAX, CAPTCHA_MIN, CHANNEL_CODE_MAX, CHANNEL_CODE_MIN};
use crate::constants::windows::{
    CAPTCHA_MAX_AGE_MS, EMAIL_CODE_MAX_AGE_MS, PHONE_CODE_MAX_AGE_MS, RESEND_INTERVAL_MS,
};
use crate::errors::{AuthError, AuthResult};
use crate::external::{CaptchaRenderer, EmailMessage, Mailer, SmsSender};
use crate::models::{
    CaptchaChallenge, ChallengePurpose, EmailChallenge, PhoneChallenge, VerificationState,
};

/// Issues, checks, and delivers verification challenges.
#[derive(Debug, Clone)]
pub struct VerificationManager {
    config: VerificationConfig,
}

impl VerificationManager {
    /// Manager over the given verification settings.
    #[must_use]
    pub const fn new(config: VerificationConfig) -> Self {
        Self { config }
    }

    /// Issue a four-digit captcha and render it for display.
    ///
    /// No rate limit: requesting a new image simply replaces the pending
    /// challenge. Returns whatever the renderer produced, conventionally a
    /// `data:image/png;base64,...` URI.
    pub fn issue_captcha<R: CaptchaRenderer + ?Sized>(
        &self,
        verify: &mut VerificationState,
        renderer: &R,
    ) -> String {
        let value = OsRng.gen_range(CAPTCHA_MIN..=CAPTCHA_MAX).to_string();
        let image = renderer.render(&value);
        verify.captcha = Some(CaptchaChallenge {
            value,
            issued_at_ms: Utc::now().timestamp_millis(),
        });
        debug!("captcha challenge issued");
        image
    }

    /// Check a submitted captcha answer, consuming the challenge.
    ///
    /// # Errors
    ///
    /// [`AuthError::CaptchaExpired`] when no challenge is pending or it is
    /// older than five minutes, [`AuthError::CaptchaMismatch`] when the
    /// digits differ. The challenge is gone afterwards in every case.
    pub fn check_captcha(
        &self,
        verify: &mut VerificationState,
        submitted: &str,
    ) -> AuthResult<()> {
        let Some(challenge) = verify.captcha.take() else {
            return Err(AuthError::CaptchaExpired);
        };
        if Utc::now().timestamp_millis() - challenge.issued_at_ms >= CAPTCHA_MAX_AGE_MS {
            warn!("captcha answered past its window");
            return Err(AuthError::CaptchaExpired);
        }
        if challenge.value == submitted {
            Ok(())
        } else {
            warn!("captcha answer mismatch");
            Err(AuthError::CaptchaMismatch)
        }
    }

    /// Issue a six-digit email code for `purpose`, addressed to `email`.
    ///
    /// Returns the code for delivery; [`Self::send_email_code`] is the usual
    /// caller.
    ///
    /// # Errors
    ///
    /// [`AuthError::RateLimited`] when the previous email challenge is 60
    /// seconds old or younger.
    pub fn issue_email_code(
        &self,
        verify: &mut VerificationState,
        email: &str,
        purpose: ChallengePurpose,
    ) -> AuthResult<String> {
        let now = Utc::now().timestamp_millis();
        Self::enforce_resend_interval(verify.email.as_ref().map(|c| c.issued_at_ms), now)?;

        let code = OsRng
            .gen_range(CHANNEL_CODE_MIN..=CHANNEL_CODE_MAX)
            .to_string();
        verify.email = Some(EmailChallenge {
            code: code.clone(),
            issued_at_ms: now,
            purpose,
            email: email.into(),
        });
        debug!(purpose = %purpose, "email code issued");
        Ok(code)
    }

    /// Check a submitted email code for `purpose`.
    ///
    /// # Errors
    ///
    /// [`AuthError::CodeExpired`] when no challenge is pending or it is older
    /// than ten minutes, [`AuthError::OperatorMismatch`] when the pending
    /// challenge was issued for a different purpose, and
    /// [`AuthError::CodeMismatch`] when the digits differ. The mismatch case
    /// leaves the challenge in place; every other outcome consumes it.
    pub fn check_email_code(
        &self,
        verify: &mut VerificationState,
        submitted: &str,
        purpose: ChallengePurpose,
    ) -> AuthResult<()> {
        let Some(challenge) = verify.email.take() else {
            return Err(AuthError::CodeExpired);
        };
        if Utc::now().timestamp_millis() - challenge.issued_at_ms >= EMAIL_CODE_MAX_AGE_MS {
            warn!("email code checked past its window");
            return Err(AuthError::CodeExpired);
        }
        if challenge.purpose != purpose {
            warn!(
                issued_for = %challenge.purpose,
                checked_for = %purpose,
                "email code purpose mismatch"
            );
            return Err(AuthError::OperatorMismatch);
        }
        if challenge.code == submitted {
            Ok(())
        } else {
            // Mismatched digits put the challenge back: still answerable
            // until the window lapses
            verify.email = Some(challenge);
            warn!("email code mismatch");
            Err(AuthError::CodeMismatch)
        }
    }

    /// Issue a six-digit phone code for `purpose`, addressed to `phone`.
    ///
    /// When `sms_code_override` is configured the issued code takes that
    /// value instead of a random one.
    ///
    /// # Errors
    ///
    /// [`AuthError::RateLimited`] when the previous phone challenge is 60
    /// seconds old or younger.
    pub fn issue_phone_code(
        &self,
        verify: &mut VerificationState,
        phone: &str,
        purpose: ChallengePurpose,
    ) -> AuthResult<String> {
        let now = Utc::now().timestamp_millis();
        Self::enforce_resend_interval(verify.phone.as_ref().map(|c| c.issued_at_ms), now)?;

        let code = self.config.sms_code_override.clone().unwrap_or_else(|| {
            OsRng
                .gen_range(CHANNEL_CODE_MIN..=CHANNEL_CODE_MAX)
                .to_string()
        });
        verify.phone = Some(PhoneChallenge {
            code: code.clone(),
            issued_at_ms: now,
            purpose,
            phone: phone.into(),
        });
        debug!(purpose = %purpose, "phone code issued");
        Ok(code)
    }

    /// Check a submitted phone code for `purpose`, consuming the challenge.
    ///
    /// # Errors
    ///
    /// [`AuthError::CodeExpired`] when no challenge is pending or it is older
    /// than five minutes, [`AuthError::OperatorMismatch`] on a purpose
    /// mismatch, [`AuthError::CodeMismatch`] when the digits differ. The
    /// challenge is gone afterwards in every case.
    pub fn check_phone_code(
        &self,
        verify: &mut VerificationState,
        submitted: &str,
        purpose: ChallengePurpose,
    ) -> AuthResult<()> {
        let Some(challenge) = verify.phone.take() else {
            return Err(AuthError::CodeExpired);
        };
        if Utc::now().timestamp_millis() - challenge.issued_at_ms >= PHONE_CODE_MAX_AGE_MS {
            warn!("phone code checked past its window");
            return Err(AuthError::CodeExpired);
        }
        if challenge.purpose != purpose {
            warn!(
                issued_for = %challenge.purpose,
                checked_for = %purpose,
                "phone code purpose mismatch"
            );
            return Err(AuthError::OperatorMismatch);
        }
        if challenge.code == submitted {
            Ok(())
        } else {
            warn!("phone code mismatch");
            Err(AuthError::CodeMismatch)
        }
    }

    /// Issue an email code and deliver it through the mail collaborator.
    ///
    /// The challenge is stored before delivery is attempted, so a failed
    /// send leaves it pending and the resend limit applies to retries.
    ///
    /// # Errors
    ///
    /// [`AuthError::RateLimited`] from issuance, or
    /// [`AuthError::DeliveryFailed`] when the collaborator errors or reports
    /// the message undeliverable.
    pub async fn send_email_code<M: Mailer + ?Sized>(
        &self,
        verify: &mut VerificationState,
        mailer: &M,
        email: &str,
        purpose: ChallengePurpose,
    ) -> AuthResult<()> {
        let code = self.issue_email_code(verify, email, purpose)?;
        let template = self.template_for(purpose);
        let message = EmailMessage {
            from: self.config.mail_from.clone(),
            to: email.into(),
            subject: template.subject.clone(),
            template: template.template.clone(),
            vars: json!({
                "code": code,
                "time": Utc::now().format("%Y/%-m/%d %H:%M:%S").to_string(),
            }),
        };
        match mailer.send_email(&message).await {
            Ok(true) => {
                debug!(purpose = %purpose, "verification mail dispatched");
                Ok(())
            }
            Ok(false) => {
                warn!(purpose = %purpose, "mail provider reported delivery failure");
                Err(AuthError::DeliveryFailed)
            }
            Err(err) => {
                warn!(purpose = %purpose, error = %err, "mail provider unreachable");
                Err(AuthError::DeliveryFailed)
            }
        }
    }

    /// Issue a phone code and deliver it through the SMS collaborator.
    ///
    /// # Errors
    ///
    /// [`AuthError::RateLimited`] from issuance, or
    /// [`AuthError::DeliveryFailed`] when the collaborator errors or reports
    /// the message undeliverable.
    pub async fn send_phone_code<S: SmsSender + ?Sized>(
        &self,
        verify: &mut VerificationState,
        sms: &S,
        phone: &str,
        purpose: ChallengePurpose,
    ) -> AuthResult<()> {
        let code = self.issue_phone_code(verify, phone, purpose)?;
        match sms.send_sms(phone, json!({ "code": code })).await {
            Ok(true) => {
                debug!(purpose = %purpose, "verification SMS dispatched");
                Ok(())
            }
            Ok(false) => {
                warn!(purpose = %purpose, "SMS gateway reported delivery failure");
                Err(AuthError::DeliveryFailed)
            }
            Err(err) => {
                warn!(purpose = %purpose, error = %err, "SMS gateway unreachable");
                Err(AuthError::DeliveryFailed)
            }
        }
    }

    fn template_for(&self, purpose: ChallengePurpose) -> &EmailTemplate {
        match purpose {
            ChallengePurpose::Register => &self.config.templates.register,
            ChallengePurpose::ResetPassword => &self.config.templates.reset_password,
            ChallengePurpose::UpdateContact => &self.config.templates.update_contact,
        }
    }

    /// Block issuance while the previous challenge on the channel is 60
    /// seconds old or younger; exactly at the boundary still blocks.
    fn enforce_resend_interval(previous_issued_at_ms: Option<i64>, now: i64) -> AuthResult<()> {
        if let Some(issued_at_ms) = previous_issued_at_ms {
            let elapsed_ms = now - issued_at_ms;
            if elapsed_ms <= RESEND_INTERVAL_MS {
                warn!(elapsed_ms, "verification code requested inside the resend interval");
                return Err(AuthError::RateLimited);
            }
        }
        Ok(())
    }
}
