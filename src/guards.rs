// ABOUTME: Session guards for login freshness and persisted user-level checks
// ABOUTME: Mutates the session user slice in place and consults the user directory
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Meridian Platform

//! # Session Guards
//!
//! Request handlers call these before doing anything sensitive.
//! [`require_login`] is pure session math; the level guards additionally ask
//! the [`UserDirectory`] for the persisted permission level. A directory that
//! cannot answer denies: an outage must never widen access.

use chrono::Utc;
use tracing::warn;

use crate::constants::windows::SESSION_IDLE_MAX_AGE_MS;
use crate::errors::{AuthError, AuthResult};
use crate::external::UserDirectory;
use crate::models::SessionUser;

/// Require a live login on the session.
///
/// Remember-me sessions never idle out. Others must have been seen within
/// the last 24 hours (inclusive at the boundary) and get their `last_seen_ms`
/// refreshed on every successful pass.
///
/// # Errors
///
/// [`AuthError::InvalidToken`] when no user id is attached,
/// [`AuthError::TokenExpired`] when a non-remember session has idled out.
pub fn require_login(user: &mut SessionUser) -> AuthResult<()> {
    if user.id.as_deref().is_none_or(str::is_empty) {
        return Err(AuthError::InvalidToken);
    }

    if !user.remember {
        let now = Utc::now().timestamp_millis();
        let fresh = user
            .last_seen_ms
            .is_some_and(|seen| now - seen <= SESSION_IDLE_MAX_AGE_MS);
        if !fresh {
            warn!("non-remember session idled out");
            return Err(AuthError::TokenExpired);
        }
        user.last_seen_ms = Some(now);
    }

    Ok(())
}

/// Require the user's persisted level to be at least `min_level`.
///
/// # Errors
///
/// [`AuthError::InvalidToken`] when the session has no user id,
/// [`AuthError::PermissionDenied`] when the level is too low or the
/// directory cannot answer.
pub async fn require_min_user_level<D: UserDirectory + ?Sized>(
    directory: &D,
    user: &SessionUser,
    min_level: i32,
) -> AuthResult<()> {
    let level = lookup_level(directory, user).await?;
    if level >= min_level {
        Ok(())
    } else {
        warn!(level, min_level, "user level below requirement");
        Err(AuthError::PermissionDenied)
    }
}

/// Require the user's persisted level to be exactly `level`.
///
/// # Errors
///
/// Same as [`require_min_user_level`], with the equality comparison instead.
pub async fn require_user_level<D: UserDirectory + ?Sized>(
    directory: &D,
    user: &SessionUser,
    level: i32,
) -> AuthResult<()> {
    let actual = lookup_level(directory, user).await?;
    if actual == level {
        Ok(())
    } else {
        warn!(actual, required = level, "user level differs from requirement");
        Err(AuthError::PermissionDenied)
    }
}

async fn lookup_level<D: UserDirectory + ?Sized>(
    directory: &D,
    user: &SessionUser,
) -> AuthResult<i32> {
    let Some(user_id) = user.id.as_deref().filter(|id| !id.is_empty()) else {
        return Err(AuthError::InvalidToken);
    };
    directory.level_by_id(user_id).await.map_err(|err| {
        warn!(error = %err, "user directory lookup failed, denying");
        AuthError::PermissionDenied
    })
}
