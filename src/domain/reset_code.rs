//! One-time password reset codes.
//!
//! Only the SHA-256 digest of a code is stored; the plain code travels by
//! email and is compared digest-to-digest on verification.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use super::PasswordReset;
use crate::config::{RESET_CODE_MAX, RESET_CODE_MIN, RESET_CODE_TTL_MINUTES};
use crate::errors::{AppError, AppResult};

/// Freshly issued reset code together with the state to persist.
#[derive(Debug, Clone)]
pub struct IssuedResetCode {
    /// Plain code, to be delivered to the user and never stored
    pub code: String,
    pub state: PasswordReset,
}

/// Issue a six-digit code valid for `RESET_CODE_TTL_MINUTES` from `now`.
pub fn issue(now: DateTime<Utc>) -> IssuedResetCode {
    let code = rand::thread_rng()
        .gen_range(RESET_CODE_MIN..RESET_CODE_MAX)
        .to_string();
    let state = PasswordReset {
        code_hash: Some(digest(&code)),
        expires_at: Some(now + Duration::minutes(RESET_CODE_TTL_MINUTES)),
        verified: false,
    };
    IssuedResetCode { code, state }
}

/// Hex-encoded SHA-256 digest of a code.
pub fn digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.trim().as_bytes()))
}

/// Check a submitted code against the pending reset state.
pub fn check(state: &PasswordReset, code: &str, now: DateTime<Utc>) -> AppResult<()> {
    match state.code_hash.as_deref() {
        Some(stored) if stored == digest(code) => {}
        _ => return Err(AppError::bad_request("Invalid reset code")),
    }

    match state.expires_at {
        Some(expires_at) if expires_at >= now => Ok(()),
        _ => Err(AppError::bad_request("Reset code has expired")),
    }
}
