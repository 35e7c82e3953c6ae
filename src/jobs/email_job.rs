//! Email background job.
//!
//! In development the worker logs emails instead of sending them; a real
//! transport is used once SMTP settings are present.

use serde::{Deserialize, Serialize};
use std::env;

use crate::config::RESET_CODE_TTL_MINUTES;
use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Optional sender override (defaults to SMTP_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    /// Greeting sent right after registration.
    pub fn welcome(to: &str, name: &str) -> Self {
        Self::new(
            to,
            "Welcome to the blog",
            format!(
                "Hi {name},\n\n\
                 Your account is ready. You can now write posts and join the \
                 discussion in the comments.\n"
            ),
        )
    }

    /// Carries a one-time password reset code.
    pub fn password_reset(to: &str, name: &str, code: &str) -> Self {
        Self::new(
            to,
            "Your password reset code",
            format!(
                "Hi {name},\n\n\
                 Your password reset code is: {code}\n\n\
                 The code expires in {RESET_CODE_TTL_MINUTES} minutes. If you did \
                 not ask for a reset you can ignore this email.\n"
            ),
        )
    }
}

struct EmailConfig {
    smtp_host: Option<String>,
    smtp_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@example.com".to_string()),
        }
    }
}

/// Processes one queued email.
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    let config = EmailConfig::from_env();
    let from = job.from.as_deref().unwrap_or(&config.smtp_from);

    tracing::info!(
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );

    match config.smtp_host {
        None => {
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                from,
                job.to,
                job.subject,
                job.body
            );
        }
        Some(host) => {
            // TODO: deliver through an SMTP transport once one is added to the stack
            tracing::warn!(smtp_host = %host, "No SMTP transport compiled in; email dropped");
        }
    }

    Ok(())
}
