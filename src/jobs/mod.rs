//! Background jobs
//!
//! Transactional email is delivered out of band: request handlers push an
//! [`EmailJob`] through an [`EmailQueue`] after their own write has
//! committed, and the `jobs work` command drains the queue.

mod email_job;
mod queue;

pub use email_job::{email_job_handler, EmailJob};
pub use queue::{enqueue_best_effort, EmailQueue, PostgresEmailQueue};

#[cfg(any(test, feature = "test-utils"))]
pub use queue::MockEmailQueue;
