//! Email queue abstraction over the apalis PostgreSQL storage.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;

use super::EmailJob;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Accepts emails for later delivery.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailQueue: Send + Sync {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()>;
}

/// Queue backed by the apalis `jobs` table.
#[derive(Clone)]
pub struct PostgresEmailQueue {
    storage: PostgresStorage<EmailJob>,
}

impl PostgresEmailQueue {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl EmailQueue for PostgresEmailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;
        Ok(())
    }
}

/// Enqueue an email, logging instead of failing when the queue rejects it.
pub async fn enqueue_best_effort(queue: &dyn EmailQueue, job: EmailJob) {
    let to = job.to.clone();
    if let Err(e) = queue.enqueue(job).await {
        tracing::warn!(to = %to, error = %e, "Email could not be queued");
    }
}
