//! Queue service

use campus_core::{DomainError, Queue, Snowflake};
use tracing::{info, instrument};

use crate::dto::{QueueRequest, QueueResponse};

use super::access::{load_caller, require_admin};
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct QueueService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueueService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All queues by title; public
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<QueueResponse>> {
        let queues = self.ctx.queue_repo().list().await?;
        Ok(queues.into_iter().map(QueueResponse::from).collect())
    }

    /// Same listing behind the admin check
    #[instrument(skip(self))]
    pub async fn list_for_admin(&self, caller_id: Snowflake) -> ServiceResult<Vec<QueueResponse>> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;
        self.list().await
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(&self, caller_id: Snowflake, request: QueueRequest) -> ServiceResult<QueueResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let queue = Queue::new(self.ctx.generate_id(), request.title.trim().to_string());
        self.ctx.queue_repo().create(&queue).await?;

        info!(queue_id = %queue.id, "Queue created");
        Ok(queue.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller_id: Snowflake,
        queue_id: Snowflake,
        request: QueueRequest,
    ) -> ServiceResult<QueueResponse> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        let mut queue = self
            .ctx
            .queue_repo()
            .find_by_id(queue_id)
            .await?
            .ok_or(DomainError::QueueNotFound(queue_id))?;
        queue.set_title(request.title.trim().to_string());
        self.ctx.queue_repo().update(&queue).await?;

        Ok(queue.into())
    }

    /// Queues that still hold tickets cannot be deleted
    #[instrument(skip(self))]
    pub async fn delete(&self, caller_id: Snowflake, queue_id: Snowflake) -> ServiceResult<()> {
        let caller = load_caller(self.ctx, caller_id).await?;
        require_admin(&caller)?;

        self.ctx.queue_repo().delete(queue_id).await?;
        info!(queue_id = %queue_id, "Queue deleted");
        Ok(())
    }
}
