use crate::Window;
use review_status::QueryError;

/// One project's count of items awaiting first-stage review within an
/// evaluation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBacklog {
    pub reference: String,
    pub name: String,
    pub awaiting_first: u64,
}

/// BacklogSource supplies the per-project first-stage backlog the scheduler
/// evaluates each cycle.
#[async_trait::async_trait]
pub trait BacklogSource: Send + Sync {
    async fn first_stage_backlog(
        &self,
        client_ref: &str,
        window: Window,
    ) -> Result<Vec<ProjectBacklog>, QueryError>;
}

#[async_trait::async_trait]
impl BacklogSource for sqlx::PgPool {
    async fn first_stage_backlog(
        &self,
        client_ref: &str,
        window: Window,
    ) -> Result<Vec<ProjectBacklog>, QueryError> {
        let rows = review_sql::backlog::fetch_recent_first_stage_backlog(
            client_ref,
            window.start,
            window.end,
            self,
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ProjectBacklog {
                reference: row.reference,
                name: row.name,
                awaiting_first: row.awaiting_first.max(0) as u64,
            })
            .collect())
    }
}
