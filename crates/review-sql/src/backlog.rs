use crate::ReviewStage;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One project's count of distinct items awaiting first-stage review whose
/// timestamp falls within the queried window.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BacklogRow {
    pub reference: String,
    pub name: String,
    pub awaiting_first: i64,
}

/// Fetches, per project of `client_ref`, the distinct count of items which
/// await first-stage review and whose timestamp is within the inclusive
/// `[window_start, window_end]` range. Projects with no such items are
/// omitted: they cannot breach any positive threshold.
#[tracing::instrument(level = "debug", skip(db))]
pub async fn fetch_recent_first_stage_backlog(
    client_ref: &str,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    db: impl sqlx::PgExecutor<'_>,
) -> sqlx::Result<Vec<BacklogRow>> {
    let query = format!(
        r#"select
            p.ref as reference,
            p.name,
            count(distinct tr.id) as awaiting_first
        from projects p
        join streams s on s.projectref = p.ref
        join rule_record rr on rr.stream = s.ref
        join rule_tweets rt on rt.rule_id = rr.id
        join tweet_record tr on tr.id = rt.tweet_id
        where p.clientref = $1
          and ({predicate})
          and tr.dtime >= $2
          and tr.dtime <= $3
        group by p.ref, p.name
        order by p.name asc, p.ref asc;"#,
        predicate = ReviewStage::AwaitingFirst.predicate(),
    );

    sqlx::query_as::<_, BacklogRow>(&query)
        .bind(client_ref)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(db)
        .await
}
