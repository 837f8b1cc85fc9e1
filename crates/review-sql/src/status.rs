use crate::ReviewStage;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Per-project stage counts for one client, one row per project.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ClientStatusRow {
    pub reference: String,
    pub name: String,
    pub total: i64,
    pub awaiting_first: i64,
    pub awaiting_second: i64,
}

/// Fetches distinct-item stage counts for every project owned by
/// `client_ref`, in one aggregate query. Projects with no associated items
/// still appear, with zero counts, via the left joins. Rows are grouped by
/// project reference so that two projects sharing a name stay distinct.
#[tracing::instrument(level = "debug", skip(db))]
pub async fn fetch_client_status(
    client_ref: &str,
    db: impl sqlx::PgExecutor<'_>,
) -> sqlx::Result<Vec<ClientStatusRow>> {
    let query = format!(
        r#"select
            p.ref as reference,
            p.name,
            count(distinct tr.id) as total,
            count(distinct tr.id) filter (where {first}) as awaiting_first,
            count(distinct tr.id) filter (where {second}) as awaiting_second
        from projects p
        left join streams s on s.projectref = p.ref
        left join rule_record rr on rr.stream = s.ref
        left join rule_tweets rt on rt.rule_id = rr.id
        left join tweet_record tr on tr.id = rt.tweet_id
        where p.clientref = $1
        group by p.ref, p.name
        order by p.name asc, p.ref asc;"#,
        first = ReviewStage::AwaitingFirst.predicate(),
        second = ReviewStage::AwaitingSecond.predicate(),
    );

    sqlx::query_as::<_, ClientStatusRow>(&query)
        .bind(client_ref)
        .fetch_all(db)
        .await
}

/// Counts the distinct items of `project_ref` awaiting `stage`, optionally
/// restricted to items whose timestamp falls within the inclusive
/// `[start, end]` range. Range bounds and the project reference are bound
/// parameters.
#[tracing::instrument(level = "debug", skip(db))]
pub async fn fetch_stage_count(
    project_ref: &str,
    stage: ReviewStage,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    db: impl sqlx::PgExecutor<'_>,
) -> sqlx::Result<i64> {
    let query = format!(
        r#"select count(distinct tr.id)
        from tweet_record tr
        join rule_tweets rt on tr.id = rt.tweet_id
        join rule_record rr on rt.rule_id = rr.id
        join streams s on rr.stream = s.ref
        join projects p on s.projectref = p.ref
        where p.ref = $1
          and ({predicate})
          and ($2::timestamptz is null or tr.dtime >= $2)
          and ($3::timestamptz is null or tr.dtime <= $3);"#,
        predicate = stage.predicate(),
    );

    sqlx::query_scalar::<_, i64>(&query)
        .bind(project_ref)
        .bind(range.map(|(start, _)| start))
        .bind(range.map(|(_, end)| end))
        .fetch_one(db)
        .await
}
