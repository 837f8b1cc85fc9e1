use serde::Serialize;
use sqlx::FromRow;

/// Row of the per-client project listing.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProjectRow {
    pub reference: String,
    pub name: String,
}

/// Fetches all projects owned by `client_ref`, ordered by name. When
/// `name_filter` is given, restricts to projects whose name contains it,
/// case-insensitively.
#[tracing::instrument(level = "debug", skip(db))]
pub async fn fetch_projects_for_client(
    client_ref: &str,
    name_filter: Option<&str>,
    db: impl sqlx::PgExecutor<'_>,
) -> sqlx::Result<Vec<ProjectRow>> {
    sqlx::query_as::<_, ProjectRow>(
        r#"select ref as reference, name
        from projects
        where clientref = $1
          and ($2::text is null or name ilike '%' || $2 || '%')
        order by name asc;"#,
    )
    .bind(client_ref)
    .bind(name_filter)
    .fetch_all(db)
    .await
}

/// Counts the projects owned by `client_ref`. An unknown client simply has
/// zero projects.
#[tracing::instrument(level = "debug", skip(db))]
pub async fn fetch_project_count(
    client_ref: &str,
    db: impl sqlx::PgExecutor<'_>,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("select count(*) from projects where clientref = $1;")
        .bind(client_ref)
        .fetch_one(db)
        .await
}
