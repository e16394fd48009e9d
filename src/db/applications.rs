//! Postgres-backed application repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::application::{Application, ApplicationRepository, RepositoryError};
use crate::models::{Page, PageRequest};

const UPSERT_APPLICATION: &str = r#"
    INSERT INTO applications (
        id, amount, term, email, document, status_id, loan_type_id,
        user_id, created_at, updated_at, approved_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    ON CONFLICT (id) DO UPDATE SET
        amount = EXCLUDED.amount,
        term = EXCLUDED.term,
        email = EXCLUDED.email,
        document = EXCLUDED.document,
        status_id = EXCLUDED.status_id,
        loan_type_id = EXCLUDED.loan_type_id,
        updated_at = EXCLUDED.updated_at,
        approved_at = EXCLUDED.approved_at
    RETURNING *
"#;

/// Insert or update an application on any Postgres executor (pool or open transaction)
pub(crate) async fn upsert_application<'e, E>(
    executor: E,
    application: &Application,
) -> Result<Application, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Application>(UPSERT_APPLICATION)
        .bind(application.id)
        .bind(application.amount)
        .bind(application.term)
        .bind(&application.email)
        .bind(&application.document)
        .bind(application.status_id)
        .bind(application.loan_type_id)
        .bind(application.user_id)
        .bind(application.created_at)
        .bind(application.updated_at)
        .bind(application.approved_at)
        .fetch_one(executor)
        .await
}

/// Map a requested sort field onto a known column
fn sort_column(field: &str) -> &'static str {
    match field {
        "amount" => "amount",
        "term" => "term",
        "email" => "email",
        "updated_at" | "updatedAt" => "updated_at",
        _ => "created_at",
    }
}

#[derive(Clone)]
pub struct PgApplicationRepository {
    db_pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn save(&self, application: Application) -> Result<Application, RepositoryError> {
        Ok(upsert_application(&self.db_pool, &application).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, RepositoryError> {
        let application = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(application)
    }

    async fn find_by_status_in(
        &self,
        status_ids: &[Uuid],
        page: &PageRequest,
    ) -> Result<Page<Application>, RepositoryError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM applications WHERE status_id = ANY($1)")
                .bind(status_ids)
                .fetch_one(&self.db_pool)
                .await?;

        let mut query_builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM applications WHERE status_id = ANY(");
        query_builder.push_bind(status_ids);
        query_builder.push(")");

        let (column, direction) = match &page.sort {
            Some(sort) => (sort_column(&sort.field), sort.direction.as_sql()),
            None => ("created_at", "DESC"),
        };
        query_builder.push(format!(" ORDER BY {} {}, id ASC LIMIT ", column, direction));
        query_builder.push_bind(i64::from(page.size));
        query_builder.push(" OFFSET ");
        query_builder.push_bind(page.offset());

        let content = query_builder
            .build_query_as::<Application>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Page::new(content, page, total))
    }

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status_id: Uuid,
    ) -> Result<Vec<Application>, RepositoryError> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE user_id = $1 AND status_id = $2",
        )
        .bind(user_id)
        .bind(status_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(applications)
    }

    async fn find_by_status_and_approved_between(
        &self,
        status_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Application>, RepositoryError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE status_id = $1 AND approved_at >= $2 AND approved_at < $3
            ORDER BY approved_at
            "#,
        )
        .bind(status_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(applications)
    }
}
