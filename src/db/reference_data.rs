//! Loan type and status lookups

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::application::{LoanType, LoanTypeRepository, RepositoryError, Status, StatusRepository};

pub(crate) async fn loan_type_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<LoanType>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, LoanType>("SELECT * FROM loan_types WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn status_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Status>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
}

#[derive(Clone)]
pub struct PgLoanTypeRepository {
    db_pool: PgPool,
}

impl PgLoanTypeRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl LoanTypeRepository for PgLoanTypeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LoanType>, RepositoryError> {
        Ok(loan_type_by_id(&self.db_pool, id).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<LoanType>, RepositoryError> {
        let loan_type = sqlx::query_as::<_, LoanType>("SELECT * FROM loan_types WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(loan_type)
    }
}

#[derive(Clone)]
pub struct PgStatusRepository {
    db_pool: PgPool,
}

impl PgStatusRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Status>, RepositoryError> {
        let status = sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(status)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Status>, RepositoryError> {
        Ok(status_by_name(&self.db_pool, name).await?)
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Status>, RepositoryError> {
        let status = sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(status)
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Status>, RepositoryError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let statuses = sqlx::query_as::<_, Status>("SELECT * FROM statuses WHERE name = ANY($1)")
            .bind(names)
            .fetch_all(&self.db_pool)
            .await?;

        Ok(statuses)
    }
}
