//! Postgres unit of work for the registration workflow

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::applications::upsert_application;
use super::reference_data::{loan_type_by_id, status_by_name};
use crate::application::{Application, LoanType, RepositoryError, Status, TransactionScope, UnitOfWork};

#[derive(Clone)]
pub struct PgTransactionScope {
    db_pool: PgPool,
}

impl PgTransactionScope {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TransactionScope for PgTransactionScope {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let tx = self.db_pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Open Postgres transaction; sqlx rolls it back on drop unless committed
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_loan_type(&mut self, id: Uuid) -> Result<Option<LoanType>, RepositoryError> {
        Ok(loan_type_by_id(&mut *self.tx, id).await?)
    }

    async fn find_status_by_name(&mut self, name: &str) -> Result<Option<Status>, RepositoryError> {
        Ok(status_by_name(&mut *self.tx, name).await?)
    }

    async fn save_application(&mut self, application: Application) -> Result<Application, RepositoryError> {
        Ok(upsert_application(&mut *self.tx, &application).await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}
