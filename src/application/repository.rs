//! Persistence contracts used by the application workflows

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::{Application, LoanType, Status};
use crate::models::{Page, PageRequest};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert or update, returning the stored record
    async fn save(&self, application: Application) -> Result<Application, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, RepositoryError>;

    async fn find_by_status_in(
        &self,
        status_ids: &[Uuid],
        page: &PageRequest,
    ) -> Result<Page<Application>, RepositoryError>;

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status_id: Uuid,
    ) -> Result<Vec<Application>, RepositoryError>;

    /// Applications in `status_id` whose `approved_at` lies in `[start, end)`
    async fn find_by_status_and_approved_between(
        &self,
        status_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Application>, RepositoryError>;
}

#[async_trait]
pub trait LoanTypeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LoanType>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<LoanType>, RepositoryError>;
}

#[async_trait]
pub trait StatusRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Status>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Status>, RepositoryError>;
    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<Status>, RepositoryError>;
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Status>, RepositoryError>;
}

/// Opens all-or-nothing units of work against the store.
#[async_trait]
pub trait TransactionScope: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}

/// Reads and writes bound to one open transaction.
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] rolls it back.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_loan_type(&mut self, id: Uuid) -> Result<Option<LoanType>, RepositoryError>;
    async fn find_status_by_name(&mut self, name: &str) -> Result<Option<Status>, RepositoryError>;
    async fn save_application(
        &mut self,
        application: Application,
    ) -> Result<Application, RepositoryError>;
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
