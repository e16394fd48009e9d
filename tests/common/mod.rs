//! In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use lendflow_server::application::{
    Application, ApplicationRepository, DailyReport, DecisionResponse, LoanType,
    LoanTypeRepository, RepositoryError, Status, StatusRepository, TransactionScope, UnitOfWork,
    UserIdentity, ValidatedUser,
};
use lendflow_server::config::ConfigProvider;
use lendflow_server::gateways::{
    AuthGateway, GatewayError, NotificationGateway, ReportingGateway,
};
use lendflow_server::models::{Page, PageRequest};

pub fn status(name: &str) -> Status {
    Status {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{} applications", name),
    }
}

/// Pending Review, Approved, Rejected and Manual Review
pub fn standard_statuses() -> Vec<Status> {
    [
        Status::PENDING_REVIEW,
        Status::APPROVED,
        Status::REJECTED,
        Status::MANUAL_REVIEW,
    ]
    .iter()
    .map(|name| status(name))
    .collect()
}

pub fn find_status<'a>(statuses: &'a [Status], name: &str) -> &'a Status {
    statuses
        .iter()
        .find(|status| status.name == name)
        .expect("status fixture missing")
}

pub fn loan_type(name: &str, min: i64, max: i64, rate: Decimal) -> LoanType {
    LoanType {
        id: Uuid::new_v4(),
        name: name.to_string(),
        min_amount: Decimal::from(min),
        max_amount: Decimal::from(max),
        interest_rate: rate,
        automatic_validation: false,
    }
}

pub fn application(
    user_id: Uuid,
    status: &Status,
    loan_type: &LoanType,
    amount: Decimal,
    term: i32,
) -> Application {
    let now = Utc::now();
    Application {
        id: Uuid::new_v4(),
        amount,
        term,
        email: "applicant@example.com".to_string(),
        document: "1020304050".to_string(),
        status_id: status.id,
        loan_type_id: loan_type.id,
        user_id,
        created_at: now,
        updated_at: now,
        approved_at: None,
    }
}

pub fn identity(id: Uuid, first_name: &str, last_name: &str, salary: i64) -> UserIdentity {
    UserIdentity {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@example.com", first_name.to_lowercase()),
        document: id.simple().to_string()[..10].to_string(),
        base_salary: Decimal::from(salary),
    }
}

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("injected failure".to_string())
}

// Repositories

#[derive(Default)]
pub struct InMemoryApplications {
    pub records: Mutex<Vec<Application>>,
    pub saves: AtomicUsize,
    pub id_lookups: AtomicUsize,
    pub page_queries: AtomicUsize,
    pub fail_saves: AtomicBool,
}

impl InMemoryApplications {
    pub fn with(records: Vec<Application>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Application> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|application| application.id == id)
            .cloned()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplications {
    async fn save(&self, application: Application) -> Result<Application, RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut records = self.records.lock().unwrap();
        records.retain(|existing| existing.id != application.id);
        records.push(application.clone());
        Ok(application)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, RepositoryError> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(id))
    }

    async fn find_by_status_in(
        &self,
        status_ids: &[Uuid],
        page: &PageRequest,
    ) -> Result<Page<Application>, RepositoryError> {
        self.page_queries.fetch_add(1, Ordering::SeqCst);

        let mut matching: Vec<Application> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|application| status_ids.contains(&application.status_id))
            .cloned()
            .collect();
        matching.sort_by_key(|application| application.created_at);

        let total = matching.len() as i64;
        let content = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status_id: Uuid,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|application| application.user_id == user_id && application.status_id == status_id)
            .cloned()
            .collect())
    }

    async fn find_by_status_and_approved_between(
        &self,
        status_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|application| application.status_id == status_id)
            .filter(|application| {
                application
                    .approved_at
                    .map_or(false, |approved_at| approved_at >= start && approved_at < end)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryLoanTypes {
    pub loan_types: Vec<LoanType>,
    pub lookups: AtomicUsize,
}

impl InMemoryLoanTypes {
    pub fn with(loan_types: Vec<LoanType>) -> Self {
        Self {
            loan_types,
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LoanTypeRepository for InMemoryLoanTypes {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LoanType>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.loan_types.iter().find(|lt| lt.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<LoanType>, RepositoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.loan_types.iter().find(|lt| lt.name == name).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryStatuses {
    pub statuses: Vec<Status>,
}

impl InMemoryStatuses {
    pub fn with(statuses: Vec<Status>) -> Self {
        Self { statuses }
    }
}

#[async_trait]
impl StatusRepository for InMemoryStatuses {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Status>, RepositoryError> {
        Ok(self.statuses.iter().find(|status| status.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Status>, RepositoryError> {
        Ok(self.statuses.iter().find(|status| status.name == name).cloned())
    }

    async fn find_by_name_ignore_case(
        &self,
        name: &str,
    ) -> Result<Option<Status>, RepositoryError> {
        Ok(self
            .statuses
            .iter()
            .find(|status| status.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Status>, RepositoryError> {
        Ok(self
            .statuses
            .iter()
            .filter(|status| names.contains(&status.name))
            .cloned()
            .collect())
    }
}

// Transactions

/// Shared bookkeeping for one in-memory transaction scope
#[derive(Default)]
pub struct TransactionLog {
    pub committed: Mutex<Vec<Application>>,
    pub begun: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
    pub writes: AtomicUsize,
}

pub struct InMemoryTransactions {
    pub loan_types: Vec<LoanType>,
    pub statuses: Vec<Status>,
    pub log: Arc<TransactionLog>,
    pub fail_saves: bool,
}

impl InMemoryTransactions {
    pub fn new(loan_types: Vec<LoanType>, statuses: Vec<Status>) -> Self {
        Self {
            loan_types,
            statuses,
            log: Arc::new(TransactionLog::default()),
            fail_saves: false,
        }
    }
}

#[async_trait]
impl TransactionScope for InMemoryTransactions {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        self.log.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryUnitOfWork {
            loan_types: self.loan_types.clone(),
            statuses: self.statuses.clone(),
            log: self.log.clone(),
            pending: Vec::new(),
            committed: false,
            fail_saves: self.fail_saves,
        }))
    }
}

pub struct InMemoryUnitOfWork {
    loan_types: Vec<LoanType>,
    statuses: Vec<Status>,
    log: Arc<TransactionLog>,
    pending: Vec<Application>,
    committed: bool,
    fail_saves: bool,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_loan_type(&mut self, id: Uuid) -> Result<Option<LoanType>, RepositoryError> {
        Ok(self.loan_types.iter().find(|lt| lt.id == id).cloned())
    }

    async fn find_status_by_name(&mut self, name: &str) -> Result<Option<Status>, RepositoryError> {
        Ok(self.statuses.iter().find(|status| status.name == name).cloned())
    }

    async fn save_application(
        &mut self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.log.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(unavailable());
        }
        self.pending.push(application.clone());
        Ok(application)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut this = self;
        let pending = std::mem::take(&mut this.pending);
        this.log.committed.lock().unwrap().extend(pending);
        this.log.commits.fetch_add(1, Ordering::SeqCst);
        this.committed = true;
        Ok(())
    }
}

impl Drop for InMemoryUnitOfWork {
    fn drop(&mut self) {
        if !self.committed {
            self.log.rollbacks.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// Gateways

#[derive(Default)]
pub struct StubAuthGateway {
    pub users: HashMap<Uuid, UserIdentity>,
    pub documents: HashMap<String, ValidatedUser>,
    pub batch_calls: AtomicUsize,
}

impl StubAuthGateway {
    pub fn with_users(users: Vec<UserIdentity>) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
            ..Default::default()
        }
    }

    pub fn register_document(&mut self, document: &str, user_id: Uuid) {
        self.documents.insert(
            document.to_string(),
            ValidatedUser {
                id: user_id,
                email: "client@example.com".to_string(),
                document: document.to_string(),
                role: "CLIENT".to_string(),
            },
        );
    }
}

#[async_trait]
impl AuthGateway for StubAuthGateway {
    async fn resolve_user_by_document(
        &self,
        document: &str,
        _token: &str,
    ) -> Result<ValidatedUser, GatewayError> {
        self.documents.get(document).cloned().ok_or_else(|| {
            GatewayError::Unauthorized(format!("Document {} is not registered", document))
        })
    }

    async fn resolve_users_by_ids(
        &self,
        ids: &[Uuid],
        _token: &str,
    ) -> Result<HashMap<Uuid, UserIdentity>, GatewayError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|user| (*id, user.clone())))
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingNotifications {
    pub status_notifications: Mutex<Vec<(Uuid, String)>>,
    pub decision_responses: Mutex<Vec<DecisionResponse>>,
}

impl RecordingNotifications {
    pub fn sent_count(&self) -> usize {
        self.status_notifications.lock().unwrap().len()
            + self.decision_responses.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotifications {
    async fn send_status_notification(
        &self,
        application: &Application,
        status_name: &str,
    ) -> Result<(), GatewayError> {
        self.status_notifications
            .lock()
            .unwrap()
            .push((application.id, status_name.to_string()));
        Ok(())
    }

    async fn send_decision_response(&self, payload: &DecisionResponse) -> Result<(), GatewayError> {
        self.decision_responses.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReporting {
    pub approved_counts: Mutex<Vec<(Uuid, String)>>,
    pub daily_reports: Mutex<Vec<DailyReport>>,
    pub fail: AtomicBool,
}

impl RecordingReporting {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ReportingGateway for RecordingReporting {
    async fn send_approved_count(
        &self,
        application: &Application,
        status_name: &str,
    ) -> Result<(), GatewayError> {
        self.approved_counts
            .lock()
            .unwrap()
            .push((application.id, status_name.to_string()));

        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                status: 503,
                body: "reporting queue unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn send_daily_report(&self, report: &DailyReport) -> Result<(), GatewayError> {
        self.daily_reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

// Configuration

pub struct StaticConfig {
    pub timezone: String,
    pub cutoff: NaiveTime,
}

impl StaticConfig {
    pub fn utc() -> Self {
        Self {
            timezone: "UTC".to_string(),
            cutoff: NaiveTime::from_hms_opt(3, 0, 0).unwrap(),
        }
    }
}

impl ConfigProvider for StaticConfig {
    fn timezone(&self) -> String {
        self.timezone.clone()
    }

    fn report_cutoff(&self) -> NaiveTime {
        self.cutoff
    }
}
