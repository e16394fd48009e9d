//! Advisor status transition tests

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rust_decimal_macros::dec;
use uuid::Uuid;

use common::*;
use lendflow_server::application::{Application, Status, StatusTransitionWorkflow, WorkflowError};

struct Fixture {
    applications: Arc<InMemoryApplications>,
    notifications: Arc<RecordingNotifications>,
    reporting: Arc<RecordingReporting>,
    workflow: StatusTransitionWorkflow,
    application: Application,
    statuses: Vec<Status>,
}

fn fixture(reporting: RecordingReporting) -> Fixture {
    let statuses = standard_statuses();
    let loan_type = loan_type("Mortgage", 10_000, 500_000, dec!(9.5));
    let application = application(
        Uuid::new_v4(),
        find_status(&statuses, Status::MANUAL_REVIEW),
        &loan_type,
        dec!(120000),
        240,
    );

    let applications = Arc::new(InMemoryApplications::with(vec![application.clone()]));
    let notifications = Arc::new(RecordingNotifications::default());
    let reporting = Arc::new(reporting);
    let workflow = StatusTransitionWorkflow::new(
        applications.clone(),
        Arc::new(InMemoryStatuses::with(statuses.clone())),
        notifications.clone(),
        reporting.clone(),
    );

    Fixture {
        applications,
        notifications,
        reporting,
        workflow,
        application,
        statuses,
    }
}

#[tokio::test]
async fn test_unknown_status_fails_before_any_lookup() {
    let fx = fixture(RecordingReporting::default());

    let err = fx
        .workflow
        .update_status(fx.application.id, "Archived")
        .await
        .unwrap_err();

    match err {
        WorkflowError::EntityNotFound(message) => assert_eq!(message, "Invalid status: Archived"),
        other => panic!("expected EntityNotFound, got {:?}", other),
    }
    assert_eq!(fx.applications.id_lookups.load(Ordering::SeqCst), 0);
    assert_eq!(fx.notifications.sent_count(), 0);
    assert!(fx.reporting.approved_counts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_application_is_not_found() {
    let fx = fixture(RecordingReporting::default());

    let err = fx
        .workflow
        .update_status(Uuid::new_v4(), "Rejected")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::EntityNotFound(ref m) if m == "Application not found"));
    assert_eq!(fx.applications.saves.load(Ordering::SeqCst), 0);
    assert_eq!(fx.notifications.sent_count(), 0);
}

#[tokio::test]
async fn test_approval_notifies_and_reports() {
    let fx = fixture(RecordingReporting::default());

    let saved = fx
        .workflow
        .update_status(fx.application.id, "APPROVED")
        .await
        .unwrap();

    assert_eq!(saved.status_id, find_status(&fx.statuses, Status::APPROVED).id);
    assert!(saved.approved_at.is_some());

    let notifications = fx.notifications.status_notifications.lock().unwrap();
    assert_eq!(notifications.as_slice(), &[(saved.id, "Approved".to_string())]);

    let reports = fx.reporting.approved_counts.lock().unwrap();
    assert_eq!(reports.as_slice(), &[(saved.id, "Approved".to_string())]);
}

#[tokio::test]
async fn test_rejection_only_notifies() {
    let fx = fixture(RecordingReporting::default());

    let saved = fx
        .workflow
        .update_status(fx.application.id, "Rejected")
        .await
        .unwrap();

    assert_eq!(saved.status_id, find_status(&fx.statuses, Status::REJECTED).id);
    assert!(saved.approved_at.is_none());
    assert_eq!(fx.notifications.status_notifications.lock().unwrap().len(), 1);
    assert!(fx.reporting.approved_counts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_report_failure_surfaces_after_notification() {
    let fx = fixture(RecordingReporting::failing());

    let err = fx
        .workflow
        .update_status(fx.application.id, "Approved")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Gateway(_)));

    // Notification and save are not undone
    assert_eq!(fx.notifications.status_notifications.lock().unwrap().len(), 1);
    let stored = fx.applications.get(fx.application.id).unwrap();
    assert_eq!(stored.status_id, find_status(&fx.statuses, Status::APPROVED).id);
}
