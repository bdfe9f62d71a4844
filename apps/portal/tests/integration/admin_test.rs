use portal::domain::types::{ADMINS_COLLECTION, AdminCredentials, AdminRecord, FlowState};
use portal::error::{ErrorKind, PortalError};
use portal::usecase::admin::AdminLoginFlow;

use crate::helpers::*;

fn flow() -> (
    AdminLoginFlow<MockRecordStore, MockEmailSender>,
    MockRecordStore,
    MockEmailSender,
) {
    let records = MockRecordStore::default();
    let email = MockEmailSender::default();
    let flow = AdminLoginFlow::new(records.clone(), email.clone());
    (flow, records, email)
}

fn creds(identifier: &str, password: &str) -> AdminCredentials {
    AdminCredentials {
        identifier: identifier.into(),
        password: password.into(),
    }
}

fn insert_admin(records: &MockRecordStore, id: &str, username: &str, email: &str, password: &str) {
    let record = AdminRecord {
        username: username.into(),
        email: email.into(),
        password: password.into(),
    };
    records.insert(ADMINS_COLLECTION, id, record.to_fields());
}

#[tokio::test]
async fn should_complete_admin_login_by_username() {
    let (mut flow, records, email) = flow();
    seed_admin(&records, 7);

    flow.submit_credentials(creds("admin7", "admin7_password"))
        .await
        .unwrap();
    assert_eq!(flow.state(), FlowState::AwaitingOtp);
    assert_eq!(email.last_recipient(), "admin7@yourdomain.com");

    let admin = flow.submit_code(&email.last_code()).await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);
    assert_eq!(admin.username, "admin7");
}

#[tokio::test]
async fn should_complete_admin_login_by_email() {
    let (mut flow, records, email) = flow();
    seed_admin(&records, 3);

    flow.submit_credentials(creds("admin3@yourdomain.com", "admin3_password"))
        .await
        .unwrap();
    assert_eq!(email.send_count(), 1);

    let admin = flow.submit_code(&email.last_code()).await.unwrap();
    assert_eq!(admin.email, "admin3@yourdomain.com");
}

#[tokio::test]
async fn should_treat_first_match_as_canonical_for_duplicate_username() {
    let (mut flow, records, email) = flow();
    // Two records share the username; document order decides which
    // one wins.
    insert_admin(
        &records,
        "doc-a",
        "admin7",
        "admin7@yourdomain.com",
        "admin7_password",
    );
    insert_admin(
        &records,
        "doc-b",
        "admin7",
        "second@yourdomain.com",
        "second_password",
    );

    flow.submit_credentials(creds("admin7", "admin7_password"))
        .await
        .unwrap();
    assert_eq!(email.send_count(), 1);
    assert_eq!(email.last_recipient(), "admin7@yourdomain.com");

    let admin = flow.submit_code(&email.last_code()).await.unwrap();
    assert_eq!(admin.email, "admin7@yourdomain.com");
}

#[tokio::test]
async fn should_prefer_email_match_when_username_collides_with_it() {
    let (mut flow, records, email) = flow();
    // One record's username equals another record's email; the email
    // lookup runs first, so that record is canonical.
    insert_admin(
        &records,
        "doc-a",
        "root",
        "root@yourdomain.com",
        "root_password",
    );
    insert_admin(
        &records,
        "doc-b",
        "root@yourdomain.com",
        "backup@yourdomain.com",
        "backup_password",
    );

    flow.submit_credentials(creds("root@yourdomain.com", "root_password"))
        .await
        .unwrap();
    assert_eq!(email.send_count(), 1);
    assert_eq!(email.last_recipient(), "root@yourdomain.com");

    let admin = flow.submit_code(&email.last_code()).await.unwrap();
    assert_eq!(admin.username, "root");
}

#[tokio::test]
async fn should_fail_unknown_identifier_without_sending_email() {
    let (mut flow, records, email) = flow();
    seed_admin(&records, 7);

    let result = flow
        .submit_credentials(creds("nobody@x.com", "whatever-password"))
        .await;
    assert!(matches!(result, Err(PortalError::NotFound)));
    assert_eq!(flow.state(), FlowState::Failed(ErrorKind::NotFound));
    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn should_fail_wrong_password_without_sending_email() {
    let (mut flow, records, email) = flow();
    seed_admin(&records, 7);

    let result = flow.submit_credentials(creds("admin7", "wrong-password")).await;
    assert!(matches!(result, Err(PortalError::CredentialMismatch)));
    assert_eq!(
        flow.state(),
        FlowState::Failed(ErrorKind::CredentialMismatch)
    );
    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn should_reject_empty_identifier_before_lookup() {
    let (mut flow, _, email) = flow();
    let result = flow.submit_credentials(creds("", "some-password")).await;
    assert!(matches!(result, Err(PortalError::Validation(_))));
    assert_eq!(flow.state(), FlowState::CollectingCredentials);
    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn should_not_accept_credentials_after_terminal_failure() {
    let (mut flow, records, _) = flow();
    seed_admin(&records, 7);

    let _ = flow.submit_credentials(creds("admin7", "wrong-password")).await;
    let retry = flow
        .submit_credentials(creds("admin7", "admin7_password"))
        .await;
    assert!(matches!(retry, Err(PortalError::InvalidState)));
}
