use portal::domain::types::{FlowState, LoginForm, USERS_COLLECTION};
use portal::error::{ErrorKind, PortalError};
use portal::usecase::login::UserLoginFlow;

use crate::helpers::*;

fn form() -> LoginForm {
    LoginForm {
        aadhaar_number: "123456789012".into(),
        email: "alice@example.com".into(),
        password: "secret1".into(),
    }
}

fn flow_with(
    identity: MockIdentityProvider,
) -> (
    UserLoginFlow<MockIdentityProvider, MockRecordStore, MockEmailSender>,
    MockRecordStore,
    MockEmailSender,
) {
    let records = MockRecordStore::default();
    let email = MockEmailSender::default();
    let flow = UserLoginFlow::new(identity, records.clone(), email.clone());
    (flow, records, email)
}

#[tokio::test]
async fn should_complete_student_login_with_emailed_code() {
    let identity = MockIdentityProvider::default().with_account(
        "alice@example.com",
        "uid-1",
        "secret1",
    );
    let (mut flow, _, email) = flow_with(identity);

    flow.submit_credentials(form()).await.unwrap();
    assert_eq!(flow.state(), FlowState::AwaitingOtp);
    assert_eq!(email.send_count(), 1);
    assert_eq!(email.last_recipient(), "alice@example.com");

    let code = email.last_code();
    let numeric: u32 = code.parse().unwrap();
    assert!((100_000..=999_999).contains(&numeric));

    let session = flow.submit_code(&code).await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);
    assert_eq!(session.user_id, "uid-1");
    assert_eq!(email.send_count(), 1);
}

#[tokio::test]
async fn should_reject_invalid_aadhaar_without_sending_email() {
    let (mut flow, _, email) = flow_with(MockIdentityProvider::default());
    let result = flow
        .submit_credentials(LoginForm {
            aadhaar_number: "12345".into(),
            ..form()
        })
        .await;
    assert!(matches!(result, Err(PortalError::Validation(_))));
    assert_eq!(flow.state(), FlowState::CollectingCredentials);
    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn should_reject_code_before_any_issuance() {
    let (mut flow, _, _) = flow_with(MockIdentityProvider::default());
    let result = flow.submit_code("123456").await;
    assert!(matches!(result, Err(PortalError::InvalidState)));
    assert_eq!(flow.state(), FlowState::CollectingCredentials);
}

#[tokio::test]
async fn should_keep_awaiting_on_wrong_code() {
    let identity = MockIdentityProvider::default().with_account(
        "alice@example.com",
        "uid-1",
        "secret1",
    );
    let (mut flow, _, email) = flow_with(identity);
    flow.submit_credentials(form()).await.unwrap();

    let wrong = if email.last_code() == "000000" {
        "111111"
    } else {
        "000000"
    };
    let result = flow.submit_code(wrong).await;
    assert!(matches!(result, Err(PortalError::OtpMismatch)));
    assert_eq!(flow.state(), FlowState::AwaitingOtp);

    flow.submit_code(&email.last_code()).await.unwrap();
}

#[tokio::test]
async fn should_supersede_code_on_resend() {
    let identity = MockIdentityProvider::default().with_account(
        "alice@example.com",
        "uid-1",
        "secret1",
    );
    let (mut flow, _, email) = flow_with(identity);
    flow.submit_credentials(form()).await.unwrap();
    let first = email.last_code();

    flow.resend_code().await.unwrap();
    assert_eq!(email.send_count(), 2);
    let second = email.last_code();

    if first != second {
        let result = flow.submit_code(&first).await;
        assert!(matches!(result, Err(PortalError::OtpMismatch)));
    }
    flow.submit_code(&second).await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);
}

#[tokio::test]
async fn should_fail_terminally_when_provider_rejects_credential() {
    let identity = MockIdentityProvider::default().with_account(
        "alice@example.com",
        "uid-1",
        "other-password",
    );
    let (mut flow, _, email) = flow_with(identity);
    flow.submit_credentials(form()).await.unwrap();

    let result = flow.submit_code(&email.last_code()).await;
    assert!(matches!(result, Err(PortalError::CredentialMismatch)));
    assert_eq!(
        flow.state(),
        FlowState::Failed(ErrorKind::CredentialMismatch)
    );

    let retry = flow.submit_code(&email.last_code()).await;
    assert!(matches!(retry, Err(PortalError::InvalidState)));
}

#[tokio::test]
async fn should_bypass_challenge_for_known_federated_account() {
    let identity =
        MockIdentityProvider::default().with_federated("uid-9", "gina@example.com");
    let (mut flow, records, email) = flow_with(identity);
    records.insert(USERS_COLLECTION, "uid-9", Default::default());

    let federated = flow.sign_in_with_google().await.unwrap();
    assert_eq!(federated.user_id, "uid-9");
    assert_eq!(flow.state(), FlowState::Verified);
    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn should_fail_federated_login_without_account_record() {
    let identity =
        MockIdentityProvider::default().with_federated("uid-9", "gina@example.com");
    let (mut flow, _, _) = flow_with(identity);

    let result = flow.sign_in_with_google().await;
    assert!(matches!(result, Err(PortalError::NotFound)));
    assert_eq!(flow.state(), FlowState::Failed(ErrorKind::NotFound));
}
