use portal::domain::types::{Attachment, FlowState, SignupForm, USERS_COLLECTION};
use portal::error::{ErrorKind, PortalError};
use portal::usecase::signup::SignupFlow;

use crate::helpers::*;

fn form() -> SignupForm {
    let attachment = |name: &str, content_type: &str| Attachment {
        file_name: name.to_owned(),
        content_type: content_type.to_owned(),
        bytes: vec![1, 2, 3],
    };
    SignupForm {
        full_name: "Alice Kumar".into(),
        dob: "2001-04-12".into(),
        email: "alice@example.com".into(),
        mobile_number: "9876543210".into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        aadhaar_number: "123456789012".into(),
        profile_pic: attachment("pic.png", "image/png"),
        id_proof: attachment("id.pdf", "application/pdf"),
        academic_records: attachment("records.pdf", "application/pdf"),
    }
}

fn flow_with(
    identity: MockIdentityProvider,
) -> (
    SignupFlow<MockIdentityProvider, MockRecordStore, MockBlobStore, MockEmailSender>,
    MockRecordStore,
    MockBlobStore,
    MockEmailSender,
) {
    let records = MockRecordStore::default();
    let blobs = MockBlobStore::default();
    let email = MockEmailSender::default();
    let flow = SignupFlow::new(identity, records.clone(), blobs.clone(), email.clone());
    (flow, records, blobs, email)
}

#[tokio::test]
async fn should_register_account_end_to_end() {
    let identity = MockIdentityProvider::default();
    let (mut flow, records, blobs, email) = flow_with(identity.clone());

    flow.submit(form()).await.unwrap();
    assert_eq!(flow.state(), FlowState::AwaitingOtp);
    assert_eq!(email.send_count(), 1);

    let session = flow.submit_code(&email.last_code()).await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);

    // Identity account created with the plaintext secret.
    assert!(
        identity
            .accounts
            .lock()
            .unwrap()
            .contains_key("alice@example.com")
    );

    // All three documents uploaded under their own prefixes.
    let uploads = blobs.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 3);
    assert_eq!(uploads[0].0, "profilePics/pic.png");
    assert_eq!(uploads[1].0, "idProofs/id.pdf");
    assert_eq!(uploads[2].0, "academicRecords/records.pdf");

    // Profile record stored under the new account id, secret hashed.
    let stored = records.fetch(USERS_COLLECTION, &session.user_id).unwrap();
    assert_eq!(stored["fullName"], "Alice Kumar");
    assert!(stored["passwordHash"].starts_with("$argon2"));
    assert_eq!(
        stored["profilePicUrl"],
        "https://blobs.test/profilePics/pic.png"
    );
}

#[tokio::test]
async fn should_reject_password_mismatch_before_any_email() {
    let (mut flow, _, _, email) = flow_with(MockIdentityProvider::default());
    let mut bad = form();
    bad.confirm_password = "different".into();

    let result = flow.submit(bad).await;
    assert!(
        matches!(result, Err(PortalError::Validation(ref m)) if m == "Passwords do not match")
    );
    assert_eq!(flow.state(), FlowState::CollectingCredentials);
    assert_eq!(email.send_count(), 0);
}

#[tokio::test]
async fn should_fail_terminally_when_email_already_registered() {
    let identity = MockIdentityProvider::default().with_account(
        "alice@example.com",
        "uid-1",
        "existing-password",
    );
    let (mut flow, records, _, email) = flow_with(identity);

    flow.submit(form()).await.unwrap();
    let result = flow.submit_code(&email.last_code()).await;

    assert!(matches!(result, Err(PortalError::Validation(_))));
    assert_eq!(flow.state(), FlowState::Failed(ErrorKind::Validation));
    assert!(records.docs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_allow_resend_while_awaiting_code() {
    let (mut flow, _, _, email) = flow_with(MockIdentityProvider::default());
    flow.submit(form()).await.unwrap();
    flow.resend_code().await.unwrap();
    assert_eq!(email.send_count(), 2);

    flow.submit_code(&email.last_code()).await.unwrap();
    assert_eq!(flow.state(), FlowState::Verified);
}

#[tokio::test]
async fn should_reject_second_submission_while_awaiting_code() {
    let (mut flow, _, _, _) = flow_with(MockIdentityProvider::default());
    flow.submit(form()).await.unwrap();
    let result = flow.submit(form()).await;
    assert!(matches!(result, Err(PortalError::InvalidState)));
}
