use sg_core::services::auth::PasswordResetNotifier;

use crate::notifier::{mask_email, LogResetNotifier};

#[test]
fn test_mask_email() {
    assert_eq!(mask_email("alice@example.com"), "a****@example.com");
    assert_eq!(mask_email("@example.com"), "****@example.com");
    assert_eq!(mask_email("nobody"), "******");
}

#[tokio::test]
async fn test_send_counts_deliveries() {
    let notifier = LogResetNotifier::new();
    let shared = notifier.clone();

    notifier
        .send_reset_token("alice@example.com", "0123456789abcdef")
        .await
        .unwrap();
    notifier
        .send_reset_token("bob@example.com", "fedcba9876543210")
        .await
        .unwrap();

    assert_eq!(shared.sent_count(), 2);
}
