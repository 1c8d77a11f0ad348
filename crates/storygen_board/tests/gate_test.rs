//! Credential gate behavior.

mod test_utils;

use std::sync::Arc;
use storygen_board::CredentialGate;
use storygen_error::{CredentialErrorKind, StorygenErrorKind};
use test_utils::StaticGuard;

#[tokio::test]
async fn test_gate_reflects_initial_credential() {
    assert!(CredentialGate::open(Arc::new(StaticGuard::present())).await.is_open());

    let closed = CredentialGate::open(Arc::new(StaticGuard::absent(false))).await;
    assert!(!closed.is_open());
    assert!(closed.require().unwrap_err().is_credential());
}

#[tokio::test]
async fn test_select_reverifies_and_opens() -> anyhow::Result<()> {
    let guard = StaticGuard::absent(true);
    let gate = CredentialGate::open(Arc::new(guard.clone())).await;
    let mut rx = gate.subscribe();

    gate.select().await?;

    assert!(gate.is_open());
    assert!(rx.has_changed()?);
    assert!(*rx.borrow_and_update());
    assert_eq!(guard.prompt_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_select_without_usable_key_is_rejected() {
    let guard = StaticGuard::absent(false);
    let gate = CredentialGate::open(Arc::new(guard.clone())).await;

    let err = gate.select().await.unwrap_err();

    assert!(matches!(
        err.kind(),
        StorygenErrorKind::Credential(e) if e.kind == CredentialErrorKind::Rejected
    ));
    assert!(!gate.is_open());
    assert_eq!(guard.prompt_count(), 1);
}
