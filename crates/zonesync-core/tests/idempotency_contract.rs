//! Reconciliation Contract Test: Idempotency
//!
//! This test verifies that a second pass over an already-reconciled record
//! set performs no mutations.
//!
//! Constraints verified:
//! - A pass that created a record is followed by an all-skip pass
//! - A pass that updated records is followed by an all-skip pass
//! - Mutating call counts do not grow on repeat passes
//!
//! If this test fails, reconciliation is not idempotent.

mod common;

use common::*;
use zonesync_core::record::{RecordKind, ResolvedAddress};
use zonesync_core::{DecisionStatus, RecordAction, Reconciler};

fn v4(address: &str) -> ResolvedAddress {
    ResolvedAddress {
        address: address.to_string(),
        kind: RecordKind::A,
    }
}

#[tokio::test]
async fn second_pass_after_create_makes_no_changes() {
    let provider = MockProvider::new("mock").with_zone("zone-1", "example.com");
    let handle = MockProvider::sharing_counters_with(&provider);
    let resolved = v4("203.0.113.7");

    // First pass: creates the record.
    let reconciler = Reconciler::new(Box::new(provider), false);
    let actions = reconciler
        .sync(&resolved, "host.example.com", None)
        .await
        .expect("first pass succeeds");
    assert!(matches!(&actions[0], RecordAction::Created { .. }));
    assert_eq!(handle.create_calls(), 1);

    // Second pass over the same provider state: nothing to do.
    let reconciler = Reconciler::new(
        Box::new(MockProvider::sharing_counters_with(&handle)),
        false,
    );
    let actions = reconciler
        .sync(&resolved, "host.example.com", None)
        .await
        .expect("second pass succeeds");

    assert_eq!(actions.len(), 1);
    match &actions[0] {
        RecordAction::Skipped { decision, .. } => {
            assert_eq!(decision.status, DecisionStatus::NoUpdateNeeded);
        }
        other => panic!("expected Skipped, got {other:?}"),
    }
    assert_eq!(handle.create_calls(), 1, "no second create");
    assert_eq!(handle.update_calls(), 0, "no updates at all");
    assert_eq!(handle.delete_calls(), 0);
}

#[tokio::test]
async fn second_pass_after_update_makes_no_changes() {
    let provider = MockProvider::new("mock")
        .with_zone("zone-1", "example.com")
        .with_record(record("rec-1", "host.example.com", "A", "198.51.100.1"))
        .with_record(record("rec-2", "host.example.com", "A", "198.51.100.2"));
    let handle = MockProvider::sharing_counters_with(&provider);
    let resolved = v4("203.0.113.7");

    let reconciler = Reconciler::new(Box::new(provider), false);
    reconciler
        .sync(&resolved, "host.example.com", None)
        .await
        .expect("first pass succeeds");
    assert_eq!(handle.update_calls(), 2);

    let reconciler = Reconciler::new(
        Box::new(MockProvider::sharing_counters_with(&handle)),
        false,
    );
    let actions = reconciler
        .sync(&resolved, "host.example.com", None)
        .await
        .expect("second pass succeeds");

    assert_eq!(actions.len(), 2);
    assert!(actions.iter().all(|a| matches!(
        a,
        RecordAction::Skipped { decision, .. }
            if decision.status == DecisionStatus::NoUpdateNeeded
    )));
    assert_eq!(handle.update_calls(), 2, "counts unchanged on repeat pass");
    assert_eq!(handle.create_calls(), 0);
}
