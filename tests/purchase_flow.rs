//! Purchase orchestration scenarios against a scripted intent service.
//!
//! These run the real orchestrator (sequence, status labels, error
//! classification, effect application) with only the remote side doubled.
//!
//! Run with: `cargo test --test purchase_flow`

mod common;

use std::sync::atomic::Ordering;
use std::sync::Mutex as StdMutex;

use futures::executor::block_on;

use coinforge::payment::error::PaymentError;
use coinforge::payment::gateway::IntentApi;
use coinforge::payment::orchestrator::PurchasePhase;
use coinforge::payment::types::IntentStatus;

use common::*;

#[test]
fn completed_purchase_applies_effect_exactly_once() {
    let game = shared_game();
    let wallet = connected_wallet();
    let orchestrator = orchestrator(MockGateway::completed(), game.clone(), wallet);

    let phases = StdMutex::new(Vec::new());
    let receipt = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |phase| {
        phases.lock().unwrap().push(phase);
    }))
    .unwrap();

    assert_eq!(receipt.status, IntentStatus::Completed);
    let progress = game.lock().progress().clone();
    assert_eq!(progress.click_power, 3.0, "effect applied once");
    assert_eq!(progress.purchase_count, 1);

    // One label per remote step, strictly in protocol order.
    assert_eq!(
        *phases.lock().unwrap(),
        vec![
            PurchasePhase::Quoting,
            PurchasePhase::Committing,
            PurchasePhase::Executing,
            PurchasePhase::Polling,
        ]
    );
}

#[test]
fn status_labels_match_the_ui_copy() {
    assert_eq!(PurchasePhase::Quoting.label(), "Getting best route…");
    assert_eq!(PurchasePhase::Committing.label(), "Locking in rate…");
    assert_eq!(PurchasePhase::Executing.label(), "Confirm in your wallet…");
    assert_eq!(PurchasePhase::Polling.label(), "Waiting for confirmation…");
}

#[test]
fn failed_receipt_is_returned_not_thrown_and_applies_nothing() {
    let game = shared_game();
    let wallet = connected_wallet();
    let orchestrator = orchestrator(
        MockGateway::with_script([IntentStatus::Failed]),
        game.clone(),
        wallet,
    );

    let receipt = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |_| {})).unwrap();

    assert_eq!(receipt.status, IntentStatus::Failed);
    let progress = game.lock().progress().clone();
    assert_eq!(progress.click_power, 1.0);
    assert_eq!(progress.purchase_count, 0);
}

#[test]
fn refunded_receipt_also_skips_the_effect() {
    let game = shared_game();
    let wallet = connected_wallet();
    let orchestrator = orchestrator(
        MockGateway::with_script([IntentStatus::Refunded]),
        game.clone(),
        wallet,
    );

    let receipt = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |_| {})).unwrap();
    assert_eq!(receipt.status, IntentStatus::Refunded);
    assert_eq!(game.lock().progress().click_power, 1.0);
}

#[test]
fn polling_rides_through_non_terminal_statuses() {
    let game = shared_game();
    let wallet = connected_wallet();
    let mock = MockGateway::with_script([
        IntentStatus::Pending,
        IntentStatus::Processing,
        IntentStatus::Completed,
    ]);
    let orchestrator = orchestrator(mock, game.clone(), wallet);

    let receipt = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |_| {})).unwrap();
    assert_eq!(receipt.status, IntentStatus::Completed);
    assert_eq!(game.lock().progress().click_power, 3.0);
}

#[test]
fn never_settling_intent_times_out() {
    let game = shared_game();
    let wallet = connected_wallet();
    let orchestrator = orchestrator(MockGateway::never_settling(), game.clone(), wallet);

    let err = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |_| {})).unwrap_err();
    match err {
        PaymentError::Timeout {
            intent_id,
            waited_ms,
        } => {
            assert_eq!(intent_id, "int_mock_1");
            assert!(waited_ms >= 50);
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    // Timing out applies nothing; the intent may still settle out of band.
    assert_eq!(game.lock().progress().click_power, 1.0);
}

#[test]
fn purchase_without_wallet_fails_before_any_remote_call() {
    let game = shared_game();
    let wallet = empty_wallet();
    let mock = MockGateway::completed();
    let calls = mock.calls.clone();
    let orchestrator = orchestrator(mock, game, wallet);

    let phases = StdMutex::new(Vec::new());
    let err = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |phase| {
        phases.lock().unwrap().push(phase);
    }))
    .unwrap_err();

    assert!(matches!(err, PaymentError::NotConnected));
    assert!(phases.lock().unwrap().is_empty());
    // The gateway was never touched.
    assert_eq!(calls.quote.load(Ordering::SeqCst), 0);
}

#[test]
fn wallet_style_rejection_normalizes_to_user_rejected() {
    let game = shared_game();
    let wallet = connected_wallet();
    let orchestrator = orchestrator(
        MockGateway::failing_execute(400, "User rejected the request"),
        game.clone(),
        wallet,
    );

    let err = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |_| {})).unwrap_err();
    assert!(matches!(err, PaymentError::UserRejected));
    assert_eq!(game.lock().progress().click_power, 1.0);
}

#[test]
fn other_remote_errors_propagate_verbatim() {
    let game = shared_game();
    let wallet = connected_wallet();
    let orchestrator = orchestrator(
        MockGateway::failing_quote(422, "insufficient liquidity on route"),
        game,
        wallet,
    );

    let err = block_on(orchestrator.purchase(&click_boost(), PLAYER_CHAIN, |_| {})).unwrap_err();
    match err {
        PaymentError::Remote { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "insufficient liquidity on route");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[test]
fn wait_receipt_polls_until_terminal() {
    let mock = MockGateway::with_script([
        IntentStatus::Pending,
        IntentStatus::Pending,
        IntentStatus::Completed,
    ]);

    let receipt = block_on(mock.wait_receipt("int_x", 200, 5)).unwrap();
    assert_eq!(receipt.status, IntentStatus::Completed);
    assert_eq!(mock.calls.poll.load(Ordering::SeqCst), 3);
}

#[test]
fn wait_receipt_timeout_reports_waited_time() {
    let mock = MockGateway::never_settling();

    let err = block_on(mock.wait_receipt("int_x", 25, 10)).unwrap_err();
    match err {
        PaymentError::Timeout { waited_ms, .. } => assert!(waited_ms >= 25),
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(mock.calls.poll.load(Ordering::SeqCst) >= 2);
}
