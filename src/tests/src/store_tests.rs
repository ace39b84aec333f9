//! Tests for the persistent ledger.

use blocktrace_core::{
    types::address_from_label, Checkpoint, CoreError, HistoryStore, Ledger, LedgerConfig,
    StepClock, TracedToken,
};
use tempfile::tempdir;

/// Histories written through the token survive a reopen unchanged.
#[test]
fn test_token_histories_survive_reopen() {
    let dir = tempdir().unwrap();
    let sender = address_from_label("sender");
    let recipients = [address_from_label("a"), address_from_label("b")];
    let mut clock = StepClock::new(50);

    let (sender_history, recipient_history) = {
        let ledger = Ledger::open(dir.path(), LedgerConfig::default()).unwrap();
        let mut token = TracedToken::new(ledger);

        token.mint(&sender, 500, clock.tick()).unwrap();
        for _ in 0..4 {
            let step = clock.advance(3);
            token
                .multiple_transfers(&sender, &recipients, &[2, 5], step)
                .unwrap();
        }
        token.ledger().store().unwrap().save_head(clock.current()).unwrap();

        let ledger = token.into_ledger();
        (
            ledger.history(&sender).unwrap().clone(),
            ledger.history(&recipients[1]).unwrap().clone(),
        )
    };

    let store = HistoryStore::open(dir.path()).unwrap();
    assert_eq!(store.load_head().unwrap(), Some(clock.current()));

    let ledger = Ledger::with_store(store, LedgerConfig::default()).unwrap();
    assert_eq!(ledger.history(&sender), Some(&sender_history));
    assert_eq!(ledger.history(&recipients[1]), Some(&recipient_history));
    assert_eq!(ledger.current_balance(&sender), 500 - 4 * 7);
    assert_eq!(ledger.current_balance(&recipients[1]), 20);
    assert_eq!(ledger.balance_at_step(&recipients[0], 54), 2);
}

/// A rejected write is neither applied in memory nor persisted.
#[test]
fn test_rejected_write_is_not_persisted() {
    let dir = tempdir().unwrap();
    let account = address_from_label("account");
    let other = address_from_label("other");

    {
        let mut ledger = Ledger::open(dir.path(), LedgerConfig::default()).unwrap();
        ledger.record_balance(&account, 10, 1).unwrap();

        let err = ledger
            .record_balances(9, vec![(other, 5), (account, 2)])
            .unwrap_err();
        assert_eq!(err, CoreError::StepRegression { last: 10, step: 9 });
    }

    let ledger = Ledger::open(dir.path(), LedgerConfig::default()).unwrap();
    assert_eq!(ledger.history_length(&other), 0);
    assert_eq!(
        ledger.history(&account).unwrap().as_slice(),
        &[Checkpoint::genesis(), Checkpoint::new(10, 1)]
    );
}

/// A raw history with duplicate steps round-trips through the store verbatim.
#[test]
fn test_raw_history_round_trips() {
    let dir = tempdir().unwrap();
    let account = address_from_label("account");
    let raw = vec![
        Checkpoint::new(0, 0),
        Checkpoint::new(10, 10),
        Checkpoint::new(10, 11),
        Checkpoint::new(20, 21),
    ];

    {
        let mut ledger = Ledger::open(dir.path(), LedgerConfig::default()).unwrap();
        ledger.record_balance(&account, 1, 99).unwrap();
        ledger.record_balance(&account, 2, 98).unwrap();
        ledger.record_balance(&account, 3, 97).unwrap();
        ledger.record_balance(&account, 4, 96).unwrap();
        ledger.record_balance(&account, 5, 95).unwrap();
        ledger.replace_history(&account, raw.clone()).unwrap();
    }

    let ledger = Ledger::open(dir.path(), LedgerConfig::default()).unwrap();
    assert_eq!(ledger.history(&account).unwrap().as_slice(), &raw[..]);
    assert_eq!(ledger.balance_at_step(&account, 15), 11);
}
