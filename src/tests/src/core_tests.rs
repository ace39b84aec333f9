//! Tests for the core crate: point-in-time balance scenarios.

use blocktrace_core::{
    types::address_from_label, Address, Balance, Checkpoint, Ledger, LedgerConfig, Step,
    StepClock, TracedToken,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// The step at which the token is created.
const BASE: Step = 1_000;

fn setup() -> (TracedToken, StepClock) {
    (TracedToken::new(Ledger::default()), StepClock::new(BASE))
}

fn balances(token: &TracedToken, account: &Address) -> Vec<Balance> {
    let ledger = token.ledger();
    (0..ledger.history_length(account))
        .map(|i| ledger.checkpoint_at(account, i).unwrap().balance)
        .collect()
}

fn steps(token: &TracedToken, account: &Address) -> Vec<Step> {
    let ledger = token.ledger();
    (0..ledger.history_length(account))
        .map(|i| ledger.checkpoint_at(account, i).unwrap().step)
        .collect()
}

/// An account with no activity is zero everywhere.
#[test]
fn test_zero_if_no_edit() {
    let (token, _) = setup();
    let account = address_from_label("account");

    assert_eq!(token.balance_of(&account), 0);
    assert_eq!(token.balance_of_at_step(&account, 0), 0);
    assert_eq!(token.balance_of_at_step(&account, BASE), 0);
    assert_eq!(token.balance_of_at_step(&account, Step::MAX), 0);
}

/// Querying before the first edit returns zero.
#[test]
fn test_zero_before_first_edit() {
    let (mut token, mut clock) = setup();
    let account = address_from_label("account");

    let step = clock.tick();
    token.mint(&account, 10, step).unwrap();

    assert_eq!(token.balance_of_at_step(&account, BASE), 0);
    assert_eq!(token.balance_of_at_step(&account, BASE + 1), 10);
    assert_eq!(token.balance_of(&account), 10);
}

/// Three mints ten steps apart are each visible from their own step on.
#[test]
fn test_request_after_three_edits() {
    let (mut token, mut clock) = setup();
    let account = address_from_label("account");

    for _ in 0..3 {
        clock.advance(9);
        let step = clock.tick();
        token.mint(&account, 10, step).unwrap();
    }
    assert_eq!(clock.current(), BASE + 30);

    assert_eq!(token.balance_of(&account), 30);
    assert_eq!(token.balance_of_at_step(&account, BASE + 5), 0);
    assert_eq!(token.balance_of_at_step(&account, BASE + 15), 10);
    assert_eq!(token.balance_of_at_step(&account, BASE + 27), 20);
    assert_eq!(token.balance_of_at_step(&account, BASE + 30), 30);

    // Three real checkpoints plus the genesis entry
    assert_eq!(token.ledger().history_length(&account), 4);
    assert_eq!(steps(&token, &account), vec![0, BASE + 10, BASE + 20, BASE + 30]);
}

/// Among checkpoints sharing a step, the last inserted one wins.
#[test]
fn test_request_after_three_edits_multiple_edits_in_same_step() {
    let (mut token, mut clock) = setup();
    let account = address_from_label("account");

    token
        .ledger_mut()
        .replace_history(
            &account,
            vec![
                Checkpoint::new(0, 0),
                Checkpoint::new(BASE + 10, 10),
                Checkpoint::new(BASE + 10, 11),
                Checkpoint::new(BASE + 20, 21),
                Checkpoint::new(BASE + 20, 22),
                Checkpoint::new(BASE + 20, 23),
                Checkpoint::new(BASE + 30, 33),
                Checkpoint::new(BASE + 30, 34),
                Checkpoint::new(BASE + 30, 35),
                Checkpoint::new(BASE + 30, 36),
            ],
        )
        .unwrap();
    clock.advance(30);

    assert_eq!(token.balance_of(&account), 36);
    assert_eq!(token.balance_of_at_step(&account, BASE + 5), 0);
    assert_eq!(token.balance_of_at_step(&account, BASE + 15), 11);
    assert_eq!(token.balance_of_at_step(&account, BASE + 27), 23);
    assert_eq!(token.balance_of_at_step(&account, BASE + 30), 36);
    assert_eq!(token.balance_of_at_step(&account, clock.current()), 36);
}

/// A fan-out batch to three distinct recipients writes one checkpoint per
/// account per step.
#[test]
fn test_single_checkpoint_per_step_for_fan_out() {
    let (mut token, mut clock) = setup();
    let sender = address_from_label("sender");
    let recipients = [
        address_from_label("first"),
        address_from_label("second"),
        address_from_label("third"),
    ];

    let step = clock.tick();
    token.mint(&sender, 1000, step).unwrap();

    for _ in 0..3 {
        let step = clock.advance(10) - 1;
        token
            .multiple_transfers(&sender, &recipients, &[1, 1, 1], step)
            .unwrap();
    }

    assert_eq!(balances(&token, &sender), vec![0, 1000, 997, 994, 991]);
    assert_eq!(
        steps(&token, &sender),
        vec![0, BASE + 1, BASE + 10, BASE + 20, BASE + 30]
    );
    for recipient in &recipients {
        assert_eq!(balances(&token, recipient), vec![0, 1, 2, 3]);
        assert_eq!(steps(&token, recipient), vec![0, BASE + 10, BASE + 20, BASE + 30]);
    }
}

/// Three legs to the same recipient collapse into one checkpoint per step.
#[test]
fn test_single_checkpoint_per_step_for_repeated_recipient() {
    let (mut token, mut clock) = setup();
    let account = address_from_label("account");
    let second = address_from_label("second");

    let step = clock.tick();
    token.mint(&second, 1000, step).unwrap();
    clock.advance(10);

    for _ in 0..3 {
        let step = clock.tick();
        token
            .multiple_transfers(&second, &[account, account, account], &[1, 1, 1], step)
            .unwrap();
        clock.advance(10);
    }

    assert_eq!(balances(&token, &account), vec![0, 3, 6, 9]);
    assert_eq!(balances(&token, &second), vec![0, 1000, 997, 994, 991]);
}

/// Separate operations in the same step collapse just like a batch does.
#[test]
fn test_separate_calls_in_one_step_collapse() {
    let (mut token, mut clock) = setup();
    let sender = address_from_label("sender");
    let recipient = address_from_label("recipient");

    token.mint(&sender, 100, clock.tick()).unwrap();
    let step = clock.advance(5);
    for _ in 0..3 {
        token.transfer(&sender, &recipient, 1, step).unwrap();
    }

    assert_eq!(balances(&token, &sender), vec![0, 100, 97]);
    assert_eq!(balances(&token, &recipient), vec![0, 3]);
}

/// Balances between two checkpoints carry forward from the earlier one.
#[test]
fn test_carry_forward_between_checkpoints() {
    let (mut token, mut clock) = setup();
    let account = address_from_label("account");

    let mut expected = Vec::new();
    for amount in [5, 7, 11] {
        let step = clock.advance(4);
        token.mint(&account, amount, step).unwrap();
        expected.push(step);
    }

    let history = token.ledger().history(&account).unwrap();
    for pair in history.as_slice().windows(2) {
        for step in pair[0].step..pair[1].step {
            assert_eq!(token.balance_of_at_step(&account, step), pair[0].balance);
        }
    }
    assert_eq!(steps(&token, &account)[1..], expected[..]);
}

/// Randomized mints and transfers agree with a snapshot-per-step model.
#[test]
fn test_random_operations_match_snapshot_model() {
    let mut rng = rand::thread_rng();
    let accounts: Vec<Address> = (0..5)
        .map(|i| address_from_label(&format!("holder-{}", i)))
        .collect();

    for seed_genesis in [true, false] {
        let mut token = TracedToken::new(Ledger::new(LedgerConfig { seed_genesis }));
        let mut clock = StepClock::new(BASE);
        let mut model: BTreeMap<Step, HashMap<Address, Balance>> = BTreeMap::new();
        let mut state: HashMap<Address, Balance> = HashMap::new();

        for _ in 0..300 {
            let step = clock.advance(rng.gen_range(0..3));
            let to = *accounts.choose(&mut rng).unwrap();

            if rng.gen_bool(0.3) {
                let amount = rng.gen_range(1..50);
                token.mint(&to, amount, step).unwrap();
                *state.entry(to).or_default() += amount;
            } else {
                let from = *accounts.choose(&mut rng).unwrap();
                let available = state.get(&from).copied().unwrap_or(0);
                let amount = rng.gen_range(0..=available + 5);
                let result = token.transfer(&from, &to, amount, step);
                if amount <= available {
                    result.unwrap();
                    *state.entry(from).or_default() -= amount;
                    *state.entry(to).or_default() += amount;
                } else {
                    assert!(result.is_err());
                }
            }
            model.insert(step, state.clone());
        }

        for account in &accounts {
            assert_eq!(
                token.balance_of(account),
                token.balance_of_at_step(account, clock.current())
            );

            let history_steps = steps(&token, account);
            assert!(history_steps.windows(2).all(|w| w[0] < w[1]));

            for step in 0..=clock.current() + 2 {
                let expected = model
                    .range(..=step)
                    .next_back()
                    .and_then(|(_, balances)| balances.get(account).copied())
                    .unwrap_or(0);
                assert_eq!(token.balance_of_at_step(account, step), expected);
            }
        }
    }
}
