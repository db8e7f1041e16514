//! End-to-end pool scenarios against the in-memory ledgers

mod common;

use amm_core::{AmmError, Asset, FeeSchedule, Ledger, LedgerError, ShareLedger};
use common::*;

#[test]
fn test_first_deposit_issues_shares_equal_to_base() {
    let mut pool = new_pool();
    fund(&mut pool, ALICE, 1000, 1000);

    let shares = deposit(&mut pool, ALICE, 1000, 1000).unwrap();

    assert_eq!(shares, 1000);
    assert_eq!(state(&pool), (1000, 1000, 1000));
    assert_eq!(pool.shares().balance_of(ALICE), 1000);
    assert_eq!(balances(&pool, ALICE), (0, 0));
}

#[test]
fn test_first_deposit_takes_full_offer_at_any_ratio() {
    let mut pool = new_pool();
    fund(&mut pool, ALICE, 2000, 1000);

    let shares = deposit(&mut pool, ALICE, 2000, 1000).unwrap();

    assert_eq!(shares, 2000);
    assert_eq!(state(&pool), (2000, 1000, 2000));
}

#[test]
fn test_first_deposit_without_base_is_rejected() {
    let mut pool = new_pool();
    fund(&mut pool, ALICE, 0, 1000);

    assert_eq!(
        deposit(&mut pool, ALICE, 0, 1000).unwrap_err(),
        AmmError::InvalidAmount
    );
    assert_eq!(state(&pool), (0, 0, 0));
    assert_eq!(balances(&pool, ALICE), (0, 1000));

    // A later first deposit gets exactly what it put in
    fund(&mut pool, BOB, 10, 10);
    deposit(&mut pool, BOB, 10, 10).unwrap();
    assert_eq!(pool.withdrawable_for(BOB).unwrap(), (10, 10));
}

#[test]
fn test_deposit_below_ratio_is_rejected() {
    let mut pool = seeded_pool(1000, 1000);
    fund(&mut pool, BOB, 500, 500);

    let err = deposit(&mut pool, BOB, 500, 400).unwrap_err();

    assert_eq!(
        err,
        AmmError::InsufficientOfferedAmount {
            offered: 400,
            required: 500
        }
    );
    assert_eq!(state(&pool), (1000, 1000, 1000));
    assert_eq!(balances(&pool, BOB), (500, 500));
    assert_eq!(pool.shares().balance_of(BOB), 0);
}

#[test]
fn test_deposit_at_ratio_mints_proportional_shares() {
    let mut pool = seeded_pool(1000, 1000);
    fund(&mut pool, BOB, 500, 500);

    let shares = deposit(&mut pool, BOB, 500, 500).unwrap();

    assert_eq!(shares, 500);
    assert_eq!(state(&pool), (1500, 1500, 1500));
}

#[test]
fn test_excess_offer_stays_with_depositor() {
    let mut pool = seeded_pool(1000, 1000);
    pool.ledger_mut().credit(Asset::Base, BOB, 500).unwrap();
    pool.ledger_mut().credit(SECOND, BOB, 900).unwrap();
    pool.ledger_mut().approve(SECOND, BOB, POOL, 900);

    let shares = deposit(&mut pool, BOB, 500, 900).unwrap();

    assert_eq!(shares, 500);
    assert_eq!(balances(&pool, BOB), (0, 400));
    // Only the required amount was drawn against the approval
    assert_eq!(pool.ledger().allowance(SECOND, BOB, POOL), 400);
}

#[test]
fn test_deposit_without_allowance_fails_cleanly() {
    let mut pool = seeded_pool(1000, 1000);
    pool.ledger_mut().credit(Asset::Base, BOB, 500).unwrap();
    pool.ledger_mut().credit(SECOND, BOB, 500).unwrap();

    let err = deposit(&mut pool, BOB, 500, 500).unwrap_err();

    assert!(matches!(
        err,
        AmmError::Ledger(LedgerError::InsufficientAllowance { .. })
    ));
    assert_eq!(pool.shares().balance_of(BOB), 0);
    assert_eq!(state(&pool), (1000, 1000, 1000));
}

#[test]
fn test_reference_swap_base_for_second() {
    let mut pool = seeded_pool(2000, 1000);
    fund(&mut pool, BOB, 100, 0);

    assert_eq!(pool.quote_output(100, 2000, 1000).unwrap(), 47);
    let out = sell_base(&mut pool, BOB, 100, 47).unwrap();

    assert_eq!(out, 47);
    assert_eq!(balances(&pool, BOB), (0, 47));
    assert_eq!(state(&pool), (2100, 953, 2000));
}

#[test]
fn test_swap_slippage_rejected_before_any_transfer() {
    let mut pool = seeded_pool(2000, 1000);
    fund(&mut pool, BOB, 100, 0);

    // Without host rollback: the bound must trip before the pool pays out
    pool.ledger_mut().attach_value(BOB, POOL, 100).unwrap();
    let err = pool.swap_base_for_second(BOB, 100, 48).unwrap_err();

    assert_eq!(
        err,
        AmmError::SlippageExceeded {
            amount_out: 47,
            min_out: 48
        }
    );
    assert_eq!(pool.get_reserve().unwrap(), 1000);
    assert_eq!(balances(&pool, BOB), (0, 0));
}

#[test]
fn test_swap_second_for_base() {
    let mut pool = seeded_pool(2000, 1000);
    fund(&mut pool, BOB, 0, 100);

    // 100 * 9900 * 2000 / (1000 * 10000 + 990000) = 180.16
    let out = sell_second(&mut pool, BOB, 100, 180).unwrap();

    assert_eq!(out, 180);
    assert_eq!(balances(&pool, BOB), (180, 0));
    assert_eq!(state(&pool), (1820, 1100, 2000));
}

#[test]
fn test_failed_pull_pays_no_base() {
    let mut pool = seeded_pool(2000, 1000);
    pool.ledger_mut().credit(SECOND, BOB, 100).unwrap();

    // No approval, and no host rollback: ordering alone must protect the pool
    let err = pool.swap_second_for_base(BOB, 100, 0).unwrap_err();

    assert!(matches!(
        err,
        AmmError::Ledger(LedgerError::InsufficientAllowance { .. })
    ));
    assert_eq!(balances(&pool, BOB), (0, 100));
    assert_eq!(state(&pool), (2000, 1000, 2000));
}

#[test]
fn test_swap_second_for_base_slippage() {
    let mut pool = seeded_pool(2000, 1000);
    fund(&mut pool, BOB, 0, 100);

    let err = sell_second(&mut pool, BOB, 100, 181).unwrap_err();

    assert!(matches!(err, AmmError::SlippageExceeded { amount_out: 180, .. }));
    assert_eq!(balances(&pool, BOB), (0, 100));
}

#[test]
fn test_swap_against_empty_pool_is_rejected() {
    let mut pool = new_pool();
    fund(&mut pool, BOB, 100, 100);

    assert!(matches!(
        sell_base(&mut pool, BOB, 100, 0),
        Err(AmmError::InvalidReserves { .. })
    ));
    assert!(matches!(
        sell_second(&mut pool, BOB, 100, 0),
        Err(AmmError::InvalidReserves { .. })
    ));
    assert_eq!(balances(&pool, BOB), (100, 100));
}

#[test]
fn test_full_withdrawal_empties_pool() {
    let mut pool = seeded_pool(2000, 1000);

    let (base_out, second_out) = withdraw(&mut pool, ALICE, 2000).unwrap();

    assert_eq!((base_out, second_out), (2000, 1000));
    assert_eq!(state(&pool), (0, 0, 0));
    assert!(pool.snapshot().unwrap().is_empty());
    assert_eq!(balances(&pool, ALICE), (2000, 1000));
}

#[test]
fn test_withdrawal_guards() {
    let mut pool = seeded_pool(2000, 1000);

    assert_eq!(withdraw(&mut pool, ALICE, 0).unwrap_err(), AmmError::InvalidAmount);
    assert_eq!(
        withdraw(&mut pool, ALICE, 2001).unwrap_err(),
        AmmError::InsufficientShares {
            requested: 2001,
            available: 2000
        }
    );
    assert_eq!(
        withdraw(&mut pool, BOB, 1).unwrap_err(),
        AmmError::InsufficientShares {
            requested: 1,
            available: 0
        }
    );
    assert_eq!(state(&pool), (2000, 1000, 2000));
}

#[test]
fn test_partial_withdrawal_floors_in_pool_favour() {
    let mut pool = seeded_pool(1000, 333);

    let (base_out, second_out) = withdraw(&mut pool, ALICE, 1).unwrap();

    // 333 * 1 / 1000 floors to zero
    assert_eq!((base_out, second_out), (1, 0));
    assert_eq!(state(&pool), (999, 333, 999));
}

#[test]
fn test_fees_accrue_to_liquidity_providers() {
    let mut pool = seeded_pool(10_000, 10_000);
    fund(&mut pool, BOB, 1_000, 0);

    let second_out = sell_base(&mut pool, BOB, 1_000, 0).unwrap();
    sell_second(&mut pool, BOB, second_out, 0).unwrap();

    let (bob_base, _) = balances(&pool, BOB);
    assert!(bob_base < 1_000, "round trip must cost the trader");

    let (base_out, second_out) = withdraw(&mut pool, ALICE, 10_000).unwrap();
    assert!(base_out > 10_000);
    assert_eq!(second_out, 10_000);
    assert_eq!(base_out + bob_base, 11_000);
}

#[test]
fn test_second_provider_shares_after_trading() {
    let mut pool = seeded_pool(2000, 1000);
    fund(&mut pool, BOB, 100, 0);
    sell_base(&mut pool, BOB, 100, 0).unwrap();
    // Pool now (2100, 953) with 2000 shares

    fund(&mut pool, CAROL, 210, 1000);
    let shares = deposit(&mut pool, CAROL, 210, 1000).unwrap();

    // required = 210 * 953 / 2100 = 95.3 -> 95; shares = 2000 * 210 / 2100 = 200
    assert_eq!(shares, 200);
    assert_eq!(balances(&pool, CAROL), (0, 905));
    assert_eq!(state(&pool), (2310, 1048, 2200));

    let (base_out, second_out) = pool.withdrawable_for(CAROL).unwrap();
    assert_eq!(base_out, 210);
    assert_eq!(second_out, 95);
}

#[test]
fn test_donation_does_not_dilute_existing_shares() {
    let mut pool = seeded_pool(1000, 1000);
    // Direct transfer into the pool, bypassing add_liquidity
    pool.ledger_mut().credit(SECOND, POOL, 1000).unwrap();

    fund(&mut pool, BOB, 100, 200);
    let shares = deposit(&mut pool, BOB, 100, 200).unwrap();

    assert_eq!(shares, 100);
    assert_eq!(balances(&pool, BOB), (0, 0));

    let (alice_base, alice_second) = pool.withdrawable_for(ALICE).unwrap();
    assert_eq!((alice_base, alice_second), (1000, 2000));
}

#[test]
fn test_get_reserve_tracks_second_balance() {
    let pool = seeded_pool(2000, 1000);
    assert_eq!(pool.get_reserve().unwrap(), 1000);
    assert_eq!(
        pool.get_reserve().unwrap(),
        pool.ledger().balance_of(SECOND, POOL).unwrap()
    );
}

#[test]
fn test_quote_input_matches_execution() {
    let mut pool = seeded_pool(2000, 1000);
    let needed = pool.quote_input(47, 2000, 1000).unwrap();
    fund(&mut pool, BOB, needed, 0);

    let out = sell_base(&mut pool, BOB, needed, 47).unwrap();
    assert!(out >= 47);
}

#[test]
fn test_zero_fee_pool() {
    let mut pool = new_pool_with_fee(FeeSchedule::zero());
    fund(&mut pool, ALICE, 1000, 1000);
    deposit(&mut pool, ALICE, 1000, 1000).unwrap();
    fund(&mut pool, BOB, 1000, 0);

    // 1000 * 1000 / 2000
    assert_eq!(sell_base(&mut pool, BOB, 1000, 0).unwrap(), 500);
}
