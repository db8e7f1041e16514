//! Shared fixtures: an in-memory host that attaches base value to calls and
//! rolls back every ledger effect of a failed call.

#![allow(dead_code)]

use amm_core::{
    Address, AmmResult, Amount, Asset, FeeSchedule, Ledger, MemoryLedger, MemoryShareLedger, Pool,
    PoolConfig, ShareLedger,
};

pub const POOL: Address = Address::from_low_byte(0xaa);
pub const TOKEN: Address = Address::from_low_byte(0xbb);
pub const SECOND: Asset = Asset::Token(TOKEN);

pub const ALICE: Address = Address::from_low_byte(1);
pub const BOB: Address = Address::from_low_byte(2);
pub const CAROL: Address = Address::from_low_byte(3);

pub type TestPool = Pool<MemoryLedger, MemoryShareLedger>;

pub fn new_pool() -> TestPool {
    new_pool_with_fee(FeeSchedule::default())
}

pub fn new_pool_with_fee(fee: FeeSchedule) -> TestPool {
    let config = PoolConfig::new(POOL, TOKEN, fee).unwrap();
    Pool::new(config, MemoryLedger::new(), MemoryShareLedger::new())
}

/// Give `account` balances of both assets and an unlimited allowance to the pool
pub fn fund(pool: &mut TestPool, account: Address, base: Amount, second: Amount) {
    let ledger = pool.ledger_mut();
    ledger.credit(Asset::Base, account, base).unwrap();
    ledger.credit(SECOND, account, second).unwrap();
    ledger.approve(SECOND, account, POOL, u128::MAX);
}

/// Pool whose only LP is ALICE, after depositing `(base, second)`
pub fn seeded_pool(base: Amount, second: Amount) -> TestPool {
    let mut pool = new_pool();
    fund(&mut pool, ALICE, base, second);
    deposit(&mut pool, ALICE, base, second).unwrap();
    pool
}

/// Run `call` as one host transaction: on error, every ledger and share
/// effect (including attached value) is undone
pub fn atomically<R>(
    pool: &mut TestPool,
    call: impl FnOnce(&mut TestPool) -> AmmResult<R>,
) -> AmmResult<R> {
    let ledger = pool.ledger().clone();
    let shares = pool.shares().clone();
    let result = call(pool);
    if result.is_err() {
        *pool.ledger_mut() = ledger;
        *pool.shares_mut() = shares;
    }
    result
}

pub fn deposit(
    pool: &mut TestPool,
    caller: Address,
    base: Amount,
    second_offered: Amount,
) -> AmmResult<Amount> {
    atomically(pool, |p| {
        p.ledger_mut().attach_value(caller, POOL, base)?;
        p.add_liquidity(caller, base, second_offered)
    })
}

pub fn withdraw(pool: &mut TestPool, caller: Address, shares: Amount) -> AmmResult<(Amount, Amount)> {
    atomically(pool, |p| p.remove_liquidity(caller, shares))
}

pub fn sell_base(
    pool: &mut TestPool,
    caller: Address,
    base_in: Amount,
    min_out: Amount,
) -> AmmResult<Amount> {
    atomically(pool, |p| {
        p.ledger_mut().attach_value(caller, POOL, base_in)?;
        p.swap_base_for_second(caller, base_in, min_out)
    })
}

pub fn sell_second(
    pool: &mut TestPool,
    caller: Address,
    second_in: Amount,
    min_out: Amount,
) -> AmmResult<Amount> {
    atomically(pool, |p| p.swap_second_for_base(caller, second_in, min_out))
}

/// (base, second) balances of `account`
pub fn balances(pool: &TestPool, account: Address) -> (Amount, Amount) {
    let ledger = pool.ledger();
    (
        ledger.balance_of(Asset::Base, account).unwrap(),
        ledger.balance_of(SECOND, account).unwrap(),
    )
}

/// (base reserve, second reserve, total shares)
pub fn state(pool: &TestPool) -> (Amount, Amount, Amount) {
    let snapshot = pool.snapshot().unwrap();
    assert_eq!(snapshot.total_shares, pool.shares().total_supply());
    (
        snapshot.base_reserve,
        snapshot.second_reserve,
        snapshot.total_shares,
    )
}
