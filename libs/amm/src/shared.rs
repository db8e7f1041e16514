//! Lock-wrapped pool handle for hosts that do not serialize calls
//!
//! Every operation holds the pool lock from its first reserve read to its
//! last ledger write, so no two operations interleave against the same
//! reserve state. Base-taking operations also move the caller's base into
//! the pool under that same lock, so "reserve before this call" never sees
//! another caller's attached value.

use crate::error::AmmResult;
use crate::ledger::{Ledger, ShareLedger};
use crate::pool::{Pool, PoolConfig};
use crate::reserves::PoolSnapshot;
use crate::types::{Address, Amount, Asset};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

/// Cloneable handle to a pool guarded by a single mutex
pub struct SharedPool<L, S> {
    inner: Arc<Mutex<Pool<L, S>>>,
}

impl<L, S> Clone for SharedPool<L, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: Ledger, S: ShareLedger> SharedPool<L, S> {
    pub fn new(pool: Pool<L, S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    pub fn config(&self) -> PoolConfig {
        *self.inner.lock().config()
    }

    /// Run `f` with exclusive access
    pub fn with_pool<R>(&self, f: impl FnOnce(&mut Pool<L, S>) -> R) -> R {
        let mut pool = self.inner.lock();
        f(&mut *pool)
    }

    /// Move `base_amount` from `caller` into the pool, then run `op`, as one
    /// locked unit
    ///
    /// If `op` fails the attached base is returned to `caller`. Any other
    /// effect `op` applied before failing is left for the host to roll back.
    pub fn with_attached_base<R>(
        &self,
        caller: Address,
        base_amount: Amount,
        op: impl FnOnce(&mut Pool<L, S>) -> AmmResult<R>,
    ) -> AmmResult<R> {
        let mut pool = self.inner.lock();
        let pool_account = pool.config().pool_account();
        pool.ledger_mut()
            .transfer(Asset::Base, caller, pool_account, base_amount)?;

        match op(&mut *pool) {
            Ok(value) => Ok(value),
            Err(e) => {
                if let Err(refund) =
                    pool.ledger_mut()
                        .transfer(Asset::Base, pool_account, caller, base_amount)
                {
                    error!(%caller, base_amount, error = %refund, "attached base refund failed");
                }
                Err(e)
            }
        }
    }

    pub fn get_reserve(&self) -> AmmResult<Amount> {
        self.inner.lock().get_reserve()
    }

    pub fn snapshot(&self) -> AmmResult<PoolSnapshot> {
        self.inner.lock().snapshot()
    }

    pub fn quote_output(
        &self,
        input_amount: Amount,
        input_reserve: Amount,
        output_reserve: Amount,
    ) -> AmmResult<Amount> {
        self.inner
            .lock()
            .quote_output(input_amount, input_reserve, output_reserve)
    }

    /// Attach `base_amount_sent` from `caller` and deposit it
    pub fn add_liquidity(
        &self,
        caller: Address,
        base_amount_sent: Amount,
        second_amount_offered: Amount,
    ) -> AmmResult<Amount> {
        self.with_attached_base(caller, base_amount_sent, |pool| {
            pool.add_liquidity(caller, base_amount_sent, second_amount_offered)
        })
    }

    pub fn remove_liquidity(
        &self,
        caller: Address,
        shares_to_burn: Amount,
    ) -> AmmResult<(Amount, Amount)> {
        self.inner.lock().remove_liquidity(caller, shares_to_burn)
    }

    /// Attach `base_amount_in` from `caller` and sell it for the second asset
    pub fn swap_base_for_second(
        &self,
        caller: Address,
        base_amount_in: Amount,
        min_second_out: Amount,
    ) -> AmmResult<Amount> {
        self.with_attached_base(caller, base_amount_in, |pool| {
            pool.swap_base_for_second(caller, base_amount_in, min_second_out)
        })
    }

    pub fn swap_second_for_base(
        &self,
        caller: Address,
        second_amount_in: Amount,
        min_base_out: Amount,
    ) -> AmmResult<Amount> {
        self.inner
            .lock()
            .swap_second_for_base(caller, second_amount_in, min_base_out)
    }
}
