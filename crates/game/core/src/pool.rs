//! Attack/block pool: the accumulator of not-yet-assigned strength.
//!
//! Contributions are merged into flat per-bucket counters; no contribution
//! identity survives the merge. Block is drawn from the melee buckets.

use crate::types::{AttackType, Element};

/// Number of distinct buckets: {ranged, siege, melee} × {physical, fire, ice}
/// plus melee cold-fire.
pub const BUCKET_COUNT: usize = 10;

/// A (delivery type, element) pair naming one pool counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolBucket {
    pub kind: AttackType,
    pub element: Element,
}

impl PoolBucket {
    pub const fn new(kind: AttackType, element: Element) -> Self {
        Self { kind, element }
    }

    /// Melee bucket of the given element, the source of block strength.
    pub const fn melee(element: Element) -> Self {
        Self::new(AttackType::Melee, element)
    }

    /// Returns the counter index, or `None` for a combination that has no
    /// counter (cold-fire outside melee).
    pub const fn index(self) -> Option<usize> {
        let row = match self.kind {
            AttackType::Ranged => 0,
            AttackType::Siege => 3,
            AttackType::Melee => 6,
        };
        match self.element {
            Element::Physical => Some(row),
            Element::Fire => Some(row + 1),
            Element::Ice => Some(row + 2),
            Element::ColdFire => match self.kind {
                AttackType::Melee => Some(9),
                AttackType::Ranged | AttackType::Siege => None,
            },
        }
    }

    pub const fn is_valid(self) -> bool {
        self.index().is_some()
    }

    /// All ten valid buckets, in counter order.
    pub fn all() -> impl Iterator<Item = PoolBucket> {
        use strum::IntoEnumIterator;

        AttackType::iter()
            .flat_map(|kind| Element::iter().map(move |element| PoolBucket::new(kind, element)))
            .filter(|bucket| bucket.is_valid())
    }
}

impl core::fmt::Display for PoolBucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.kind, self.element)
    }
}

/// Pool-level failures, mapped into [`crate::command::CombatError`] by commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("{0} is not a valid pool bucket")]
    InvalidBucket(PoolBucket),

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("adding {amount} to {bucket} would overflow its balance of {balance}")]
    Overflow {
        bucket: PoolBucket,
        balance: u32,
        amount: u32,
    },

    #[error("requested {requested} from {bucket} but only {available} is pooled")]
    Insufficient {
        bucket: PoolBucket,
        requested: u32,
        available: u32,
    },
}

/// Flat counters of pooled strength plus running totals for conservation checks.
///
/// Invariant: for every bucket, `contributed - consumed == balance`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackPool {
    balances: [u32; BUCKET_COUNT],
    contributed: [u64; BUCKET_COUNT],
    consumed: [u64; BUCKET_COUNT],
}

impl AttackPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(bucket: PoolBucket) -> Result<usize, PoolError> {
        bucket.index().ok_or(PoolError::InvalidBucket(bucket))
    }

    /// Checks that `amount` could be consumed from `bucket` without mutating.
    pub fn check_available(&self, bucket: PoolBucket, amount: u32) -> Result<(), PoolError> {
        let slot = Self::slot(bucket)?;
        if amount == 0 {
            return Err(PoolError::ZeroAmount);
        }
        let available = self.balances[slot];
        if amount > available {
            return Err(PoolError::Insufficient {
                bucket,
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Checks that `amount` could be added to `bucket` without mutating.
    pub fn check_contribution(&self, bucket: PoolBucket, amount: u32) -> Result<u32, PoolError> {
        let slot = Self::slot(bucket)?;
        if amount == 0 {
            return Err(PoolError::ZeroAmount);
        }
        let balance = self.balances[slot];
        balance.checked_add(amount).ok_or(PoolError::Overflow {
            bucket,
            balance,
            amount,
        })
    }

    /// Adds strength to a bucket and returns the new balance. Never clamps.
    pub fn contribute(&mut self, bucket: PoolBucket, amount: u32) -> Result<u32, PoolError> {
        let balance = self.check_contribution(bucket, amount)?;
        let slot = Self::slot(bucket)?;
        self.balances[slot] = balance;
        self.contributed[slot] += u64::from(amount);
        Ok(balance)
    }

    /// Removes strength from a bucket. Never clamps.
    pub fn consume(&mut self, bucket: PoolBucket, amount: u32) -> Result<u32, PoolError> {
        self.check_available(bucket, amount)?;
        let slot = Self::slot(bucket)?;
        self.balances[slot] -= amount;
        self.consumed[slot] += u64::from(amount);
        Ok(self.balances[slot])
    }

    /// Returns previously consumed strength to a bucket (unassignment).
    pub fn refund(&mut self, bucket: PoolBucket, amount: u32) -> Result<u32, PoolError> {
        let slot = Self::slot(bucket)?;
        debug_assert!(self.consumed[slot] >= u64::from(amount));
        self.balances[slot] += amount;
        self.consumed[slot] -= u64::from(amount);
        Ok(self.balances[slot])
    }

    pub fn balance(&self, bucket: PoolBucket) -> u32 {
        bucket.index().map_or(0, |slot| self.balances[slot])
    }

    pub fn contributed(&self, bucket: PoolBucket) -> u64 {
        bucket.index().map_or(0, |slot| self.contributed[slot])
    }

    pub fn consumed(&self, bucket: PoolBucket) -> u64 {
        bucket.index().map_or(0, |slot| self.consumed[slot])
    }

    pub fn is_empty(&self) -> bool {
        self.balances.iter().all(|&b| b == 0)
    }

    /// Non-empty buckets with their balances.
    pub fn balances(&self) -> impl Iterator<Item = (PoolBucket, u32)> + '_ {
        PoolBucket::all()
            .map(|bucket| (bucket, self.balance(bucket)))
            .filter(|(_, balance)| *balance > 0)
    }

    /// Verifies `contributed - consumed == balance` for every bucket.
    pub fn is_conserved(&self) -> bool {
        (0..BUCKET_COUNT).all(|slot| {
            self.contributed[slot]
                .checked_sub(self.consumed[slot])
                .is_some_and(|net| net == u64::from(self.balances[slot]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MELEE_FIRE: PoolBucket = PoolBucket::melee(Element::Fire);

    #[test]
    fn there_are_ten_buckets() {
        assert_eq!(PoolBucket::all().count(), BUCKET_COUNT);
        assert!(!PoolBucket::new(AttackType::Ranged, Element::ColdFire).is_valid());
        assert!(PoolBucket::melee(Element::ColdFire).is_valid());
    }

    #[test]
    fn consume_never_clamps() {
        let mut pool = AttackPool::new();
        pool.contribute(MELEE_FIRE, 3).unwrap();

        let err = pool.consume(MELEE_FIRE, 4).unwrap_err();
        assert_eq!(
            err,
            PoolError::Insufficient {
                bucket: MELEE_FIRE,
                requested: 4,
                available: 3
            }
        );
        assert_eq!(pool.balance(MELEE_FIRE), 3);
    }

    #[test]
    fn refund_keeps_conservation() {
        let mut pool = AttackPool::new();
        pool.contribute(MELEE_FIRE, 5).unwrap();
        pool.consume(MELEE_FIRE, 4).unwrap();
        pool.refund(MELEE_FIRE, 2).unwrap();

        assert_eq!(pool.balance(MELEE_FIRE), 3);
        assert_eq!(pool.contributed(MELEE_FIRE), 5);
        assert_eq!(pool.consumed(MELEE_FIRE), 2);
        assert!(pool.is_conserved());
    }

    #[test]
    fn overflowing_contribution_is_rejected_not_clamped() {
        let mut pool = AttackPool::new();
        pool.contribute(MELEE_FIRE, u32::MAX).unwrap();

        assert_eq!(
            pool.contribute(MELEE_FIRE, 1),
            Err(PoolError::Overflow {
                bucket: MELEE_FIRE,
                balance: u32::MAX,
                amount: 1
            })
        );
        assert_eq!(pool.balance(MELEE_FIRE), u32::MAX);
        assert_eq!(pool.contributed(MELEE_FIRE), u64::from(u32::MAX));
        assert!(pool.is_conserved());
    }

    #[test]
    fn rejects_cold_fire_ranged_and_zero_amounts() {
        let mut pool = AttackPool::new();
        let bucket = PoolBucket::new(AttackType::Ranged, Element::ColdFire);

        assert_eq!(
            pool.contribute(bucket, 2),
            Err(PoolError::InvalidBucket(bucket))
        );
        assert_eq!(pool.contribute(MELEE_FIRE, 0), Err(PoolError::ZeroAmount));
        assert!(pool.is_empty());
    }
}
