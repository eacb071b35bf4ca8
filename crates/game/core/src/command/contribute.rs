use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::pool::PoolBucket;
use crate::state::CombatState;
use crate::types::{AttackType, Element};

use super::{CombatError, CommandTransition, Ineligibility, check_invariants, require_active, require_amount};

/// Pushes strength from a card, unit or skill into the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contribute {
    pub kind: AttackType,
    pub element: Element,
    pub amount: u32,
}

impl Contribute {
    pub fn new(kind: AttackType, element: Element, amount: u32) -> Self {
        Self {
            kind,
            element,
            amount,
        }
    }

    pub fn bucket(&self) -> PoolBucket {
        PoolBucket::new(self.kind, self.element)
    }
}

impl CommandTransition for Contribute {
    type Error = CombatError;
    type Result = u32;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_active(state)?;
        let bucket = self.bucket();
        if !bucket.is_valid() {
            return Err(CombatError::IneligibleContribution(
                Ineligibility::InvalidBucket(bucket),
            ));
        }
        require_amount(self.amount)?;
        state.pool.check_contribution(bucket, self.amount)?;
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<u32, Self::Error> {
        let bucket = self.bucket();
        let balance = state.pool.contribute(bucket, self.amount)?;
        state.events.push(CombatEvent::StrengthContributed {
            bucket,
            amount: self.amount,
            balance,
        });
        Ok(balance)
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}
