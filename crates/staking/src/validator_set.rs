//! Validator set with weighted round-robin proposer priority
//!
//! One rotation step:
//! 1. every validator's priority grows by its voting power
//! 2. the highest priority validator becomes proposer (ties go to the
//!    lowest address)
//! 3. the proposer's priority drops by the total voting power
//! 4. if the priority spread exceeds twice the total voting power, all
//!    priorities shift by their average

use crate::error::StakingError;
use crate::types::Validator;
use borsh::{BorshDeserialize, BorshSerialize};
use bridge_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound on total voting power.
///
/// Keeps `priority + power` and `2 * total` far away from `i64` overflow.
pub const MAX_TOTAL_VOTING_POWER: i64 = i64::MAX / 8;

/// Ordered validator collection tracking the current proposer
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, Serialize, Deserialize)]
#[serde(try_from = "RawValidatorSet")]
pub struct ValidatorSet {
    /// Validators sorted by address ascending
    validators: Vec<Validator>,
    /// Proposer chosen by the latest rotation step
    proposer: Option<Address>,
    #[borsh(skip)]
    total_voting_power: i64,
}

/// Wire layout shared by borsh and serde before invariants are checked
#[derive(BorshDeserialize, Deserialize)]
struct RawValidatorSet {
    validators: Vec<Validator>,
    #[serde(default)]
    proposer: Option<Address>,
}

impl TryFrom<RawValidatorSet> for ValidatorSet {
    type Error = StakingError;

    fn try_from(raw: RawValidatorSet) -> Result<Self, Self::Error> {
        let mut set = ValidatorSet::new(raw.validators)?;
        if let Some(proposer) = raw.proposer {
            set.set_proposer(proposer)?;
        }
        Ok(set)
    }
}

impl ValidatorSet {
    /// Build a set from validators in any order.
    ///
    /// Validators are sorted into canonical order; priorities are kept as
    /// given so a persisted snapshot resumes exactly where it stopped.
    pub fn new(mut validators: Vec<Validator>) -> Result<Self, StakingError> {
        let mut seen = HashSet::with_capacity(validators.len());
        for v in &validators {
            if !seen.insert(v.address) {
                return Err(StakingError::DuplicateValidator(v.address));
            }
        }

        let mut total: i64 = 0;
        for v in &validators {
            total = i64::try_from(v.voting_power)
                .ok()
                .and_then(|power| total.checked_add(power))
                .filter(|sum| *sum <= MAX_TOTAL_VOTING_POWER)
                .ok_or(StakingError::TotalVotingPowerOverflow {
                    max: MAX_TOTAL_VOTING_POWER,
                })?;
        }

        validators.sort_by(|a, b| a.address.cmp(&b.address));

        Ok(Self {
            validators,
            proposer: None,
            total_voting_power: total,
        })
    }

    /// Decode a snapshot from stored bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, StakingError> {
        let raw: RawValidatorSet =
            borsh::from_slice(data).map_err(|e| StakingError::Decode(e.to_string()))?;
        Self::try_from(raw)
    }

    /// Encode for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("ValidatorSet serialization should not fail")
    }

    /// Mark an existing member as the current proposer
    pub fn set_proposer(&mut self, address: Address) -> Result<(), StakingError> {
        if self.get_by_address(&address).is_none() {
            return Err(StakingError::UnknownProposer(address));
        }
        self.proposer = Some(address);
        Ok(())
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn total_voting_power(&self) -> i64 {
        self.total_voting_power
    }

    /// Current proposer, if a rotation step has chosen one
    pub fn proposer(&self) -> Option<&Validator> {
        self.proposer.and_then(|addr| self.get_by_address(&addr))
    }

    pub fn get_by_address(&self, address: &Address) -> Option<&Validator> {
        self.validators
            .binary_search_by(|v| v.address.cmp(address))
            .ok()
            .map(|idx| &self.validators[idx])
    }

    /// Apply `times` rotation steps in place.
    ///
    /// Fails before touching any priority when the set has no voting power.
    pub fn increment_accum(&mut self, times: usize) -> Result<(), StakingError> {
        if self.total_voting_power <= 0 {
            return Err(StakingError::NoEligibleProposer);
        }
        for _ in 0..times {
            self.step()?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), StakingError> {
        for v in self.validators.iter_mut() {
            // power <= MAX_TOTAL_VOTING_POWER, checked in `new`
            v.proposer_priority = v.proposer_priority.saturating_add(v.voting_power as i64);
        }

        let idx = self
            .max_priority_index()
            .ok_or(StakingError::NoEligibleProposer)?;
        let proposer = &mut self.validators[idx];
        proposer.proposer_priority = proposer
            .proposer_priority
            .saturating_sub(self.total_voting_power);
        self.proposer = Some(proposer.address);

        self.recenter();
        Ok(())
    }

    /// Highest priority among powered validators; the earliest index wins ties
    fn max_priority_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, v) in self.validators.iter().enumerate() {
            if v.voting_power == 0 {
                continue;
            }
            match best {
                Some(b) if self.validators[b].proposer_priority >= v.proposer_priority => {}
                _ => best = Some(idx),
            }
        }
        best
    }

    /// Shift every priority by the average once the spread grows past
    /// `2 * total_voting_power`. A common shift never changes which
    /// validator has the highest priority.
    fn recenter(&mut self) {
        let (min, max) = self.validators.iter().fold((i64::MAX, i64::MIN), |(lo, hi), v| {
            (lo.min(v.proposer_priority), hi.max(v.proposer_priority))
        });
        let spread = max as i128 - min as i128;
        if spread <= 2 * self.total_voting_power as i128 {
            return;
        }

        let sum: i128 = self
            .validators
            .iter()
            .map(|v| v.proposer_priority as i128)
            .sum();
        // |avg| <= max(|min|, |max|) so it always fits in i64
        let avg = (sum / self.validators.len() as i128) as i64;
        if avg == 0 {
            return;
        }

        tracing::debug!(spread = %spread, avg, "recentering proposer priorities");
        for v in self.validators.iter_mut() {
            v.proposer_priority = v.proposer_priority.saturating_sub(avg);
        }
    }
}
