//! Proposer rotation entry points
//!
//! `rotate_once` is the only path that advances canonical state. Previews
//! always run on a clone so callers can share a snapshot freely.

use crate::error::StakingError;
use crate::types::Validator;
use crate::validator_set::ValidatorSet;

/// Advance the set by one round and return the new proposer
pub fn rotate_once(set: &mut ValidatorSet) -> Result<Validator, StakingError> {
    set.increment_accum(1)?;
    set.proposer()
        .cloned()
        .ok_or(StakingError::NoEligibleProposer)
}

/// Proposers of the next `times` rounds, computed on a copy of `set`
pub fn preview_proposers(set: &ValidatorSet, times: usize) -> Result<Vec<Validator>, StakingError> {
    if times < 1 {
        return Err(StakingError::InvalidInput(
            "times must be at least 1".to_string(),
        ));
    }

    let mut scratch = set.clone();
    let mut proposers = Vec::with_capacity(times);
    for index in 0..times {
        let proposer = rotate_once(&mut scratch)?;
        tracing::trace!(index, total = times, proposer = %proposer.address, "previewed proposer");
        proposers.push(proposer);
    }
    Ok(proposers)
}
