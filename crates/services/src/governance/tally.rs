// Path: crates/services/src/governance/tally.rs
//! Weighted tallying of a proposal's votes against quorum, veto, and pass thresholds.

use super::votes::get_votes;
use agora_api::staking::VotingPowerSource;
use agora_api::state::StateAccess;
use agora_types::app::{Decimal, TallyResult, VoteOption};
use agora_types::error::StateError;
use agora_types::service_configs::GovernanceParams;
use serde::{Deserialize, Serialize};

/// How a tally classified a proposal.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TallyOutcome {
    /// Quorum reached, not vetoed, and Yes strictly exceeded the threshold.
    Passed,
    /// Quorum reached and not vetoed, but Yes did not exceed the threshold.
    Rejected,
    /// NoWithVeto strictly exceeded the veto threshold of cast power.
    Vetoed,
    /// Cast power fell short of the quorum, or nobody held power.
    NoQuorum,
}

/// The classified result of a tally and its per-option shares.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyVerdict {
    /// The classification.
    pub outcome: TallyOutcome,
    /// Shares of total voting power per option.
    pub result: TallyResult,
}

impl TallyVerdict {
    /// True if the proposal passed.
    pub fn passed(&self) -> bool {
        self.outcome == TallyOutcome::Passed
    }

    /// True if the proposal was vetoed.
    pub fn vetoed(&self) -> bool {
        self.outcome == TallyOutcome::Vetoed
    }
}

/// Voting weight accumulated per option.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OptionWeights {
    /// Weight voting Yes.
    pub yes: u64,
    /// Weight abstaining.
    pub abstain: u64,
    /// Weight voting No.
    pub no: u64,
    /// Weight voting NoWithVeto.
    pub no_with_veto: u64,
}

fn overflow() -> StateError {
    StateError::InvalidValue("voting weight overflow".into())
}

impl OptionWeights {
    /// Adds `weight` to the bucket of `option`.
    pub fn add(&mut self, option: VoteOption, weight: u64) -> Result<(), StateError> {
        let bucket = match option {
            VoteOption::Yes => &mut self.yes,
            VoteOption::Abstain => &mut self.abstain,
            VoteOption::No => &mut self.no,
            VoteOption::NoWithVeto => &mut self.no_with_veto,
        };
        *bucket = bucket.checked_add(weight).ok_or_else(overflow)?;
        Ok(())
    }

    /// Total weight that cast a vote, abstentions included.
    pub fn cast(&self) -> Result<u64, StateError> {
        self.non_abstaining()?
            .checked_add(self.abstain)
            .ok_or_else(overflow)
    }

    /// Weight that took a side.
    pub fn non_abstaining(&self) -> Result<u64, StateError> {
        self.yes
            .checked_add(self.no)
            .and_then(|w| w.checked_add(self.no_with_veto))
            .ok_or_else(overflow)
    }
}

/// Classifies accumulated weights. Pure; the order of checks is quorum, veto, then threshold.
pub fn classify(
    params: &GovernanceParams,
    weights: &OptionWeights,
    total_power: u64,
) -> Result<TallyVerdict, StateError> {
    let result = TallyResult {
        yes: Decimal::from_ratio(weights.yes, total_power),
        abstain: Decimal::from_ratio(weights.abstain, total_power),
        no: Decimal::from_ratio(weights.no, total_power),
        no_with_veto: Decimal::from_ratio(weights.no_with_veto, total_power),
    };
    let cast = weights.cast()?;

    let outcome = if total_power == 0 || !params.quorum.is_reached_by(cast, total_power) {
        TallyOutcome::NoQuorum
    } else if params
        .veto_threshold
        .is_exceeded_by(weights.no_with_veto, cast)
    {
        TallyOutcome::Vetoed
    } else if params
        .threshold
        .is_exceeded_by(weights.yes, weights.non_abstaining()?)
    {
        TallyOutcome::Passed
    } else {
        TallyOutcome::Rejected
    };
    Ok(TallyVerdict { outcome, result })
}

/// Tallies every vote on a proposal with weights read now. Never writes.
pub fn tally(
    state: &dyn StateAccess,
    power: &dyn VotingPowerSource,
    params: &GovernanceParams,
    proposal_id: u64,
) -> Result<TallyVerdict, StateError> {
    let total_power = power.total_weight(state)?;
    let mut weights = OptionWeights::default();
    for vote in get_votes(state, proposal_id)? {
        let weight = power.weight_of(state, &vote.voter)?;
        if weight == 0 {
            continue;
        }
        weights.add(vote.option, weight)?;
    }
    let verdict = classify(params, &weights, total_power)?;
    log::debug!(
        "[Tally] proposal {}: {:?} of total power {} -> {:?}",
        proposal_id,
        weights,
        total_power,
        verdict.outcome
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::app::Threshold;
    use proptest::prelude::*;

    fn params() -> GovernanceParams {
        GovernanceParams {
            quorum: Threshold::percent(40),
            threshold: Threshold::percent(50),
            veto_threshold: "1/3".parse().unwrap(),
            ..GovernanceParams::default()
        }
    }

    fn weights(yes: u64, abstain: u64, no: u64, no_with_veto: u64) -> OptionWeights {
        OptionWeights {
            yes,
            abstain,
            no,
            no_with_veto,
        }
    }

    #[test]
    fn test_single_yes_voter_with_all_power_passes() {
        let verdict = classify(&params(), &weights(100, 0, 0, 0), 100).unwrap();
        assert!(verdict.passed());
        assert_eq!(verdict.result.yes, Decimal::ONE);
    }

    #[test]
    fn test_veto_over_a_third_of_cast_power() {
        // 40% of cast power vetoes, above the 1/3 threshold.
        let verdict = classify(&params(), &weights(60, 0, 0, 40), 100).unwrap();
        assert!(verdict.vetoed());
        assert!(!verdict.passed());
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly half Yes does not pass.
        let verdict = classify(&params(), &weights(50, 0, 50, 0), 100).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Rejected);
        // Exactly a quarter veto does not veto a quarter threshold.
        let quarter = GovernanceParams {
            veto_threshold: Threshold::percent(25),
            ..params()
        };
        let verdict = classify(&quarter, &weights(3, 0, 0, 1), 4).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Passed);
        let verdict = classify(&quarter, &weights(3, 0, 0, 2), 5).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Vetoed);
    }

    #[test]
    fn test_exactly_a_third_veto_does_not_veto() {
        // One third of cast power sits exactly on a 1/3 veto threshold.
        let verdict = classify(&params(), &weights(2, 0, 0, 1), 3).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Passed);
        let verdict = classify(&params(), &weights(200, 0, 0, 100), 300).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Passed);
        // One unit more vetoes.
        let verdict = classify(&params(), &weights(200, 0, 0, 101), 301).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Vetoed);
    }

    #[test]
    fn test_exactly_two_thirds_yes_does_not_pass_a_two_thirds_threshold() {
        let supermajority = GovernanceParams {
            threshold: "2/3".parse().unwrap(),
            ..params()
        };
        let verdict = classify(&supermajority, &weights(2, 0, 1, 0), 3).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Rejected);
        let verdict = classify(&supermajority, &weights(600, 50, 300, 0), 950).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Rejected);
        let verdict = classify(&supermajority, &weights(601, 0, 300, 0), 901).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Passed);
    }

    #[test]
    fn test_quorum_is_inclusive_and_zero_power_is_no_quorum() {
        let verdict = classify(&params(), &weights(40, 0, 0, 0), 100).unwrap();
        assert!(verdict.passed());
        let verdict = classify(&params(), &weights(39, 0, 0, 0), 100).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::NoQuorum);
        let verdict = classify(&params(), &OptionWeights::default(), 0).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::NoQuorum);
        assert_eq!(verdict.result, TallyResult::default());
    }

    #[test]
    fn test_all_abstain_is_rejected() {
        let verdict = classify(&params(), &weights(0, 80, 0, 0), 100).unwrap();
        assert_eq!(verdict.outcome, TallyOutcome::Rejected);
    }

    #[test]
    fn test_weight_overflow_is_an_error() {
        let w = weights(u64::MAX, 1, 0, 0);
        assert!(classify(&params(), &w, u64::MAX).is_err());
    }

    proptest! {
        #[test]
        fn prop_shares_never_exceed_one(
            yes in 0u64..1_000_000,
            abstain in 0u64..1_000_000,
            no in 0u64..1_000_000,
            veto in 0u64..1_000_000,
            idle in 0u64..1_000_000,
        ) {
            let w = weights(yes, abstain, no, veto);
            let total = w.cast().unwrap() + idle;
            let verdict = classify(&params(), &w, total).unwrap();
            let sum = verdict.result.yes
                .checked_add(verdict.result.abstain)
                .and_then(|s| s.checked_add(verdict.result.no))
                .and_then(|s| s.checked_add(verdict.result.no_with_veto))
                .unwrap();
            prop_assert!(sum <= Decimal::ONE);
            if verdict.passed() {
                prop_assert!(yes * 2 > yes + no + veto);
            }
        }
    }
}
