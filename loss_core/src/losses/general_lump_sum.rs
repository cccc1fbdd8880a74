//! Owner-supplied lump sum losses
//!
//! Cumulative losses at each milestone are taken verbatim from the
//! criteria. No section or material input is consulted.

use serde::{Deserialize, Serialize};

use crate::criteria::LumpSumLosses;

use super::stages::{LossComponents, LossStage, Milestone, StageLedger};
use super::PrestressLosses;

/// Result of the general lump sum method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralLumpSumLosses {
    pub constants: LumpSumLosses,
    pub ledger: StageLedger,
}

/// Owner constant in force at a milestone (ksi, cumulative)
pub fn constant_at(constants: &LumpSumLosses, milestone: Milestone) -> f64 {
    match milestone {
        Milestone::BeforeTransfer => constants.before_transfer,
        Milestone::AfterTransfer => constants.after_transfer,
        Milestone::AtHauling => constants.at_shipping,
        Milestone::BeforeTemporaryStrandRemoval => constants.before_temporary_strand_removal,
        Milestone::AfterTemporaryStrandRemoval => constants.after_temporary_strand_removal,
        Milestone::BeforeDeckPlacement => constants.before_deck_placement,
        Milestone::AfterDeckPlacement => constants.after_deck_placement,
        Milestone::AfterSuperimposedDeadLoads => constants.after_superimposed_dead_loads,
        Milestone::Final | Milestone::FinalWithLiveLoad => constants.final_loss,
    }
}

impl GeneralLumpSumLosses {
    /// Build the result from the owner constants.
    pub fn new(jacking_stress: f64, constants: LumpSumLosses) -> Self {
        let mut ledger = StageLedger::new(jacking_stress);
        let mut previous = 0.0;
        for milestone in Milestone::ALL {
            let value = constant_at(&constants, milestone);
            ledger.push(LossStage::LumpSum, milestone, LossComponents::lump_sum(value - previous));
            previous = value;
        }
        GeneralLumpSumLosses { constants, ledger }
    }
}

impl PrestressLosses for GeneralLumpSumLosses {
    fn ledger(&self) -> &StageLedger {
        &self.ledger
    }

    fn cumulative_loss(&self, milestone: Milestone) -> f64 {
        constant_at(&self.constants, milestone)
    }

    fn elastic_shortening(&self) -> f64 {
        self.constants.after_transfer - self.constants.before_transfer
    }

    fn time_dependent_loss(&self, milestone: Milestone) -> f64 {
        if milestone <= Milestone::AfterTransfer {
            return 0.0;
        }
        (constant_at(&self.constants, milestone) - self.constants.after_transfer).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_reported_verbatim() {
        let losses = GeneralLumpSumLosses::new(202.5, LumpSumLosses::default());
        assert_eq!(losses.cumulative_loss(Milestone::AfterTransfer), 12.0);
        assert_eq!(losses.cumulative_loss(Milestone::Final), 35.0);
        assert_eq!(losses.effective_prestress(Milestone::Final), 202.5 - 35.0);
        assert_eq!(losses.elastic_shortening(), 12.0);
    }

    #[test]
    fn test_ledger_increments_telescope() {
        let losses = GeneralLumpSumLosses::new(202.5, LumpSumLosses::default());
        assert_eq!(losses.ledger.stages().len(), Milestone::ALL.len());
        let sum: f64 = losses.ledger.stages().iter().map(|s| s.total()).sum();
        assert!((sum - 35.0).abs() < 1e-12);
    }
}
