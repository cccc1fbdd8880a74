//! Stage-by-stage loss bookkeeping
//!
//! Every loss model records what happens to the permanent strands as a
//! list of [`StageLoss`] entries, each tagged with the [`Milestone`] at
//! which it has fully occurred. Cumulative figures are always derived from
//! the list so no stage can be dropped silently. Losses and elastic gains
//! accumulate separately:
//!
//! ```text
//! fpe(m) = fpj - cumulative_loss(m) + cumulative_gain(m)
//! ```

use serde::{Deserialize, Serialize};

/// Staging milestones, in construction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Milestone {
    BeforeTransfer,
    AfterTransfer,
    AtHauling,
    BeforeTemporaryStrandRemoval,
    AfterTemporaryStrandRemoval,
    BeforeDeckPlacement,
    AfterDeckPlacement,
    AfterSuperimposedDeadLoads,
    Final,
    FinalWithLiveLoad,
}

impl Milestone {
    /// All milestones in order
    pub const ALL: [Milestone; 10] = [
        Milestone::BeforeTransfer,
        Milestone::AfterTransfer,
        Milestone::AtHauling,
        Milestone::BeforeTemporaryStrandRemoval,
        Milestone::AfterTemporaryStrandRemoval,
        Milestone::BeforeDeckPlacement,
        Milestone::AfterDeckPlacement,
        Milestone::AfterSuperimposedDeadLoads,
        Milestone::Final,
        Milestone::FinalWithLiveLoad,
    ];

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Milestone::BeforeTransfer => "Before transfer",
            Milestone::AfterTransfer => "After transfer",
            Milestone::AtHauling => "At hauling",
            Milestone::BeforeTemporaryStrandRemoval => "Before temporary strand removal",
            Milestone::AfterTemporaryStrandRemoval => "After temporary strand removal",
            Milestone::BeforeDeckPlacement => "Before deck placement",
            Milestone::AfterDeckPlacement => "After deck placement",
            Milestone::AfterSuperimposedDeadLoads => "After superimposed dead loads",
            Milestone::Final => "Final",
            Milestone::FinalWithLiveLoad => "Final with live load",
        }
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Load group causing an elastic gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GainSource {
    /// Slab, haunch, diaphragms and construction loads on the girder section
    DeckPlacement,
    /// Deck loads carried by the girder and structural longitudinal joints
    LongitudinalJoints,
    /// Railing, sidewalk, overlay and user loads on the composite section
    SuperimposedDeadLoad,
    LiveLoad,
}

/// A stage of the loss sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossStage {
    RelaxationBeforeTransfer,
    ElasticShortening,
    /// Friction, anchor set and elastic effect of post-tensioning temporary strands
    TemporaryStrandPostTensioning,
    TransferToHauling,
    HaulingToDeck,
    /// Transfer to deck placement when no hauling stage is reported
    TransferToDeck,
    TemporaryStrandRemoval,
    DeckToFinal,
    DeckShrinkage,
    ElasticGain(GainSource),
    /// Approximate or owner-supplied lump sum
    LumpSum,
}

impl LossStage {
    /// Whether the stage is a time-dependent loss of the strands
    pub fn is_time_dependent(&self) -> bool {
        matches!(
            self,
            LossStage::TransferToHauling
                | LossStage::HaulingToDeck
                | LossStage::TransferToDeck
                | LossStage::DeckToFinal
                | LossStage::LumpSum
        )
    }

    /// Whether the stage is an elastic change caused by loads or strand removal
    pub fn is_elastic_gain(&self) -> bool {
        matches!(
            self,
            LossStage::ElasticGain(_) | LossStage::TemporaryStrandRemoval | LossStage::DeckShrinkage
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LossStage::RelaxationBeforeTransfer => "Relaxation before transfer",
            LossStage::ElasticShortening => "Elastic shortening",
            LossStage::TemporaryStrandPostTensioning => "Post-tensioning of temporary strands",
            LossStage::TransferToHauling => "Transfer to hauling",
            LossStage::HaulingToDeck => "Hauling to deck placement",
            LossStage::TransferToDeck => "Transfer to deck placement",
            LossStage::TemporaryStrandRemoval => "Temporary strand removal",
            LossStage::DeckToFinal => "Deck placement to final",
            LossStage::DeckShrinkage => "Deck shrinkage",
            LossStage::ElasticGain(source) => match source {
                GainSource::DeckPlacement => "Elastic gain, deck placement",
                GainSource::LongitudinalJoints => "Elastic gain, longitudinal joints",
                GainSource::SuperimposedDeadLoad => "Elastic gain, superimposed dead load",
                GainSource::LiveLoad => "Elastic gain, live load",
            },
            LossStage::LumpSum => "Lump sum",
        }
    }
}

impl std::fmt::Display for LossStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Contributions to a stage loss (ksi, loss positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LossComponents {
    pub relaxation: f64,
    pub elastic: f64,
    pub shrinkage: f64,
    pub autogenous_shrinkage: f64,
    pub creep: f64,
    pub friction: f64,
    pub anchor_set: f64,
    pub lump_sum: f64,
}

impl LossComponents {
    pub fn total(&self) -> f64 {
        self.relaxation
            + self.elastic
            + self.shrinkage
            + self.autogenous_shrinkage
            + self.creep
            + self.friction
            + self.anchor_set
            + self.lump_sum
    }

    pub fn relaxation(value: f64) -> Self {
        LossComponents {
            relaxation: value,
            ..Default::default()
        }
    }

    pub fn elastic(value: f64) -> Self {
        LossComponents {
            elastic: value,
            ..Default::default()
        }
    }

    pub fn lump_sum(value: f64) -> Self {
        LossComponents {
            lump_sum: value,
            ..Default::default()
        }
    }

    /// Every component multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        LossComponents {
            relaxation: self.relaxation * factor,
            elastic: self.elastic * factor,
            shrinkage: self.shrinkage * factor,
            autogenous_shrinkage: self.autogenous_shrinkage * factor,
            creep: self.creep * factor,
            friction: self.friction * factor,
            anchor_set: self.anchor_set * factor,
            lump_sum: self.lump_sum * factor,
        }
    }
}

impl std::ops::Sub for LossComponents {
    type Output = LossComponents;

    fn sub(self, rhs: LossComponents) -> LossComponents {
        LossComponents {
            relaxation: self.relaxation - rhs.relaxation,
            elastic: self.elastic - rhs.elastic,
            shrinkage: self.shrinkage - rhs.shrinkage,
            autogenous_shrinkage: self.autogenous_shrinkage - rhs.autogenous_shrinkage,
            creep: self.creep - rhs.creep,
            friction: self.friction - rhs.friction,
            anchor_set: self.anchor_set - rhs.anchor_set,
            lump_sum: self.lump_sum - rhs.lump_sum,
        }
    }
}

impl std::ops::Add for LossComponents {
    type Output = LossComponents;

    fn add(self, rhs: LossComponents) -> LossComponents {
        self - rhs.scaled(-1.0)
    }
}

/// One stage of the loss sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageLoss {
    pub stage: LossStage,
    /// Milestone by which the stage has fully occurred
    pub milestone: Milestone,
    pub components: LossComponents,
}

impl StageLoss {
    pub fn total(&self) -> f64 {
        self.components.total()
    }
}

/// Ordered record of stage losses in one strand group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StageLedger {
    jacking_stress: f64,
    stages: Vec<StageLoss>,
}

impl StageLedger {
    pub fn new(jacking_stress: f64) -> Self {
        StageLedger {
            jacking_stress,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, stage: LossStage, milestone: Milestone, components: LossComponents) {
        self.stages.push(StageLoss {
            stage,
            milestone,
            components,
        });
    }

    pub fn jacking_stress(&self) -> f64 {
        self.jacking_stress
    }

    pub fn stages(&self) -> &[StageLoss] {
        &self.stages
    }

    /// Whether a stage was computed
    pub fn contains(&self, stage: LossStage) -> bool {
        self.stages.iter().any(|s| s.stage == stage)
    }

    /// Sum of every entry recorded for a stage; zero if the stage is absent
    pub fn stage_total(&self, stage: LossStage) -> f64 {
        self.stages.iter().filter(|s| s.stage == stage).map(StageLoss::total).sum()
    }

    /// Loss accumulated through a milestone, excluding elastic gains (ksi)
    pub fn cumulative_loss(&self, milestone: Milestone) -> f64 {
        self.stages
            .iter()
            .filter(|s| s.milestone <= milestone && !s.stage.is_elastic_gain())
            .map(StageLoss::total)
            .sum()
    }

    /// Elastic gain accumulated through a milestone (ksi, positive for a gain)
    pub fn cumulative_gain(&self, milestone: Milestone) -> f64 {
        -self
            .stages
            .iter()
            .filter(|s| s.milestone <= milestone && s.stage.is_elastic_gain())
            .map(StageLoss::total)
            .sum::<f64>()
    }

    /// Time-dependent loss accumulated through a milestone, excluding elastic effects (ksi)
    pub fn time_dependent_loss(&self, milestone: Milestone) -> f64 {
        self.stages
            .iter()
            .filter(|s| s.milestone <= milestone && s.stage.is_time_dependent())
            .map(StageLoss::total)
            .sum()
    }

    /// Effective prestress at a milestone (ksi)
    pub fn effective_prestress(&self, milestone: Milestone) -> f64 {
        self.jacking_stress - self.cumulative_loss(milestone) + self.cumulative_gain(milestone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> StageLedger {
        let mut ledger = StageLedger::new(202.5);
        ledger.push(
            LossStage::RelaxationBeforeTransfer,
            Milestone::BeforeTransfer,
            LossComponents::relaxation(2.0),
        );
        ledger.push(
            LossStage::ElasticShortening,
            Milestone::AfterTransfer,
            LossComponents::elastic(15.0),
        );
        ledger.push(
            LossStage::TransferToDeck,
            Milestone::BeforeTemporaryStrandRemoval,
            LossComponents {
                shrinkage: 5.0,
                creep: 8.0,
                relaxation: 1.0,
                ..Default::default()
            },
        );
        ledger.push(
            LossStage::ElasticGain(GainSource::DeckPlacement),
            Milestone::AfterDeckPlacement,
            LossComponents::elastic(-4.0),
        );
        ledger.push(
            LossStage::DeckToFinal,
            Milestone::Final,
            LossComponents {
                shrinkage: 3.0,
                creep: 4.0,
                ..Default::default()
            },
        );
        ledger
    }

    #[test]
    fn test_milestones_are_ordered() {
        for pair in Milestone::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_cumulative_loss_sums_stages() {
        let ledger = ledger();
        assert!((ledger.cumulative_loss(Milestone::BeforeTransfer) - 2.0).abs() < 1e-12);
        assert!((ledger.cumulative_loss(Milestone::AfterTransfer) - 17.0).abs() < 1e-12);
        assert!((ledger.cumulative_loss(Milestone::BeforeDeckPlacement) - 31.0).abs() < 1e-12);
        assert!((ledger.cumulative_loss(Milestone::AfterDeckPlacement) - 31.0).abs() < 1e-12);
        assert!((ledger.cumulative_loss(Milestone::FinalWithLiveLoad) - 38.0).abs() < 1e-12);
    }

    #[test]
    fn test_gains_accumulate_apart_from_losses() {
        let ledger = ledger();
        assert_eq!(ledger.cumulative_gain(Milestone::BeforeDeckPlacement), 0.0);
        assert!((ledger.cumulative_gain(Milestone::AfterDeckPlacement) - 4.0).abs() < 1e-12);
        assert!((ledger.cumulative_gain(Milestone::Final) - 4.0).abs() < 1e-12);
        for pair in Milestone::ALL.windows(2) {
            assert!(ledger.cumulative_loss(pair[0]) <= ledger.cumulative_loss(pair[1]));
        }
    }

    #[test]
    fn test_time_dependent_loss_excludes_gains() {
        let ledger = ledger();
        assert!((ledger.time_dependent_loss(Milestone::AfterTransfer)).abs() < 1e-12);
        assert!((ledger.time_dependent_loss(Milestone::Final) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_effective_prestress() {
        let ledger = ledger();
        let at_final = ledger.effective_prestress(Milestone::Final);
        let before_deck = ledger.effective_prestress(Milestone::BeforeDeckPlacement);
        assert!((at_final - (202.5 - 38.0 + 4.0)).abs() < 1e-12);
        assert!((before_deck - (202.5 - 31.0)).abs() < 1e-12);
    }

    #[test]
    fn test_absent_stage() {
        let ledger = ledger();
        assert!(!ledger.contains(LossStage::DeckShrinkage));
        assert_eq!(ledger.stage_total(LossStage::DeckShrinkage), 0.0);
    }

    #[test]
    fn test_component_arithmetic() {
        let a = LossComponents {
            shrinkage: 5.0,
            creep: 8.0,
            ..Default::default()
        };
        let b = LossComponents {
            shrinkage: 2.0,
            creep: 3.0,
            ..Default::default()
        };
        let diff = a - b;
        assert_eq!(diff.shrinkage, 3.0);
        assert_eq!(diff.creep, 5.0);
        assert_eq!((diff + b), a);
        assert_eq!(a.scaled(0.5).total(), 6.5);
    }
}
