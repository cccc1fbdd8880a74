//! # Loss Models
//!
//! One model per loss method, all sharing the stage sequence of
//! [`stages::LossStage`]:
//!
//! | Model                | Methods                              | Editions        |
//! |----------------------|--------------------------------------|-----------------|
//! | `RefinedPre2005`     | AASHTO, WSDOT refined; TxDOT 2004    | before 2005     |
//! | `Refined2005`        | AASHTO, WSDOT refined                | 2005 and later  |
//! | `TxDot2013`          | TxDOT 2013                           | any             |
//! | `ApproximatePre2005` | AASHTO, WSDOT approximate            | before 2005     |
//! | `Approximate2005`    | AASHTO, WSDOT approximate            | 2005 and later  |
//! | `GeneralLumpSum`     | general lump sum                     | any             |
//!
//! [`LossEngine`] picks the model, [`LossDetails`] pairs the result with the
//! method that produced it.

pub mod approximate;
pub mod engine;
pub mod gains;
pub mod general_lump_sum;
pub mod parameters;
pub mod refined_2005;
pub mod refined_pre2005;
pub mod stages;
pub mod transfer;
pub mod txdot_2013;

use serde::{Deserialize, Serialize};

use crate::bridge::PointOfInterest;
use crate::criteria::LossMethod;
use crate::errors::{LossError, LossResult};
use crate::status::Advisory;

pub use approximate::ApproximateLosses;
pub use engine::LossEngine;
pub use general_lump_sum::GeneralLumpSumLosses;
pub use parameters::{EvaluationContext, GirderConfig, LossParameters};
pub use refined_2005::Refined2005Losses;
pub use refined_pre2005::RefinedPre2005Losses;
pub use stages::{GainSource, LossComponents, LossStage, Milestone, StageLedger, StageLoss};
pub use txdot_2013::{MidspanElasticShortening, TxDot2013Losses};

/// Queries shared by every loss model (ksi; losses positive, gains negative)
pub trait PrestressLosses {
    fn ledger(&self) -> &StageLedger;

    fn jacking_stress(&self) -> f64 {
        self.ledger().jacking_stress()
    }

    fn relaxation_before_transfer(&self) -> f64 {
        self.ledger().stage_total(LossStage::RelaxationBeforeTransfer)
    }

    fn elastic_shortening(&self) -> f64 {
        self.ledger().stage_total(LossStage::ElasticShortening)
    }

    /// Shrinkage, creep and relaxation after transfer through a milestone
    fn time_dependent_loss(&self, milestone: Milestone) -> f64 {
        self.ledger().time_dependent_loss(milestone)
    }

    /// Increase in strand stress due to a load group (positive for a gain)
    fn elastic_gain(&self, source: GainSource) -> f64 {
        -self.ledger().stage_total(LossStage::ElasticGain(source))
    }

    /// Loss accumulated through a milestone, elastic gains excluded
    fn cumulative_loss(&self, milestone: Milestone) -> f64 {
        self.ledger().cumulative_loss(milestone)
    }

    /// Elastic gain accumulated through a milestone (positive for a gain)
    fn cumulative_gain(&self, milestone: Milestone) -> f64 {
        self.ledger().cumulative_gain(milestone)
    }

    fn effective_prestress(&self, milestone: Milestone) -> f64 {
        self.jacking_stress() - self.cumulative_loss(milestone) + self.cumulative_gain(milestone)
    }

    /// Effective prestress under full service load
    fn final_effective_prestress(&self) -> f64 {
        self.effective_prestress(Milestone::FinalWithLiveLoad)
    }

    fn stages(&self) -> &[StageLoss] {
        self.ledger().stages()
    }
}

/// Variant tag of a [`LossModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    RefinedPre2005,
    Refined2005,
    TxDot2013,
    ApproximatePre2005,
    Approximate2005,
    GeneralLumpSum,
}

impl ModelKind {
    /// Whether a method can produce this model
    pub fn accepts(&self, method: LossMethod) -> bool {
        use LossMethod::*;
        match self {
            ModelKind::RefinedPre2005 => {
                matches!(method, RefinedAashto | RefinedWsdot | RefinedTxDot2004)
            }
            ModelKind::Refined2005 => matches!(method, RefinedAashto | RefinedWsdot),
            ModelKind::TxDot2013 => method == RefinedTxDot2013,
            ModelKind::ApproximatePre2005 | ModelKind::Approximate2005 => method.is_approximate(),
            ModelKind::GeneralLumpSum => method == GeneralLumpSum,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKind::RefinedPre2005 => "refined estimate (before 2005)",
            ModelKind::Refined2005 => "refined estimate (2005 and later)",
            ModelKind::TxDot2013 => "TxDOT 2013 refined estimate",
            ModelKind::ApproximatePre2005 => "approximate lump sum (before 2005)",
            ModelKind::Approximate2005 => "approximate lump sum (2005 and later)",
            ModelKind::GeneralLumpSum => "general lump sum",
        }
    }
}

/// Result of one loss model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", content = "losses")]
pub enum LossModel {
    RefinedPre2005(RefinedPre2005Losses),
    Refined2005(Refined2005Losses),
    TxDot2013(TxDot2013Losses),
    ApproximatePre2005(ApproximateLosses),
    Approximate2005(ApproximateLosses),
    GeneralLumpSum(GeneralLumpSumLosses),
}

impl LossModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            LossModel::RefinedPre2005(_) => ModelKind::RefinedPre2005,
            LossModel::Refined2005(_) => ModelKind::Refined2005,
            LossModel::TxDot2013(_) => ModelKind::TxDot2013,
            LossModel::ApproximatePre2005(_) => ModelKind::ApproximatePre2005,
            LossModel::Approximate2005(_) => ModelKind::Approximate2005,
            LossModel::GeneralLumpSum(_) => ModelKind::GeneralLumpSum,
        }
    }

    fn as_losses(&self) -> &dyn PrestressLosses {
        match self {
            LossModel::RefinedPre2005(m) => m,
            LossModel::Refined2005(m) => m,
            LossModel::TxDot2013(m) => m,
            LossModel::ApproximatePre2005(m) | LossModel::Approximate2005(m) => m,
            LossModel::GeneralLumpSum(m) => m,
        }
    }
}

impl PrestressLosses for LossModel {
    fn ledger(&self) -> &StageLedger {
        self.as_losses().ledger()
    }

    fn elastic_shortening(&self) -> f64 {
        self.as_losses().elastic_shortening()
    }

    fn time_dependent_loss(&self, milestone: Milestone) -> f64 {
        self.as_losses().time_dependent_loss(milestone)
    }

    fn cumulative_loss(&self, milestone: Milestone) -> f64 {
        self.as_losses().cumulative_loss(milestone)
    }

    fn cumulative_gain(&self, milestone: Milestone) -> f64 {
        self.as_losses().cumulative_gain(milestone)
    }
}

/// Losses at a point of interest together with the method that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossDetails {
    poi: PointOfInterest,
    method: LossMethod,
    model: LossModel,
    advisories: Vec<Advisory>,
}

impl LossDetails {
    /// Pair a model with its method; fails if the method cannot produce the model.
    pub fn new(
        poi: PointOfInterest,
        method: LossMethod,
        model: LossModel,
        advisories: Vec<Advisory>,
    ) -> LossResult<Self> {
        let kind = model.kind();
        if !kind.accepts(method) {
            return Err(LossError::library_failure(format!(
                "the {} model cannot be produced by the {}",
                kind.display_name(),
                method.display_name()
            )));
        }
        Ok(LossDetails {
            poi,
            method,
            model,
            advisories,
        })
    }

    pub fn poi(&self) -> &PointOfInterest {
        &self.poi
    }

    pub fn method(&self) -> LossMethod {
        self.method
    }

    pub fn model(&self) -> &LossModel {
        &self.model
    }

    /// Non-fatal notes raised while computing
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

impl PrestressLosses for LossDetails {
    fn ledger(&self) -> &StageLedger {
        self.model.ledger()
    }

    fn elastic_shortening(&self) -> f64 {
        self.model.elastic_shortening()
    }

    fn time_dependent_loss(&self, milestone: Milestone) -> f64 {
        self.model.time_dependent_loss(milestone)
    }

    fn cumulative_loss(&self, milestone: Milestone) -> f64 {
        self.model.cumulative_loss(milestone)
    }

    fn cumulative_gain(&self, milestone: Milestone) -> f64 {
        self.model.cumulative_gain(milestone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::SegmentKey;
    use crate::criteria::LumpSumLosses;

    fn poi() -> PointOfInterest {
        PointOfInterest::new(SegmentKey::new(0, 0, 0), 120.0)
    }

    #[test]
    fn test_model_kind_accepts_methods() {
        assert!(ModelKind::Refined2005.accepts(LossMethod::RefinedWsdot));
        assert!(!ModelKind::Refined2005.accepts(LossMethod::RefinedTxDot2004));
        assert!(ModelKind::RefinedPre2005.accepts(LossMethod::RefinedTxDot2004));
        assert!(ModelKind::Approximate2005.accepts(LossMethod::ApproximateWsdot));
        assert!(!ModelKind::TxDot2013.accepts(LossMethod::RefinedAashto));
        for method in LossMethod::ALL {
            assert_eq!(
                ModelKind::GeneralLumpSum.accepts(method),
                method == LossMethod::GeneralLumpSum
            );
        }
    }

    fn lump_sum_model() -> LossModel {
        LossModel::GeneralLumpSum(GeneralLumpSumLosses::new(202.5, LumpSumLosses::default()))
    }

    #[test]
    fn test_details_reject_mismatched_method() {
        let model = lump_sum_model();
        let err = LossDetails::new(poi(), LossMethod::RefinedAashto, model.clone(), Vec::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "LIBRARY_FAILURE");

        let details =
            LossDetails::new(poi(), LossMethod::GeneralLumpSum, model, Vec::new()).unwrap();
        assert_eq!(details.method(), LossMethod::GeneralLumpSum);
        assert!((details.final_effective_prestress() - 167.5).abs() < 1e-12);
    }

    #[test]
    fn test_model_delegates_overridden_queries() {
        let model = lump_sum_model();
        assert_eq!(model.cumulative_loss(Milestone::AtHauling), 20.0);
        assert_eq!(model.time_dependent_loss(Milestone::Final), 23.0);
        assert_eq!(model.elastic_shortening(), 12.0);
    }
}
