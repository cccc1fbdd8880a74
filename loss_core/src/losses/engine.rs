//! Loss method dispatcher
//!
//! [`LossEngine`] selects the loss model for the configured method and code
//! edition, runs it at a point of interest and wraps the result in
//! [`LossDetails`]. Every failure is classified into a
//! [`LossComputationError`] scoped to the segment; the engine itself never
//! reports. Use [`LossEngine::compute_and_report`] to forward diagnostics to
//! a [`StatusReporter`].
//!
//! The TxDOT 2013 method evaluates elastic shortening at midspan when Fcgp
//! is resolved with the assumed stress method. [`LossEngine::prepare_segment`]
//! fills a per-segment memo with that value before points are evaluated;
//! points on a segment that was not prepared compute it on demand.

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::bridge::{LossContext, PointOfInterest, SegmentKey};
use crate::criteria::{FcgpPolicy, LossMethod, SpecificationEdition};
use crate::errors::{LossComputationError, LossError, LossResult};
use crate::loads::ConstructionEvent;
use crate::lrfd::FcgpMethod;
use crate::materials::StrandType;
use crate::status::{Advisory, StatusItem, StatusReporter};

use super::general_lump_sum::GeneralLumpSumLosses;
use super::parameters::{required_interval, EvaluationContext, LossParameters};
use super::refined_2005::RefinedOptions;
use super::transfer::resolve_fcgp_method;
use super::txdot_2013::MidspanElasticShortening;
use super::{approximate, refined_2005, refined_pre2005, txdot_2013, LossDetails, LossModel};

/// Runs loss computations against one set of collaborators
#[derive(Debug)]
pub struct LossEngine<'a> {
    ctx: LossContext<'a>,
    midspan: HashMap<SegmentKey, MidspanElasticShortening>,
}

impl<'a> LossEngine<'a> {
    pub fn new(ctx: LossContext<'a>) -> Self {
        LossEngine {
            ctx,
            midspan: HashMap::new(),
        }
    }

    pub fn context(&self) -> &LossContext<'a> {
        &self.ctx
    }

    /// Midspan elastic shortening cached for a segment
    pub fn midspan_elastic_shortening(
        &self,
        segment: &SegmentKey,
    ) -> Option<&MidspanElasticShortening> {
        self.midspan.get(segment)
    }

    /// Populate the midspan memo of a segment.
    ///
    /// Does nothing unless the TxDOT 2013 method is configured with a policy
    /// that can select the assumed stress method. Calling it again for the
    /// same segment is a no-op.
    pub fn prepare_segment(&mut self, segment: &SegmentKey) -> Result<(), LossComputationError> {
        let criteria = self.ctx.criteria;
        if criteria.loss_method != LossMethod::RefinedTxDot2013
            || criteria.fcgp_policy == FcgpPolicy::Iterative
            || self.midspan.contains_key(segment)
        {
            return Ok(());
        }
        let midspan = criteria
            .validate()
            .and_then(|_| self.check_concrete_type(segment))
            .and_then(|_| self.compute_midspan(segment, &EvaluationContext::analysis()))
            .map_err(|e| LossComputationError::new(*segment, e))?;
        debug!(%segment, es = midspan.elastic.loss, "cached midspan elastic shortening");
        self.midspan.insert(*segment, midspan);
        Ok(())
    }

    /// Compute the losses at a point of interest.
    ///
    /// # Example
    ///
    /// ```rust
    /// use loss_core::criteria::LossCriteria;
    /// use loss_core::losses::{EvaluationContext, LossEngine, Milestone, PrestressLosses};
    /// use loss_core::scenario::GirderScenario;
    ///
    /// let scenario = GirderScenario::template();
    /// let criteria = LossCriteria::default();
    /// let engine = LossEngine::new(scenario.context(&criteria));
    /// let poi = scenario.points(11)[5];
    ///
    /// let details = engine.compute_losses(&poi, &EvaluationContext::analysis()).unwrap();
    /// assert!(details.effective_prestress(Milestone::Final) < details.jacking_stress());
    /// ```
    #[instrument(skip(self, eval), fields(segment = %poi.segment, x = poi.distance_from_start))]
    pub fn compute_losses(
        &self,
        poi: &PointOfInterest,
        eval: &EvaluationContext,
    ) -> Result<LossDetails, LossComputationError> {
        self.evaluate(poi, eval)
            .and_then(|(model, advisories)| {
                LossDetails::new(*poi, self.ctx.criteria.loss_method, model, advisories)
            })
            .map_err(|e| LossComputationError::new(poi.segment, e))
    }

    /// Compute the losses at a point and forward diagnostics to a reporter.
    ///
    /// On success the advisories are reported; on failure the error is.
    pub fn compute_and_report(
        &self,
        poi: &PointOfInterest,
        eval: &EvaluationContext,
        reporter: &dyn StatusReporter,
    ) -> Result<LossDetails, LossComputationError> {
        match self.compute_losses(poi, eval) {
            Ok(details) => {
                for advisory in details.advisories() {
                    reporter.report(StatusItem::from_advisory(poi.segment, advisory));
                }
                Ok(details)
            }
            Err(error) => {
                reporter.report(StatusItem::from_error(&error));
                Err(error)
            }
        }
    }

    /// Prepare a segment and evaluate every point on it
    pub fn compute_segment(
        &mut self,
        segment: &SegmentKey,
        pois: &[PointOfInterest],
        eval: &EvaluationContext,
    ) -> Vec<Result<LossDetails, LossComputationError>> {
        if let Err(error) = self.prepare_segment(segment) {
            return pois.iter().map(|_| Err(error.clone())).collect();
        }
        pois.iter().map(|poi| self.compute_losses(poi, eval)).collect()
    }

    fn evaluate(
        &self,
        poi: &PointOfInterest,
        eval: &EvaluationContext,
    ) -> LossResult<(LossModel, Vec<Advisory>)> {
        let criteria = self.ctx.criteria;
        criteria.validate()?;
        self.check_concrete_type(&poi.segment)?;

        let method = criteria.loss_method;
        info!(
            method = method.display_name(),
            edition = criteria.edition.display_name(),
            design = eval.design_candidate,
            "computing prestress losses"
        );

        if method == LossMethod::GeneralLumpSum {
            let fpj = self.jacking_stress(poi, eval)?;
            return Ok((
                LossModel::GeneralLumpSum(GeneralLumpSumLosses::new(fpj, criteria.lump_sum)),
                Vec::new(),
            ));
        }

        let params = LossParameters::extract(&self.ctx, poi, eval)?;
        let (fcgp_method, advisory) = resolve_fcgp_method(criteria.fcgp_policy, &params);
        let model = self.staged_model(&params, fcgp_method, eval)?;
        Ok((model, advisory.into_iter().collect()))
    }

    fn staged_model(
        &self,
        params: &LossParameters,
        fcgp_method: FcgpMethod,
        eval: &EvaluationContext,
    ) -> LossResult<LossModel> {
        let criteria = self.ctx.criteria;
        let edition_2005 = criteria.edition.uses_2005_losses();
        let model = match criteria.loss_method {
            LossMethod::RefinedAashto | LossMethod::RefinedWsdot if edition_2005 => {
                let options = RefinedOptions {
                    relaxation: criteria.relaxation_method,
                    fcgp_method,
                    elastic_override: None,
                };
                LossModel::Refined2005(refined_2005::compute(params, criteria, options)?)
            }
            LossMethod::RefinedAashto | LossMethod::RefinedWsdot => LossModel::RefinedPre2005(
                refined_pre2005::compute(params, criteria, fcgp_method, false)?,
            ),
            LossMethod::RefinedTxDot2004 => LossModel::RefinedPre2005(refined_pre2005::compute(
                params,
                criteria,
                fcgp_method,
                true,
            )?),
            LossMethod::RefinedTxDot2013 => {
                let midspan = match fcgp_method {
                    FcgpMethod::AssumedStress => Some(self.midspan_for(&params.poi.segment, eval)?),
                    FcgpMethod::Iterative => None,
                };
                LossModel::TxDot2013(txdot_2013::compute(
                    params,
                    criteria,
                    fcgp_method,
                    midspan.as_ref(),
                )?)
            }
            LossMethod::ApproximateAashto | LossMethod::ApproximateWsdot if edition_2005 => {
                let losses = approximate::compute(params, criteria, fcgp_method, true)?;
                LossModel::Approximate2005(losses)
            }
            LossMethod::ApproximateAashto | LossMethod::ApproximateWsdot => {
                let losses = approximate::compute(params, criteria, fcgp_method, false)?;
                LossModel::ApproximatePre2005(losses)
            }
            LossMethod::GeneralLumpSum => LossModel::GeneralLumpSum(GeneralLumpSumLosses::new(
                params.permanent.fpj,
                criteria.lump_sum,
            )),
        };
        Ok(model)
    }

    /// Memoized midspan value for analysis; design candidates always recompute.
    fn midspan_for(
        &self,
        segment: &SegmentKey,
        eval: &EvaluationContext,
    ) -> LossResult<MidspanElasticShortening> {
        if !eval.design_candidate {
            if let Some(midspan) = self.midspan.get(segment) {
                return Ok(*midspan);
            }
        }
        self.compute_midspan(segment, eval)
    }

    fn compute_midspan(
        &self,
        segment: &SegmentKey,
        eval: &EvaluationContext,
    ) -> LossResult<MidspanElasticShortening> {
        let poi = self.ctx.bridge.midspan_poi(segment)?;
        let params = LossParameters::extract(&self.ctx, &poi, eval)?;
        MidspanElasticShortening::compute(&params, self.ctx.criteria, FcgpMethod::AssumedStress)
    }

    /// Jacking stress of the permanent strands, honoring a design override
    fn jacking_stress(&self, poi: &PointOfInterest, eval: &EvaluationContext) -> LossResult<f64> {
        if let Some(fpj) = eval.override_config.and_then(|c| c.permanent_jacking_stress) {
            return Ok(fpj);
        }
        let release = required_interval(&self.ctx, ConstructionEvent::Release)?;
        Ok(self.ctx.strands.strand(poi, release, StrandType::Permanent)?.jacking_stress)
    }

    /// UHPC girders require a supporting method and edition.
    ///
    /// Runs before any section property is requested.
    fn check_concrete_type(&self, segment: &SegmentKey) -> LossResult<()> {
        let criteria = self.ctx.criteria;
        let release = required_interval(&self.ctx, ConstructionEvent::Release)?;
        let concrete_type = self.ctx.materials.segment_concrete(segment, release)?.concrete_type;
        if !concrete_type.is_uhpc() {
            return Ok(());
        }
        let reason = if !criteria.loss_method.supports_uhpc() {
            format!(
                "{} girders require the AASHTO or WSDOT refined estimate or a general lump sum",
                concrete_type.display_name()
            )
        } else if criteria.edition < SpecificationEdition::UHPC_SUPPORT {
            format!(
                "{} girders require {} or later",
                concrete_type.display_name(),
                SpecificationEdition::UHPC_SUPPORT.display_name()
            )
        } else {
            return Ok(());
        };
        Err(LossError::IncompatibleConcreteType {
            concrete: concrete_type.display_name().to_string(),
            method: criteria.loss_method.display_name().to_string(),
            edition: criteria.edition.display_name().to_string(),
            reason,
        })
    }
}
