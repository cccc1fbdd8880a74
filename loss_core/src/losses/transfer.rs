//! Stages at and immediately after transfer
//!
//! Shared by every staged loss model:
//!
//! 1. relaxation before transfer
//! 2. elastic shortening, with the Fcgp sub-algorithm chosen by policy
//! 3. friction, anchor set and elastic effect of post-tensioned temporary strands
//!
//! Also tracks the temporary strands themselves up to their removal.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bridge::TemporaryStrandUsage;
use crate::criteria::FcgpPolicy;
use crate::errors::{LossResult, Severity};
use crate::lrfd::elastic_shortening::{elastic_shortening, ElasticShorteningInputs, TransferStrands};
use crate::lrfd::friction::{post_tension_losses, PostTensionLosses};
use crate::lrfd::relaxation::relaxation_before_transfer;
use crate::lrfd::{ElasticShortening, FcgpMethod};
use crate::status::Advisory;

use super::parameters::{LossParameters, StrandParameters};
use super::stages::{LossComponents, LossStage, Milestone, StageLedger};

/// Jacking stress ratio fpj/fpu assumed by the assumed-stress Fcgp method
pub const ASSUMED_JACKING_RATIO: f64 = 0.75;

/// Tolerance on the jacking stress when checking the assumed-stress preconditions (ksi)
pub const JACKING_STRESS_TOLERANCE: f64 = 1.0e-3;

/// Conditions under which the assumed-stress Fcgp method is not valid
pub fn assumed_stress_violations(params: &LossParameters) -> Vec<&'static str> {
    let mut reasons = Vec::new();
    if params.has_temporary_strands() {
        reasons.push("temporary strands are present");
    }
    if params.has_debonding {
        reasons.push("strands are debonded");
    }
    if !params.is_prismatic {
        reasons.push("the girder is not prismatic");
    }
    let assumed = ASSUMED_JACKING_RATIO * params.permanent.material.fpu;
    let off_assumed = (params.permanent.fpj - assumed).abs() > JACKING_STRESS_TOLERANCE;
    if params.permanent.is_present() && off_assumed {
        reasons.push("the jacking stress is not 0.75fpu");
    }
    reasons
}

/// Decide which Fcgp sub-algorithm runs under a policy.
///
/// The hybrid policy returns an advisory when it falls back to iteration.
pub fn resolve_fcgp_method(
    policy: FcgpPolicy,
    params: &LossParameters,
) -> (FcgpMethod, Option<Advisory>) {
    match policy {
        FcgpPolicy::AssumedStress => (FcgpMethod::AssumedStress, None),
        FcgpPolicy::Iterative => (FcgpMethod::Iterative, None),
        FcgpPolicy::Hybrid => {
            let reasons = assumed_stress_violations(params);
            if reasons.is_empty() {
                return (FcgpMethod::AssumedStress, None);
            }
            let message = format!(
                "Fcgp was computed iteratively because {}; \
                 the assumed stress method does not apply",
                reasons.join(", ")
            );
            warn!(segment = %params.poi.segment, x = params.poi.distance_from_start, "{message}");
            (
                FcgpMethod::Iterative,
                Some(Advisory::new(Severity::Info, Advisory::FCGP_ITERATIVE_FALLBACK, message)),
            )
        }
    }
}

/// Post-tensioning of temporary strands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostTensionStage {
    pub milestone: Milestone,
    /// Friction and anchor set in the temporary strands
    pub temporary: PostTensionLosses,
    /// Force in the temporary strands after seating (kip)
    pub force: f64,
    /// Elastic loss in the permanent strands (ksi)
    pub permanent_effect: f64,
}

/// Losses through transfer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferLosses {
    pub fcgp_method: FcgpMethod,
    /// Whether relaxation before transfer is part of the sequence
    pub initial_relaxation: bool,
    /// Relaxation before transfer, permanent strands (ksi)
    pub relaxation: f64,
    /// Relaxation before transfer, temporary strands (ksi)
    pub temporary_relaxation: f64,
    pub elastic: ElasticShortening,
    pub post_tension: Option<PostTensionStage>,
}

impl TransferLosses {
    /// Compute stages 1 through 3.
    ///
    /// # Arguments
    /// * `method` - Fcgp sub-algorithm already resolved for the point
    /// * `elastic_override` - Elastic shortening to use instead of computing it here
    /// * `initial_relaxation` - Whether relaxation before transfer is part of the sequence
    pub fn compute(
        params: &LossParameters,
        method: FcgpMethod,
        elastic_override: Option<ElasticShortening>,
        initial_relaxation: bool,
    ) -> LossResult<Self> {
        let days = params.ages.jacking_to_transfer;
        let relaxation_of = |strands: &StrandParameters| {
            if initial_relaxation && strands.is_present() {
                relaxation_before_transfer(strands.fpj, &strands.material, days)
            } else {
                0.0
            }
        };
        let relaxation = relaxation_of(&params.permanent);
        let temporary_relaxation = if params.has_pretensioned_temporary_strands() {
            relaxation_of(&params.temporary)
        } else {
            0.0
        };

        let elastic = match elastic_override {
            Some(elastic) => elastic,
            None => {
                let inputs = elastic_inputs(params, relaxation, temporary_relaxation);
                elastic_shortening(&inputs, method)?
            }
        };

        let post_tension = post_tension_stage(params);

        debug!(
            relaxation,
            es = elastic.loss,
            fcgp = elastic.fcgp,
            method = ?method,
            "transfer losses"
        );
        Ok(TransferLosses {
            fcgp_method: method,
            initial_relaxation,
            relaxation,
            temporary_relaxation,
            elastic,
            post_tension,
        })
    }

    /// Concrete stress at the permanent strands at transfer (ksi)
    pub fn fcgp(&self) -> f64 {
        self.elastic.fcgp
    }

    /// Stress in the permanent strands immediately after transfer (ksi)
    pub fn stress_after_transfer(&self, fpj: f64) -> f64 {
        fpj - self.relaxation - self.elastic.loss
    }

    /// Record stages 1 through 3 in a ledger
    pub fn record(&self, ledger: &mut StageLedger) {
        if self.initial_relaxation {
            ledger.push(
                LossStage::RelaxationBeforeTransfer,
                Milestone::BeforeTransfer,
                LossComponents::relaxation(self.relaxation),
            );
        }
        ledger.push(
            LossStage::ElasticShortening,
            Milestone::AfterTransfer,
            LossComponents::elastic(self.elastic.loss),
        );
        if let Some(pt) = &self.post_tension {
            ledger.push(
                LossStage::TemporaryStrandPostTensioning,
                pt.milestone,
                LossComponents::elastic(pt.permanent_effect),
            );
        }
    }
}

/// Elastic shortening inputs at the point
pub fn elastic_inputs(
    params: &LossParameters,
    relaxation: f64,
    temporary_relaxation: f64,
) -> ElasticShorteningInputs {
    let section = &params.release_section;
    let permanent = TransferStrands {
        area: params.permanent.area,
        fpj: params.permanent.fpj,
        relaxation,
        eccentricity: params.permanent.eccentricity(section),
        transfer_factor: params.permanent.transfer_factor,
    };
    let temporary = params.has_pretensioned_temporary_strands().then(|| TransferStrands {
        area: params.temporary.area,
        fpj: params.temporary.fpj,
        relaxation: temporary_relaxation,
        eccentricity: params.temporary.eccentricity(section),
        transfer_factor: params.temporary.transfer_factor,
    });
    ElasticShorteningInputs {
        ep: params.permanent.material.ep,
        eci: params.eci,
        fpu: params.permanent.material.fpu,
        area: section.area,
        inertia: section.bending_inertia(),
        girder_moment: params.girder_moment,
        permanent,
        temporary,
    }
}

fn post_tension_stage(params: &LossParameters) -> Option<PostTensionStage> {
    if !params.has_temporary_strands() || !params.temporary_usage.is_post_tensioned() {
        return None;
    }
    let temp = &params.temporary;
    let section = &params.release_section;
    let losses = post_tension_losses(
        temp.fpj,
        temp.material.ep,
        &params.friction,
        params.poi.distance_from_start,
        params.segment_length,
    );
    let force = temp.area * (temp.fpj - losses.total()).max(0.0);
    let e = params.permanent.eccentricity(section);
    let et = temp.eccentricity(section);
    let inertia = section.bending_inertia();
    let resolvable = section.area > 0.0 && inertia > 0.0 && params.eci > 0.0;
    let permanent_effect = if params.permanent.is_present() && resolvable {
        let fcgp = force / section.area + force * et * e / inertia;
        params.permanent.material.ep / params.eci * fcgp
    } else {
        0.0
    };
    let milestone = match params.temporary_usage {
        TemporaryStrandUsage::PostTensionedBeforeShipping => Milestone::AtHauling,
        _ => Milestone::AfterTransfer,
    };
    Some(PostTensionStage {
        milestone,
        temporary: losses,
        force,
        permanent_effect,
    })
}

/// Losses in the temporary strands up to their removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryStrandLosses {
    pub ledger: StageLedger,
    /// Effective stress immediately before removal (ksi)
    pub effective_before_removal: f64,
}

impl TemporaryStrandLosses {
    /// Track the temporary strands through transfer and the time-dependent
    /// losses that occur before they are removed.
    pub fn compute(
        params: &LossParameters,
        transfer: &TransferLosses,
        time_dependent: LossComponents,
    ) -> Option<TemporaryStrandLosses> {
        if !params.has_temporary_strands() {
            return None;
        }
        let mut ledger = StageLedger::new(params.temporary.fpj);
        match &transfer.post_tension {
            Some(pt) => ledger.push(
                LossStage::TemporaryStrandPostTensioning,
                pt.milestone,
                LossComponents {
                    friction: pt.temporary.friction,
                    anchor_set: pt.temporary.anchor_set,
                    ..Default::default()
                },
            ),
            None => {
                if transfer.initial_relaxation {
                    ledger.push(
                        LossStage::RelaxationBeforeTransfer,
                        Milestone::BeforeTransfer,
                        LossComponents::relaxation(transfer.temporary_relaxation),
                    );
                }
                ledger.push(
                    LossStage::ElasticShortening,
                    Milestone::AfterTransfer,
                    LossComponents::elastic(transfer.elastic.temporary_loss),
                );
            }
        }
        ledger.push(
            LossStage::TransferToDeck,
            Milestone::BeforeTemporaryStrandRemoval,
            time_dependent,
        );
        let effective_before_removal =
            ledger.effective_prestress(Milestone::BeforeTemporaryStrandRemoval);
        Some(TemporaryStrandLosses {
            ledger,
            effective_before_removal,
        })
    }

    /// Elastic effect on the permanent strands of releasing the temporary
    /// strand force (ksi, loss positive)
    pub fn removal_effect(&self, params: &LossParameters) -> f64 {
        let section = &params.girder_section;
        let inertia = section.bending_inertia();
        let resolvable = section.area > 0.0 && inertia > 0.0 && params.ec > 0.0;
        if !params.permanent.is_present() || !resolvable {
            return 0.0;
        }
        let force = params.temporary.area * self.effective_before_removal.max(0.0);
        let e = params.permanent.eccentricity(section);
        let et = params.temporary.eccentricity(section);
        let fcgp = force / section.area + force * et * e / inertia;
        -params.permanent.material.ep / params.ec * fcgp
    }

    /// Record the removal in the permanent strand ledger
    pub fn record_removal(&self, params: &LossParameters, ledger: &mut StageLedger) {
        let effect = self.removal_effect(params);
        debug!(effect, effective = self.effective_before_removal, "temporary strand removal");
        ledger.push(
            LossStage::TemporaryStrandRemoval,
            Milestone::AfterTemporaryStrandRemoval,
            LossComponents::elastic(effect),
        );
    }
}
