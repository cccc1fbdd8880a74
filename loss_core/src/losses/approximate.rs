//! Approximate lump sum estimates
//!
//! Relaxation before transfer, elastic shortening and post-tensioning of
//! temporary strands are computed as in the refined methods; everything
//! after that collapses into one time-dependent lump sum. The shipping loss
//! rule splits the lump sum into the portion reported at hauling and the
//! portion reported at final.
//!
//! Both estimates are calibrated for normal weight concrete only.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::criteria::{LossCriteria, LossMethod};
use crate::errors::{LossError, LossResult};
use crate::lrfd::lump_sum::{
    approximate_2005, approximate_pre2005, Approximate2005, APPROXIMATE_FC_RANGE,
};
use crate::lrfd::{check_concrete_strength, lrfd_ref, FcgpMethod};
use crate::materials::{ConcreteType, StrandRelaxation};

use super::parameters::LossParameters;
use super::stages::{LossComponents, LossStage, Milestone, StageLedger};
use super::transfer::TransferLosses;
use super::PrestressLosses;

/// Result of an approximate estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximateLosses {
    pub transfer: TransferLosses,
    /// Partial prestressing ratio
    pub ppr: f64,
    /// Terms of the 2005+ estimate
    pub terms: Option<Approximate2005>,
    /// Total time-dependent loss (ksi)
    pub time_dependent: f64,
    /// Portion reported at hauling (ksi)
    pub at_shipping: f64,
    pub ledger: StageLedger,
}

impl PrestressLosses for ApproximateLosses {
    fn ledger(&self) -> &StageLedger {
        &self.ledger
    }
}

/// Partial prestressing ratio Aps fpy / (Aps fpy + As fy)
pub fn partial_prestressing_ratio(params: &LossParameters) -> f64 {
    let prestress = params.permanent.area * params.permanent.material.fpy;
    let mild = params.mild_steel.area * params.mild_steel.fy;
    if prestress + mild <= 0.0 {
        return 1.0;
    }
    prestress / (prestress + mild)
}

fn check_normal_weight(params: &LossParameters, criteria: &LossCriteria) -> LossResult<()> {
    let deck_type = params.deck.concrete.map(|c| c.concrete_type);
    let elements = [
        ("girder", Some(params.girder_concrete.concrete_type)),
        ("deck", deck_type),
    ];
    for (element, concrete_type) in elements {
        if let Some(concrete_type) = concrete_type {
            if concrete_type != ConcreteType::Normal {
                return Err(LossError::IncompatibleConcreteType {
                    concrete: concrete_type.display_name().to_string(),
                    method: criteria.loss_method.display_name().to_string(),
                    edition: criteria.edition.display_name().to_string(),
                    reason: format!(
                        "the approximate estimate applies only to normal weight concrete, \
                         but the {element} is not (LRFD {})",
                        lrfd_ref::APPROXIMATE
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Run an approximate estimate at a point.
///
/// # Arguments
/// * `edition_2005` - Use the 2005+ estimate rather than the pre-2005 one
#[instrument(
    skip(params, criteria),
    fields(segment = %params.poi.segment, x = params.poi.distance_from_start)
)]
pub fn compute(
    params: &LossParameters,
    criteria: &LossCriteria,
    fcgp_method: FcgpMethod,
    edition_2005: bool,
) -> LossResult<ApproximateLosses> {
    check_normal_weight(params, criteria)?;
    check_concrete_strength("Girder", params.fc, APPROXIMATE_FC_RANGE, lrfd_ref::APPROXIMATE)?;
    params.check_jacking_stress()?;

    let transfer =
        TransferLosses::compute(params, fcgp_method, None, !criteria.ignore_initial_relaxation)?;

    let strand = &params.permanent;
    let ppr = match criteria.loss_method {
        LossMethod::ApproximateWsdot if !edition_2005 => 1.0,
        _ => partial_prestressing_ratio(params),
    };
    let (time_dependent, terms) = if !strand.is_present() {
        (0.0, None)
    } else if edition_2005 {
        let terms = approximate_2005(
            strand.fpj - transfer.relaxation,
            strand.area,
            params.release_section.area,
            params.fci,
            params.relative_humidity,
            &strand.material,
        );
        (terms.total(), Some(terms))
    } else {
        (approximate_pre2005(params.fc, ppr, &strand.material), None)
    };
    let at_shipping = criteria.shipping_loss.portion_of(time_dependent);

    let mut ledger = StageLedger::new(strand.fpj);
    transfer.record(&mut ledger);
    ledger.push(LossStage::LumpSum, Milestone::AtHauling, LossComponents::lump_sum(at_shipping));
    ledger.push(
        LossStage::LumpSum,
        Milestone::Final,
        LossComponents::lump_sum(time_dependent - at_shipping),
    );

    debug!(
        time_dependent,
        at_shipping,
        ppr,
        stress_relieved = strand.material.relaxation == StrandRelaxation::StressRelieved,
        "approximate losses"
    );

    Ok(ApproximateLosses {
        transfer,
        ppr,
        terms,
        time_dependent,
        at_shipping,
        ledger,
    })
}
