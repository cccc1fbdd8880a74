//! Refined estimate before the 2005 interims, and the TxDOT 2004 variant
//!
//! A single time window covers everything from transfer to final:
//!
//! ```text
//! ΔfpSR = 17.0 - 0.150H
//! ΔfpCR = 12.0 fcgp - 7.0 Δfcdp ≥ 0
//! ΔfpR2 = 20.0 - 0.4ΔfpES - 0.2(ΔfpSR + ΔfpCR)   (x 0.3 low relaxation)
//! ```
//!
//! The shipping loss rule decides how much of the total has occurred by
//! hauling; the remainder is reported from deck placement to final. There
//! is no deck shrinkage stage. The TxDOT 2004 variant neglects relaxation
//! before transfer.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::criteria::LossCriteria;
use crate::errors::LossResult;
use crate::lrfd::lump_sum::{pre2005_creep, pre2005_relaxation, pre2005_shrinkage};
use crate::lrfd::FcgpMethod;

use super::gains::record_elastic_gains;
use super::parameters::LossParameters;
use super::stages::{LossComponents, LossStage, Milestone, StageLedger};
use super::transfer::{TemporaryStrandLosses, TransferLosses};
use super::PrestressLosses;

/// Result of the pre-2005 refined estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedPre2005Losses {
    /// TxDOT 2004 variant
    pub txdot_2004: bool,
    pub transfer: TransferLosses,
    /// Change in concrete stress at the strands due to permanent loads after transfer (ksi)
    pub dfcdp: f64,
    /// Time-dependent loss from transfer to final
    pub time_dependent: LossComponents,
    /// Portion occurring by hauling
    pub before_deck: LossComponents,
    /// Portion occurring after deck placement
    pub after_deck: LossComponents,
    pub temporary: Option<TemporaryStrandLosses>,
    pub ledger: StageLedger,
}

impl PrestressLosses for RefinedPre2005Losses {
    fn ledger(&self) -> &StageLedger {
        &self.ledger
    }
}

/// Run the pre-2005 refined estimate at a point.
#[instrument(
    skip(params, criteria),
    fields(segment = %params.poi.segment, x = params.poi.distance_from_start)
)]
pub fn compute(
    params: &LossParameters,
    criteria: &LossCriteria,
    fcgp_method: FcgpMethod,
    txdot_2004: bool,
) -> LossResult<RefinedPre2005Losses> {
    params.check_jacking_stress()?;
    let initial_relaxation = !txdot_2004 && !criteria.ignore_initial_relaxation;
    let transfer = TransferLosses::compute(params, fcgp_method, None, initial_relaxation)?;

    let dfcdp: f64 = params.applied_moments().map(|m| m.concrete_stress()).sum();
    let mut time_dependent = LossComponents::default();
    if params.permanent.is_present() {
        time_dependent.shrinkage = pre2005_shrinkage(params.relative_humidity);
        time_dependent.creep = pre2005_creep(transfer.fcgp(), dfcdp);
        time_dependent.relaxation = pre2005_relaxation(
            &params.permanent.material,
            transfer.elastic.loss,
            time_dependent.shrinkage,
            time_dependent.creep,
        );
    }

    let total = time_dependent.total();
    let shipping = criteria.shipping_loss.portion_of(total);
    let before_deck = if total > 0.0 {
        time_dependent.scaled(shipping / total)
    } else {
        LossComponents::default()
    };
    let after_deck = time_dependent - before_deck;

    let temporary = TemporaryStrandLosses::compute(params, &transfer, before_deck);

    let mut ledger = StageLedger::new(params.permanent.fpj);
    transfer.record(&mut ledger);
    ledger.push(LossStage::TransferToDeck, Milestone::AtHauling, before_deck);
    if let Some(temp) = &temporary {
        temp.record_removal(params, &mut ledger);
    }
    record_elastic_gains(params, &mut ledger);
    ledger.push(LossStage::DeckToFinal, Milestone::Final, after_deck);

    debug!(
        shrinkage = time_dependent.shrinkage,
        creep = time_dependent.creep,
        relaxation = time_dependent.relaxation,
        shipping,
        "pre-2005 refined losses"
    );

    Ok(RefinedPre2005Losses {
        txdot_2004,
        transfer,
        dfcdp,
        time_dependent,
        before_deck,
        after_deck,
        temporary,
        ledger,
    })
}
