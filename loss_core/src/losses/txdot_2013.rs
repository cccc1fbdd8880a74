//! TxDOT refined estimate (2013 research)
//!
//! Follows the 2005+ stage sequence with two changes: relaxation after
//! transfer always uses the detailed equation, and when Fcgp is resolved
//! with the assumed stress method the elastic shortening computed at
//! midspan governs every point on the segment.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::criteria::{LossCriteria, RelaxationMethod};
use crate::errors::LossResult;
use crate::lrfd::{ElasticShortening, FcgpMethod};

use super::parameters::LossParameters;
use super::refined_2005::{self, Refined2005Losses, RefinedOptions};
use super::stages::StageLedger;
use super::transfer::TransferLosses;
use super::PrestressLosses;

/// Elastic shortening of a segment evaluated at its midspan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MidspanElasticShortening {
    pub fcgp_method: FcgpMethod,
    pub elastic: ElasticShortening,
}

impl MidspanElasticShortening {
    /// Evaluate elastic shortening with parameters extracted at midspan
    pub fn compute(
        midspan: &LossParameters,
        criteria: &LossCriteria,
        method: FcgpMethod,
    ) -> LossResult<Self> {
        let initial_relaxation = !criteria.ignore_initial_relaxation;
        let transfer = TransferLosses::compute(midspan, method, None, initial_relaxation)?;
        Ok(MidspanElasticShortening {
            fcgp_method: method,
            elastic: transfer.elastic,
        })
    }
}

/// Result of the TxDOT 2013 refined estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxDot2013Losses {
    /// Whether the midspan elastic shortening was used at this point
    pub midspan_elastic_shortening: bool,
    pub losses: Refined2005Losses,
}

impl PrestressLosses for TxDot2013Losses {
    fn ledger(&self) -> &StageLedger {
        &self.losses.ledger
    }
}

/// Run the TxDOT 2013 estimate.
///
/// `midspan` must be supplied when `fcgp_method` is the assumed stress method.
#[instrument(
    skip(params, criteria, midspan),
    fields(segment = %params.poi.segment, x = params.poi.distance_from_start)
)]
pub fn compute(
    params: &LossParameters,
    criteria: &LossCriteria,
    fcgp_method: FcgpMethod,
    midspan: Option<&MidspanElasticShortening>,
) -> LossResult<TxDot2013Losses> {
    let elastic_override = match (fcgp_method, midspan) {
        (FcgpMethod::AssumedStress, Some(midspan)) => Some(midspan.elastic),
        _ => None,
    };
    let losses = refined_2005::compute(
        params,
        criteria,
        RefinedOptions {
            relaxation: RelaxationMethod::Detailed,
            fcgp_method,
            elastic_override,
        },
    )?;
    Ok(TxDot2013Losses {
        midspan_elastic_shortening: elastic_override.is_some(),
        losses,
    })
}
