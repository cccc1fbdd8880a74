//! Elastic gains due to loads applied after transfer
//!
//! Each load group compresses the concrete at the strands less (or puts it
//! in tension), which stretches the bonded strands:
//!
//! ```text
//! Δfp = -(Ep/Ec) Σ factor · M · e / I
//! ```
//!
//! with e and I taken from the section that is current when the load is applied.

use tracing::debug;

use super::parameters::{LossParameters, WeightedMoment};
use super::stages::{GainSource, LossComponents, LossStage, Milestone, StageLedger};

/// Elastic gain of a group of moments (ksi, negative for a gain)
pub fn elastic_gain(ep: f64, ec: f64, moments: &[WeightedMoment]) -> f64 {
    if ec <= 0.0 {
        return 0.0;
    }
    let stress: f64 = moments.iter().map(WeightedMoment::effective_stress).sum();
    -ep / ec * stress
}

/// Record the elastic gain stages for every load group that acts at the point
pub fn record_elastic_gains(params: &LossParameters, ledger: &mut StageLedger) {
    let ep = params.permanent.material.ep;
    let groups = [
        (GainSource::DeckPlacement, Milestone::AfterDeckPlacement, &params.deck_moments),
        (GainSource::LongitudinalJoints, Milestone::AfterDeckPlacement, &params.joint_moments),
        (
            GainSource::SuperimposedDeadLoad,
            Milestone::AfterSuperimposedDeadLoads,
            &params.superimposed_moments,
        ),
        (GainSource::LiveLoad, Milestone::FinalWithLiveLoad, &params.live_load_moments),
    ];
    for (source, milestone, moments) in groups {
        if moments.is_empty() {
            continue;
        }
        let gain = if params.permanent.is_present() {
            elastic_gain(ep, params.ec, moments)
        } else {
            0.0
        };
        debug!(?source, gain, "elastic gain");
        ledger.push(LossStage::ElasticGain(source), milestone, LossComponents::elastic(gain));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::ProductLoad;

    #[test]
    fn test_elastic_gain_is_negative_for_sagging_moment() {
        let moments = [
            WeightedMoment {
                load: ProductLoad::Slab,
                moment: 20_000.0,
                factor: 1.0,
                eccentricity: 20.0,
                inertia: 500_000.0,
            },
            WeightedMoment {
                load: ProductLoad::Haunch,
                moment: 2_000.0,
                factor: 0.0,
                eccentricity: 20.0,
                inertia: 500_000.0,
            },
        ];
        // -(28500/5000) * 20000*20/500000 = -4.56
        let gain = elastic_gain(28_500.0, 5_000.0, &moments);
        assert!((gain + 4.56).abs() < 1e-9);
    }

    #[test]
    fn test_no_moments_no_gain() {
        assert_eq!(elastic_gain(28_500.0, 5_000.0, &[]), 0.0);
    }
}
