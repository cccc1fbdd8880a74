//! Property-based tests for the loss engine
//!
//! These hold for every girder the template can be bent into, not only
//! for the hand-checked cases in the other test files.

use proptest::prelude::*;

use loss_core::bridge::PointOfInterest;
use loss_core::criteria::{LossCriteria, LossMethod, LumpSumLosses, RelaxationMethod};
use loss_core::loads::ConstructionEvent;
use loss_core::losses::general_lump_sum::constant_at;
use loss_core::losses::{EvaluationContext, LossEngine, Milestone, PrestressLosses};
use loss_core::materials::Concrete;
use loss_core::scenario::GirderScenario;

fn lump_sum_strategy() -> impl Strategy<Value = LumpSumLosses> {
    proptest::collection::vec(0.0f64..60.0, 9).prop_map(|v| LumpSumLosses {
        before_transfer: v[0],
        after_transfer: v[1],
        at_shipping: v[2],
        before_temporary_strand_removal: v[3],
        after_temporary_strand_removal: v[4],
        before_deck_placement: v[5],
        after_deck_placement: v[6],
        after_superimposed_dead_loads: v[7],
        final_loss: v[8],
    })
}

fn time_step_method_strategy() -> impl Strategy<Value = LossMethod> {
    prop_oneof![
        Just(LossMethod::RefinedAashto),
        Just(LossMethod::RefinedWsdot),
        Just(LossMethod::ApproximateAashto),
        Just(LossMethod::ApproximateWsdot),
    ]
}

fn any_method_strategy() -> impl Strategy<Value = LossMethod> {
    prop_oneof![
        Just(LossMethod::RefinedAashto),
        Just(LossMethod::RefinedWsdot),
        Just(LossMethod::RefinedTxDot2004),
        Just(LossMethod::RefinedTxDot2013),
        Just(LossMethod::ApproximateAashto),
        Just(LossMethod::ApproximateWsdot),
        Just(LossMethod::GeneralLumpSum),
    ]
}

fn relaxation_strategy() -> impl Strategy<Value = RelaxationMethod> {
    prop_oneof![Just(RelaxationMethod::Refined), Just(RelaxationMethod::Simplified)]
}

fn midspan(scenario: &GirderScenario) -> PointOfInterest {
    PointOfInterest::new(scenario.segment, scenario.span_length / 2.0)
}

proptest! {
    /// Property: the general lump sum reports the owner's constants unchanged
    #[test]
    fn prop_general_lump_sum_identity(lump_sum in lump_sum_strategy()) {
        let scenario = GirderScenario::template();
        let criteria = LossCriteria {
            loss_method: LossMethod::GeneralLumpSum,
            lump_sum,
            ..LossCriteria::default()
        };
        let engine = LossEngine::new(scenario.context(&criteria));
        let details = engine
            .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
            .unwrap();

        let fpj = scenario.permanent.jacking_stress;
        let expected_final = fpj - lump_sum.final_loss;
        prop_assert!((details.final_effective_prestress() - expected_final).abs() < 1e-9);
        for milestone in Milestone::ALL {
            let expected = constant_at(&lump_sum, milestone);
            prop_assert!((details.cumulative_loss(milestone) - expected).abs() < 1e-9);
        }
    }

    /// Property: time-dependent losses never decrease as the girder ages
    #[test]
    fn prop_time_dependent_loss_is_monotonic(
        method in time_step_method_strategy(),
        relaxation in relaxation_strategy(),
        humidity in 40.0f64..=100.0,
        fci in 4.0f64..=7.0,
        hauling_age in 2.0f64..=85.0,
    ) {
        let mut scenario = GirderScenario::template();
        scenario.release_concrete = Concrete::normal(fci);
        let hauling = scenario
            .timeline
            .iter_mut()
            .filter(|e| e.event == ConstructionEvent::Hauling);
        for event in hauling {
            event.age = hauling_age;
        }
        let criteria = LossCriteria {
            loss_method: method,
            relaxation_method: relaxation,
            relative_humidity: humidity,
            ..LossCriteria::default()
        };
        let engine = LossEngine::new(scenario.context(&criteria));
        let details = engine
            .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
            .unwrap();

        let mut previous = 0.0;
        for milestone in Milestone::ALL {
            let current = details.time_dependent_loss(milestone);
            prop_assert!(
                current >= previous - 1e-9,
                "{} fell from {} to {} at {}",
                method,
                previous,
                current,
                milestone
            );
            previous = current;
        }
    }

    /// Property: cumulative loss before deck placement never exceeds the final cumulative loss
    #[test]
    fn prop_cumulative_loss_before_deck_within_final(
        method in any_method_strategy(),
        relaxation in relaxation_strategy(),
        humidity in 40.0f64..=100.0,
        hauling_age in 2.0f64..=85.0,
        x in 0.0f64..=1200.0,
    ) {
        let mut scenario = GirderScenario::template();
        let hauling = scenario
            .timeline
            .iter_mut()
            .filter(|e| e.event == ConstructionEvent::Hauling);
        for event in hauling {
            event.age = hauling_age;
        }
        let criteria = LossCriteria {
            loss_method: method,
            relaxation_method: relaxation,
            relative_humidity: humidity,
            ..LossCriteria::default()
        };
        let engine = LossEngine::new(scenario.context(&criteria));
        let poi = PointOfInterest::new(scenario.segment, x);
        let details = engine.compute_losses(&poi, &EvaluationContext::analysis()).unwrap();

        let before_deck = details.cumulative_loss(Milestone::BeforeDeckPlacement);
        let at_final = details.cumulative_loss(Milestone::Final);
        prop_assert!(
            before_deck <= at_final + 1e-9,
            "{}: {} before deck, {} at final",
            method,
            before_deck,
            at_final
        );
    }

    /// Property: every point along the girder yields finite results
    #[test]
    fn prop_losses_are_finite_along_girder(
        method in any_method_strategy(),
        x in 0.0f64..=1200.0,
    ) {
        let scenario = GirderScenario::template();
        let criteria = LossCriteria {
            loss_method: method,
            ..LossCriteria::default()
        };
        let engine = LossEngine::new(scenario.context(&criteria));
        let poi = PointOfInterest::new(scenario.segment, x);
        let details = engine.compute_losses(&poi, &EvaluationContext::analysis()).unwrap();

        for milestone in Milestone::ALL {
            prop_assert!(details.effective_prestress(milestone).is_finite());
        }
        prop_assert!(details.elastic_shortening().is_finite());
    }
}
