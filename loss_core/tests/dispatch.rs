//! Model selection and pre-flight checks of the loss engine

use loss_core::bridge::{
    DeckSection, PointOfInterest, SectionKind, SectionProperties, SectionPropertyService,
    SegmentKey,
};
use loss_core::criteria::{
    FcgpPolicy, LossCriteria, LossMethod, SectionPropertyMode, SpecificationEdition,
};
use loss_core::errors::{ErrorCategory, LossResult};
use loss_core::loads::IntervalIndex;
use loss_core::losses::stages::LossStage;
use loss_core::losses::{
    EvaluationContext, GirderConfig, LossEngine, LossModel, Milestone, ModelKind, PrestressLosses,
};
use loss_core::materials::{Concrete, ConcreteType};
use loss_core::scenario::GirderScenario;
use loss_core::status::{StatusLog, StatusReporter};
use loss_core::LossContext;

fn criteria(method: LossMethod, edition: SpecificationEdition) -> LossCriteria {
    LossCriteria {
        loss_method: method,
        edition,
        ..LossCriteria::default()
    }
}

fn midspan(scenario: &GirderScenario) -> PointOfInterest {
    PointOfInterest::new(scenario.segment, scenario.span_length / 2.0)
}

/// Section service that must never be reached
struct UnreachableSections;

impl SectionPropertyService for UnreachableSections {
    fn section(
        &self,
        _interval: IntervalIndex,
        _poi: &PointOfInterest,
        _kind: SectionKind,
        _mode: SectionPropertyMode,
    ) -> LossResult<SectionProperties> {
        panic!("section properties requested");
    }

    fn volume_to_surface(&self, _segment: &SegmentKey) -> LossResult<f64> {
        panic!("volume to surface ratio requested");
    }

    fn deck_section(&self, _poi: &PointOfInterest) -> LossResult<DeckSection> {
        panic!("deck section requested");
    }
}

fn pci_uhpc_scenario() -> GirderScenario {
    let mut scenario = GirderScenario::template();
    scenario.release_concrete.concrete_type = ConcreteType::PciUhpc;
    scenario.girder_concrete.concrete_type = ConcreteType::PciUhpc;
    scenario
}

#[test]
fn test_method_and_edition_select_model() {
    let old = SpecificationEdition::SecondEditionWith2003Interims;
    let new = SpecificationEdition::NinthEdition2020;
    let cases = [
        (LossMethod::RefinedAashto, new, ModelKind::Refined2005),
        (LossMethod::RefinedWsdot, new, ModelKind::Refined2005),
        (LossMethod::RefinedAashto, old, ModelKind::RefinedPre2005),
        (LossMethod::RefinedWsdot, old, ModelKind::RefinedPre2005),
        (LossMethod::RefinedTxDot2004, new, ModelKind::RefinedPre2005),
        (LossMethod::RefinedTxDot2013, old, ModelKind::TxDot2013),
        (LossMethod::RefinedTxDot2013, new, ModelKind::TxDot2013),
        (LossMethod::ApproximateAashto, new, ModelKind::Approximate2005),
        (LossMethod::ApproximateWsdot, new, ModelKind::Approximate2005),
        (LossMethod::ApproximateAashto, old, ModelKind::ApproximatePre2005),
        (LossMethod::ApproximateWsdot, old, ModelKind::ApproximatePre2005),
        (LossMethod::GeneralLumpSum, new, ModelKind::GeneralLumpSum),
        (LossMethod::GeneralLumpSum, old, ModelKind::GeneralLumpSum),
    ];

    let scenario = GirderScenario::template();
    let poi = midspan(&scenario);
    for (method, edition, expected) in cases {
        let criteria = criteria(method, edition);
        let engine = LossEngine::new(scenario.context(&criteria));
        let details = engine
            .compute_losses(&poi, &EvaluationContext::analysis())
            .unwrap_or_else(|e| panic!("{method} ({edition}): {e}"));
        assert_eq!(details.model().kind(), expected, "{method} ({edition})");
        assert_eq!(details.method(), method);
        assert_eq!(details.poi(), &poi);
    }
}

#[test]
fn test_pci_uhpc_rejected_before_section_queries() {
    let scenario = pci_uhpc_scenario();
    let rejected = [
        (LossMethod::ApproximateAashto, SpecificationEdition::SecondEditionWith2003Interims),
        (LossMethod::ApproximateWsdot, SpecificationEdition::NinthEdition2020),
        (LossMethod::RefinedTxDot2013, SpecificationEdition::TenthEdition2024),
        (LossMethod::RefinedAashto, SpecificationEdition::EighthEdition2017),
    ];
    for (method, edition) in rejected {
        let criteria = criteria(method, edition);
        let ctx = LossContext {
            sections: &UnreachableSections,
            ..scenario.context(&criteria)
        };
        let engine = LossEngine::new(ctx);
        let err = engine
            .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
            .unwrap_err();
        assert_eq!(err.category, ErrorCategory::ConcreteTypeIncompatible, "{method} ({edition})");
        assert_eq!(err.reason_code(), "LOSS_CONCRETE_TYPE_INCOMPATIBLE");
        assert_eq!(err.error.error_code(), "INCOMPATIBLE_CONCRETE_TYPE");
        assert_eq!(err.segment, scenario.segment);
    }
}

#[test]
fn test_uhpc_passes_gate_with_supported_method() {
    let scenario = pci_uhpc_scenario();
    let criteria = criteria(LossMethod::RefinedAashto, SpecificationEdition::NinthEdition2020);
    let engine = LossEngine::new(scenario.context(&criteria));
    if let Err(e) = engine.compute_losses(&midspan(&scenario), &EvaluationContext::analysis()) {
        assert_ne!(e.category, ErrorCategory::ConcreteTypeIncompatible);
    }
}

#[test]
fn test_uhpc_gate_also_guards_segment_preparation() {
    let scenario = pci_uhpc_scenario();
    let criteria = LossCriteria {
        fcgp_policy: FcgpPolicy::AssumedStress,
        ..criteria(LossMethod::RefinedTxDot2013, SpecificationEdition::TenthEdition2024)
    };
    let ctx = LossContext {
        sections: &UnreachableSections,
        ..scenario.context(&criteria)
    };
    let mut engine = LossEngine::new(ctx);
    let err = engine.prepare_segment(&scenario.segment).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConcreteTypeIncompatible);
    assert!(engine.midspan_elastic_shortening(&scenario.segment).is_none());
}

#[test]
fn test_approximate_rejects_lightweight_deck() {
    let mut scenario = GirderScenario::template();
    if let Some(deck) = scenario.deck.as_mut() {
        deck.concrete.concrete_type = ConcreteType::SandLightweight;
    }
    let criteria = criteria(LossMethod::ApproximateAashto, SpecificationEdition::NinthEdition2020);
    let engine = LossEngine::new(scenario.context(&criteria));
    let err = engine
        .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
        .unwrap_err();
    assert_eq!(err.error.error_code(), "INCOMPATIBLE_CONCRETE_TYPE");
}

#[test]
fn test_approximate_rejects_strength_outside_calibration() {
    let mut scenario = GirderScenario::template();
    scenario.girder_concrete = Concrete::normal(16.0);
    let criteria = criteria(LossMethod::ApproximateAashto, SpecificationEdition::NinthEdition2020);
    let engine = LossEngine::new(scenario.context(&criteria));
    let err = engine
        .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::AssumptionViolated);
    assert_eq!(err.reason_code(), "LOSS_ASSUMPTION_VIOLATED");
}

#[test]
fn test_jacking_stress_out_of_range_abandons_point() {
    let mut scenario = GirderScenario::template();
    scenario.permanent.jacking_stress = 260.0;
    let criteria = LossCriteria::default();
    let engine = LossEngine::new(scenario.context(&criteria));
    let err = engine
        .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
        .unwrap_err();
    assert_eq!(err.error.error_code(), "JACKING_STRESS_OUT_OF_RANGE");
    assert_eq!(err.category, ErrorCategory::AssumptionViolated);
}

#[test]
fn test_general_lump_sum_reports_constants() {
    let scenario = GirderScenario::template();
    let criteria = criteria(LossMethod::GeneralLumpSum, SpecificationEdition::NinthEdition2020);
    let engine = LossEngine::new(scenario.context(&criteria));
    let details = engine
        .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
        .unwrap();

    let lump = criteria.lump_sum;
    assert!((details.jacking_stress() - 202.5).abs() < 1e-9);
    assert!((details.cumulative_loss(Milestone::AfterTransfer) - lump.after_transfer).abs() < 1e-9);
    assert!((details.cumulative_loss(Milestone::Final) - lump.final_loss).abs() < 1e-9);
    assert!((details.final_effective_prestress() - (202.5 - lump.final_loss)).abs() < 1e-9);
    assert!(details.stages().iter().all(|s| s.stage == LossStage::LumpSum));
}

#[test]
fn test_general_lump_sum_honors_jacking_override() {
    let scenario = GirderScenario::template();
    let criteria = criteria(LossMethod::GeneralLumpSum, SpecificationEdition::NinthEdition2020);
    let engine = LossEngine::new(scenario.context(&criteria));
    let eval = EvaluationContext::design(GirderConfig {
        permanent_jacking_stress: Some(190.0),
        ..GirderConfig::default()
    });
    let details = engine.compute_losses(&midspan(&scenario), &eval).unwrap();
    assert!((details.jacking_stress() - 190.0).abs() < 1e-9);
    let expected = 190.0 - criteria.lump_sum.final_loss;
    assert!((details.final_effective_prestress() - expected).abs() < 1e-9);
}

#[test]
fn test_invalid_criteria_fail_as_library_failure() {
    let scenario = GirderScenario::template();
    let criteria = LossCriteria {
        relative_humidity: 120.0,
        ..LossCriteria::default()
    };
    let engine = LossEngine::new(scenario.context(&criteria));
    let err = engine
        .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
        .unwrap_err();
    assert_eq!(err.error.error_code(), "INVALID_INPUT");
    assert_eq!(err.reason_code(), "LOSS_UNKNOWN_ERROR");
}

#[test]
fn test_invalid_criteria_never_reach_midspan_memo() {
    let scenario = GirderScenario::template();
    let criteria = LossCriteria {
        loss_method: LossMethod::RefinedTxDot2013,
        fcgp_policy: FcgpPolicy::AssumedStress,
        relative_humidity: 120.0,
        ..LossCriteria::default()
    };
    let ctx = LossContext {
        sections: &UnreachableSections,
        ..scenario.context(&criteria)
    };
    let mut engine = LossEngine::new(ctx);
    let err = engine.prepare_segment(&scenario.segment).unwrap_err();
    assert_eq!(err.error.error_code(), "INVALID_INPUT");
    assert!(engine.midspan_elastic_shortening(&scenario.segment).is_none());
}

#[test]
fn test_unknown_segment_is_reported() {
    let scenario = GirderScenario::template();
    let criteria = LossCriteria::default();
    let engine = LossEngine::new(scenario.context(&criteria));
    let status = StatusLog::new();
    let poi = PointOfInterest::new(SegmentKey::new(3, 1, 0), 100.0);

    let err = engine
        .compute_and_report(&poi, &EvaluationContext::analysis(), &status)
        .unwrap_err();
    assert_eq!(err.segment, SegmentKey::new(3, 1, 0));

    let items = status.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].reason_code, err.reason_code());
    assert_eq!(items[0].segment, SegmentKey::new(3, 1, 0));
}

#[test]
fn test_model_serializes_with_tag() {
    let scenario = GirderScenario::template();
    let criteria = criteria(LossMethod::GeneralLumpSum, SpecificationEdition::NinthEdition2020);
    let engine = LossEngine::new(scenario.context(&criteria));
    let details = engine
        .compute_losses(&midspan(&scenario), &EvaluationContext::analysis())
        .unwrap();

    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["model"]["model"], "GeneralLumpSum");
    assert!(matches!(details.model(), LossModel::GeneralLumpSum(_)));

    let back: loss_core::LossDetails = serde_json::from_value(json).unwrap();
    assert_eq!(back, details);
}

#[test]
fn test_clean_analysis_reports_nothing() {
    let status = StatusLog::new();
    let reporter: &dyn StatusReporter = &status;
    let scenario = GirderScenario::template();
    let criteria = LossCriteria::default();
    let engine = LossEngine::new(scenario.context(&criteria));
    engine
        .compute_and_report(&midspan(&scenario), &EvaluationContext::analysis(), reporter)
        .unwrap();
    assert!(status.is_empty());
}
