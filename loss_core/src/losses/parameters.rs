//! Parameter extraction
//!
//! [`LossParameters::extract`] queries every collaborator once for a point
//! of interest and resolves the answers into a flat bundle that any loss
//! model can consume. Applied moments are stored together with the section
//! they act on and their elastic gain effectiveness factor, so the models
//! never go back to the services.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::bridge::{
    DeckKind, FrictionParameters, LossContext, MildSteel, PointOfInterest, SectionKind,
    SectionProperties, StrandState, TemporaryStrandUsage,
};
use crate::errors::{LossError, LossResult};
use crate::loads::{ConstructionEvent, IntervalIndex, ProductLoad, ResultKind};
use crate::lrfd;
use crate::materials::{Concrete, StrandMaterial, StrandType};

/// Girder properties of a design candidate that differ from the bridge model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GirderConfig {
    /// Permanent strand area (in²)
    pub permanent_strand_area: Option<f64>,
    /// Permanent strand jacking stress (ksi)
    pub permanent_jacking_stress: Option<f64>,
    /// Temporary strand area (in²)
    pub temporary_strand_area: Option<f64>,
    /// Temporary strand jacking stress (ksi)
    pub temporary_jacking_stress: Option<f64>,
    /// Concrete strength at release (ksi)
    pub fci: Option<f64>,
    /// 28-day concrete strength (ksi)
    pub fc: Option<f64>,
    /// Slab offset at the segment (in)
    pub slab_offset: Option<f64>,
}

/// How a loss computation is being requested
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EvaluationContext {
    /// The girder is a design candidate not yet committed to the bridge model
    pub design_candidate: bool,
    /// Girder properties that replace the bridge model's
    pub override_config: Option<GirderConfig>,
}

impl EvaluationContext {
    /// Analysis of the bridge as modeled
    pub fn analysis() -> Self {
        EvaluationContext::default()
    }

    /// Evaluation of a design candidate
    pub fn design(config: GirderConfig) -> Self {
        EvaluationContext {
            design_candidate: true,
            override_config: Some(config),
        }
    }
}

/// An applied moment with the section it acts on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedMoment {
    pub load: ProductLoad,
    /// Moment (kip-in)
    pub moment: f64,
    /// Elastic gain effectiveness factor
    pub factor: f64,
    /// Permanent strand eccentricity on the acting section (in)
    pub eccentricity: f64,
    /// Moment of inertia of the acting section (in⁴)
    pub inertia: f64,
}

impl WeightedMoment {
    /// Change in concrete stress at the strands, tension positive (ksi)
    pub fn concrete_stress(&self) -> f64 {
        if self.inertia <= 0.0 {
            return 0.0;
        }
        self.moment * self.eccentricity / self.inertia
    }

    /// Stress change counted toward elastic gain (ksi)
    pub fn effective_stress(&self) -> f64 {
        self.factor * self.concrete_stress()
    }
}

/// One strand group at the point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrandParameters {
    /// Area (in²)
    pub area: f64,
    /// Jacking stress (ksi)
    pub fpj: f64,
    /// Height of the strand centroid (in)
    pub centroid_from_bottom: f64,
    pub transfer_factor: f64,
    pub material: StrandMaterial,
}

impl StrandParameters {
    fn from_state(state: StrandState, material: StrandMaterial) -> Self {
        StrandParameters {
            area: state.area,
            fpj: state.jacking_stress,
            centroid_from_bottom: state.centroid_from_bottom,
            transfer_factor: state.transfer_factor,
            material,
        }
    }

    pub fn is_present(&self) -> bool {
        self.area > 0.0
    }

    /// Eccentricity on a section (in)
    pub fn eccentricity(&self, section: &SectionProperties) -> f64 {
        section.eccentricity_of(self.centroid_from_bottom)
    }
}

/// Cast-in-place deck; all zeros when there is no structural deck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DeckParameters {
    pub structural: bool,
    /// Deck concrete, `None` without a structural deck
    pub concrete: Option<Concrete>,
    /// Deck concrete strength (ksi)
    pub fc: f64,
    /// Deck modulus (ksi)
    pub ec: f64,
    /// Deck area (in²)
    pub area: f64,
    /// Height of the deck centroid above the composite centroid (in)
    pub eccentricity: f64,
    /// Volume to surface ratio of the deck (in)
    pub volume_to_surface: f64,
}

/// Concrete ages at the staging milestones (days)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneAges {
    /// Time from jacking to transfer
    pub jacking_to_transfer: f64,
    /// Age at transfer
    pub transfer: f64,
    /// Maturity at transfer used as the creep loading age
    pub loading_age: f64,
    /// Age of the deck concrete when its shrinkage starts loading the composite section
    pub deck_loading_age: f64,
    pub hauling: Option<f64>,
    pub temporary_strand_removal: Option<f64>,
    pub deck_placement: f64,
    pub final_age: f64,
}

impl MilestoneAges {
    /// Days elapsed between transfer and an age
    pub fn since_transfer(&self, age: f64) -> f64 {
        (age - self.transfer).max(0.0)
    }

    /// Time from jacking to an age, used by the detailed relaxation equation
    pub fn since_jacking(&self, age: f64) -> f64 {
        self.jacking_to_transfer + self.since_transfer(age)
    }
}

/// Every input a loss model needs at one point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossParameters {
    pub poi: PointOfInterest,
    /// Segment length (in)
    pub segment_length: f64,
    /// Girder concrete at final
    pub girder_concrete: Concrete,
    /// Girder strength and modulus at release (ksi)
    pub fci: f64,
    pub eci: f64,
    /// Girder strength and modulus after release (ksi)
    pub fc: f64,
    pub ec: f64,
    pub deck: DeckParameters,
    /// Girder section at release
    pub release_section: SectionProperties,
    /// Girder section at deck placement
    pub girder_section: SectionProperties,
    /// Girder plus structural longitudinal joints, when joints are structural
    pub joint_section: Option<SectionProperties>,
    /// Section resisting superimposed loads; the girder section when there is no deck
    pub composite_section: SectionProperties,
    /// Girder volume to surface ratio (in)
    pub volume_to_surface: f64,
    pub relative_humidity: f64,
    pub permanent: StrandParameters,
    pub temporary: StrandParameters,
    pub temporary_usage: TemporaryStrandUsage,
    pub has_debonding: bool,
    pub is_prismatic: bool,
    pub friction: FrictionParameters,
    pub mild_steel: MildSteel,
    /// Girder self-weight moment at release (kip-in)
    pub girder_moment: f64,
    /// Deck placement loads on the girder section
    pub deck_moments: Vec<WeightedMoment>,
    /// Deck placement loads on the joint-composite section
    pub joint_moments: Vec<WeightedMoment>,
    /// Superimposed dead loads on the composite section
    pub superimposed_moments: Vec<WeightedMoment>,
    pub live_load_moments: Vec<WeightedMoment>,
    pub ages: MilestoneAges,
    pub design_candidate: bool,
}

impl LossParameters {
    /// Gather the inputs at a point of interest.
    ///
    /// Collaborator failures propagate untouched.
    #[instrument(skip(ctx), fields(segment = %poi.segment, x = poi.distance_from_start))]
    pub fn extract(
        ctx: &LossContext<'_>,
        poi: &PointOfInterest,
        eval: &EvaluationContext,
    ) -> LossResult<Self> {
        let criteria = ctx.criteria;
        let segment = poi.segment;
        let config = eval.override_config.unwrap_or_default();

        let release = required_interval(ctx, ConstructionEvent::Release)?;
        let deck_interval = deck_interval(ctx)?;
        let final_interval = ctx
            .timeline
            .interval(ConstructionEvent::OpenToTraffic)
            .unwrap_or(deck_interval);
        let mode = criteria.section_properties;

        // Materials
        let release_concrete = ctx.materials.segment_concrete(&segment, release)?;
        let deck_time_concrete = ctx.materials.segment_concrete(&segment, deck_interval)?;
        let mut girder_concrete = ctx.materials.segment_concrete(&segment, final_interval)?;
        let (fci, eci) = match config.fci {
            Some(fci) => (fci, lrfd::modulus_of_elasticity(fci, release_concrete.unit_weight)),
            None => (release_concrete.fc, release_concrete.ec),
        };
        let ec = match config.fc {
            Some(fc) => {
                girder_concrete.fc = fc;
                girder_concrete.ec = lrfd::modulus_of_elasticity(fc, girder_concrete.unit_weight);
                girder_concrete.ec
            }
            None => deck_time_concrete.ec,
        };

        // Strands
        let mut permanent = StrandParameters::from_state(
            ctx.strands.strand(poi, release, StrandType::Permanent)?,
            ctx.materials.strand(&segment, StrandType::Permanent)?,
        );
        let mut temporary = StrandParameters::from_state(
            ctx.strands.strand(poi, release, StrandType::Temporary)?,
            ctx.materials.strand(&segment, StrandType::Temporary)?,
        );
        if let Some(area) = config.permanent_strand_area {
            permanent.area = area;
        }
        if let Some(fpj) = config.permanent_jacking_stress {
            permanent.fpj = fpj;
        }
        if let Some(area) = config.temporary_strand_area {
            temporary.area = area;
        }
        if let Some(fpj) = config.temporary_jacking_stress {
            temporary.fpj = fpj;
        }

        // Sections
        let release_section = ctx.sections.section(release, poi, SectionKind::Girder, mode)?;
        let girder_section = ctx.sections.section(deck_interval, poi, SectionKind::Girder, mode)?;
        let joints = ctx.bridge.has_structural_longitudinal_joints();
        let joint_section = if joints {
            Some(ctx.sections.section(deck_interval, poi, SectionKind::JointComposite, mode)?)
        } else {
            None
        };
        let deck_concrete = match ctx.bridge.deck_kind() {
            DeckKind::Structural => ctx.materials.deck_concrete(deck_interval)?,
            DeckKind::Nonstructural => None,
        };
        let superimposed_kind = superimposed_section_kind(deck_concrete.is_some(), joints);
        let composite_interval = ctx
            .timeline
            .interval(ConstructionEvent::RailingInstallation)
            .unwrap_or(deck_interval);
        let composite_section = match superimposed_kind {
            SectionKind::Girder => girder_section,
            SectionKind::JointComposite => joint_section.unwrap_or(girder_section),
            SectionKind::Composite => {
                ctx.sections
                    .section(composite_interval, poi, SectionKind::Composite, mode)?
            }
        };

        let deck = match deck_concrete {
            Some(concrete) => {
                let slab = ctx.sections.deck_section(poi)?;
                DeckParameters {
                    structural: true,
                    concrete: Some(concrete),
                    fc: concrete.fc,
                    ec: concrete.ec,
                    area: slab.area,
                    eccentricity: slab.centroid_from_bottom
                        - composite_section.centroid_from_bottom,
                    volume_to_surface: slab.volume_to_surface,
                }
            }
            None => DeckParameters::default(),
        };

        // Moments
        let analysis = ctx.bridge.analysis_type();
        let girder_moment = ctx
            .forces
            .moment(release, ProductLoad::GirderSelfWeight, poi, analysis, ResultKind::Cumulative)?;

        let mut deck_moments = Vec::new();
        let mut joint_moments = Vec::new();
        let mut superimposed_moments = Vec::new();
        let mut live_load_moments = Vec::new();
        for load in ProductLoad::ALL {
            if load == ProductLoad::GirderSelfWeight {
                continue;
            }
            let Some(interval) = ctx.timeline.interval(load.applied_at()) else {
                continue;
            };
            let mut moment =
                ctx.forces
                    .moment(interval, load, poi, analysis, ResultKind::Incremental)?;
            if load == ProductLoad::Slab && eval.design_candidate {
                if let Some(candidate) = config.slab_offset {
                    let as_built = ctx.bridge.slab_offset(&segment);
                    let per_depth = ctx.forces.haunch_moment_per_unit_depth(poi)?;
                    moment += (candidate - as_built) * per_depth;
                }
            }

            let kind = if load == ProductLoad::LiveLoad || load.is_superimposed() {
                superimposed_kind
            } else if joints && load != ProductLoad::LongitudinalJoint {
                SectionKind::JointComposite
            } else {
                SectionKind::Girder
            };
            let section = ctx.sections.section(interval, poi, kind, mode)?;
            let weighted = WeightedMoment {
                load,
                moment,
                factor: criteria.gain_factor(load),
                eccentricity: permanent.eccentricity(&section),
                inertia: section.bending_inertia(),
            };

            if load == ProductLoad::LiveLoad {
                live_load_moments.push(weighted);
            } else if load.is_superimposed() {
                superimposed_moments.push(weighted);
            } else if kind == SectionKind::JointComposite {
                joint_moments.push(weighted);
            } else {
                deck_moments.push(weighted);
            }
        }

        let ages = milestone_ages(ctx)?;
        let params = LossParameters {
            poi: *poi,
            segment_length: ctx.bridge.segment_length(&segment)?,
            girder_concrete,
            fci,
            eci,
            fc: girder_concrete.fc,
            ec,
            deck,
            release_section,
            girder_section,
            joint_section,
            composite_section,
            volume_to_surface: ctx.sections.volume_to_surface(&segment)?,
            relative_humidity: criteria.relative_humidity,
            permanent,
            temporary,
            temporary_usage: ctx.strands.temporary_strand_usage(&segment),
            has_debonding: ctx.strands.has_debonding(&segment),
            is_prismatic: ctx.bridge.is_prismatic(&segment),
            friction: ctx.strands.friction(&segment),
            mild_steel: ctx.strands.mild_steel(poi)?,
            girder_moment,
            deck_moments,
            joint_moments,
            superimposed_moments,
            live_load_moments,
            ages,
            design_candidate: eval.design_candidate,
        };
        debug!(
            aps = params.permanent.area,
            fpj = params.permanent.fpj,
            fci = params.fci,
            structural_deck = params.deck.structural,
            "extracted loss parameters"
        );
        Ok(params)
    }

    /// Permanent strand eccentricity on the release section (in)
    pub fn release_eccentricity(&self) -> f64 {
        self.permanent.eccentricity(&self.release_section)
    }

    /// Permanent strand eccentricity on the composite section (in)
    pub fn composite_eccentricity(&self) -> f64 {
        self.permanent.eccentricity(&self.composite_section)
    }

    /// Whether temporary strands are present at the point
    pub fn has_temporary_strands(&self) -> bool {
        self.temporary.is_present()
    }

    /// Pretensioned temporary strands act at transfer along with the permanent strands
    pub fn has_pretensioned_temporary_strands(&self) -> bool {
        self.has_temporary_strands() && !self.temporary_usage.is_post_tensioned()
    }

    /// Verify the jacking stress of every strand group present
    pub fn check_jacking_stress(&self) -> LossResult<()> {
        lrfd::check_jacking_stress(
            "permanent",
            self.permanent.area,
            self.permanent.fpj,
            self.permanent.material.fpu,
        )?;
        lrfd::check_jacking_stress(
            "temporary",
            self.temporary.area,
            self.temporary.fpj,
            self.temporary.material.fpu,
        )
    }

    /// All applied moments after transfer
    pub fn applied_moments(&self) -> impl Iterator<Item = &WeightedMoment> {
        self.deck_moments
            .iter()
            .chain(self.joint_moments.iter())
            .chain(self.superimposed_moments.iter())
    }
}

fn superimposed_section_kind(has_deck: bool, joints: bool) -> SectionKind {
    match (has_deck, joints) {
        (true, _) => SectionKind::Composite,
        (false, true) => SectionKind::JointComposite,
        (false, false) => SectionKind::Girder,
    }
}

pub(crate) fn required_interval(
    ctx: &LossContext<'_>,
    event: ConstructionEvent,
) -> LossResult<IntervalIndex> {
    ctx.timeline.interval(event).ok_or_else(|| {
        LossError::library_failure(format!("the timeline has no interval for {event:?}"))
    })
}

/// Interval where deck loads are applied; the railing interval when there is no deck casting
fn deck_interval(ctx: &LossContext<'_>) -> LossResult<IntervalIndex> {
    match ctx.timeline.interval(ConstructionEvent::DeckCasting) {
        Some(interval) => Ok(interval),
        None => required_interval(ctx, ConstructionEvent::RailingInstallation),
    }
}

fn milestone_ages(ctx: &LossContext<'_>) -> LossResult<MilestoneAges> {
    let creep = &ctx.criteria.creep;
    let jacking_to_transfer = creep.transfer_time_hours / 24.0;
    let transfer = ctx.timeline.age(ConstructionEvent::Release).unwrap_or(jacking_to_transfer);
    let deck_placement = ctx
        .timeline
        .age(ConstructionEvent::DeckCasting)
        .or_else(|| ctx.timeline.age(ConstructionEvent::RailingInstallation))
        .ok_or_else(|| LossError::library_failure("the timeline has no age at deck placement"))?;
    let final_age = creep.total_creep_duration_days;

    if deck_placement <= transfer {
        return Err(LossError::invalid_input(
            "deck_placement_age",
            deck_placement.to_string(),
            "Deck placement must occur after transfer",
        ));
    }
    if final_age <= deck_placement {
        return Err(LossError::invalid_input(
            "creep.total_creep_duration_days",
            final_age.to_string(),
            "Final age must be later than deck placement",
        ));
    }
    let hauling = ctx.timeline.age(ConstructionEvent::Hauling);
    if let Some(age) = hauling {
        if age <= transfer || age > deck_placement {
            return Err(LossError::invalid_input(
                "hauling_age",
                age.to_string(),
                "Hauling must occur between transfer and deck placement",
            ));
        }
    }

    Ok(MilestoneAges {
        jacking_to_transfer,
        transfer,
        loading_age: creep.age_at_transfer(),
        deck_loading_age: creep.deck_curing_days,
        hauling,
        temporary_strand_removal: ctx.timeline.age(ConstructionEvent::TemporaryStrandRemoval),
        deck_placement,
        final_age,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_moment_stress() {
        let m = WeightedMoment {
            load: ProductLoad::Slab,
            moment: 10_000.0,
            factor: 0.5,
            eccentricity: 20.0,
            inertia: 400_000.0,
        };
        assert!((m.concrete_stress() - 0.5).abs() < 1e-12);
        assert!((m.effective_stress() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_superimposed_section_routing() {
        assert_eq!(superimposed_section_kind(true, true), SectionKind::Composite);
        assert_eq!(superimposed_section_kind(false, true), SectionKind::JointComposite);
        assert_eq!(superimposed_section_kind(false, false), SectionKind::Girder);
    }

    #[test]
    fn test_ages_since_transfer() {
        let ages = MilestoneAges {
            jacking_to_transfer: 1.0,
            transfer: 1.0,
            loading_age: 7.0,
            deck_loading_age: 7.0,
            hauling: Some(10.0),
            temporary_strand_removal: None,
            deck_placement: 90.0,
            final_age: 2000.0,
        };
        assert_eq!(ages.since_transfer(90.0), 89.0);
        assert_eq!(ages.since_transfer(0.5), 0.0);
        assert_eq!(ages.since_jacking(90.0), 90.0);
    }
}
