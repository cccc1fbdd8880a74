//! # Girder Scenarios
//!
//! A self-contained, JSON-described bridge for running the loss engine
//! without a full bridge model: one simply supported prismatic girder with
//! an optional composite deck. Product moments come from the uniform and
//! moving point load formulas in [`crate::equations::beam`].
//!
//! [`GirderScenario`] implements every collaborator trait, so a
//! [`LossContext`] is one call away:
//!
//! ```rust
//! use loss_core::criteria::LossCriteria;
//! use loss_core::scenario::GirderScenario;
//!
//! let scenario = GirderScenario::template();
//! let criteria = LossCriteria::default();
//! let ctx = scenario.context(&criteria);
//! assert_eq!(ctx.bridge.segment_length(&scenario.segment).unwrap(), 1200.0);
//! ```
//!
//! Section properties are the same for gross and transformed modes.

use serde::{Deserialize, Serialize};

use crate::bridge::{
    BridgeModel, DeckKind, DeckSection, FrictionParameters, LossContext, MaterialService,
    MildSteel, PointOfInterest, ProductForceService, SectionKind, SectionProperties,
    SectionPropertyService, SegmentKey, StrandGeometryService, StrandState, TemporaryStrandUsage,
    Timeline,
};
use crate::criteria::{CuringMethod, LossCriteria, SectionPropertyMode};
use crate::equations::beam::{moving_point_load_moment, uniform_load_moment};
use crate::errors::{LossError, LossResult};
use crate::loads::{AnalysisType, ConstructionEvent, IntervalIndex, ProductLoad, ResultKind};
use crate::materials::{Concrete, StrandGrade, StrandMaterial, StrandType};

/// Cubic inches per cubic foot, to turn kcf into kip/in³
const IN3_PER_FT3: f64 = 1728.0;

/// A strand group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrandGroup {
    pub material: StrandMaterial,
    /// Area of strand (in²)
    pub area: f64,
    /// Jacking stress (ksi)
    pub jacking_stress: f64,
    /// Height of the centroid above the bottom of the girder (in)
    pub centroid_from_bottom: f64,
    /// Transfer length (in)
    pub transfer_length: f64,
}

impl StrandGroup {
    /// Fraction of the strand force developed at a distance from the end
    fn transfer_factor(&self, distance_from_end: f64) -> f64 {
        if self.transfer_length <= 0.0 {
            return 1.0;
        }
        (distance_from_end / self.transfer_length).clamp(0.0, 1.0)
    }
}

/// Cast-in-place deck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckInput {
    pub concrete: Concrete,
    pub section: DeckSection,
    /// Girder plus deck
    pub composite: SectionProperties,
    /// Haunch width used to turn slab offset into load (in)
    pub haunch_width: f64,
}

/// Uniform product load over the full span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformLoad {
    pub load: ProductLoad,
    /// Intensity (kip/in)
    pub w: f64,
}

/// Live load per girder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveLoad {
    /// Lane load (kip/in)
    pub lane: f64,
    /// Truck idealized as a single moving axle (kip)
    pub truck: f64,
}

/// A construction event placed in the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event: ConstructionEvent,
    pub interval: IntervalIndex,
    /// Girder concrete age (days)
    pub age: f64,
}

/// A simply supported precast girder and its construction sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GirderScenario {
    pub name: String,
    pub segment: SegmentKey,
    /// Span length (in)
    pub span_length: f64,
    /// Girder section
    pub girder: SectionProperties,
    /// Girder plus structural longitudinal joints; `None` when joints are not structural
    pub joint_section: Option<SectionProperties>,
    /// Girder volume to surface ratio (in)
    pub volume_to_surface: f64,
    /// Girder concrete at release
    pub release_concrete: Concrete,
    /// Girder concrete after release
    pub girder_concrete: Concrete,
    pub deck: Option<DeckInput>,
    pub permanent: StrandGroup,
    pub temporary: Option<StrandGroup>,
    pub temporary_usage: TemporaryStrandUsage,
    pub has_debonding: bool,
    pub prismatic: bool,
    pub friction: FrictionParameters,
    pub mild_steel: MildSteel,
    /// As-built slab offset (in)
    pub slab_offset: f64,
    /// Loads other than girder self weight
    pub loads: Vec<UniformLoad>,
    pub live_load: Option<LiveLoad>,
    pub analysis_type: AnalysisType,
    pub timeline: Vec<TimelineEvent>,
}

impl GirderScenario {
    /// A 100 ft AASHTO Type IV girder with an 8 in composite deck
    pub fn template() -> Self {
        let release_concrete = Concrete::normal(5.5);
        let girder_concrete = Concrete::normal(7.0);
        let deck_concrete = Concrete {
            curing: CuringMethod::Normal,
            ..Concrete::normal(4.0)
        };
        let event = |event, interval, age| TimelineEvent { event, interval, age };

        GirderScenario {
            name: "AASHTO Type IV, 100 ft simple span".to_string(),
            segment: SegmentKey::new(0, 0, 0),
            span_length: 1200.0,
            girder: SectionProperties {
                area: 789.0,
                ix: 260_730.0,
                iy: 24_330.0,
                ixy: 0.0,
                centroid_from_bottom: 24.73,
            },
            joint_section: None,
            volume_to_surface: 3.6,
            release_concrete,
            girder_concrete,
            deck: Some(DeckInput {
                concrete: deck_concrete,
                section: DeckSection {
                    area: 768.0,
                    centroid_from_bottom: 59.0,
                    volume_to_surface: 3.7,
                },
                composite: SectionProperties {
                    area: 1369.6,
                    ix: 656_600.0,
                    iy: 0.0,
                    ixy: 0.0,
                    centroid_from_bottom: 39.26,
                },
                haunch_width: 20.0,
            }),
            permanent: StrandGroup {
                material: StrandMaterial::low_relaxation(StrandGrade::Grade270),
                area: 6.12,
                jacking_stress: 202.5,
                centroid_from_bottom: 5.0,
                transfer_length: 36.0,
            },
            temporary: None,
            temporary_usage: TemporaryStrandUsage::Pretensioned,
            has_debonding: false,
            prismatic: true,
            friction: FrictionParameters::default(),
            mild_steel: MildSteel::default(),
            slab_offset: 1.0,
            loads: vec![
                UniformLoad {
                    load: ProductLoad::Slab,
                    w: 768.0 * deck_concrete.unit_weight / IN3_PER_FT3,
                },
                UniformLoad {
                    load: ProductLoad::Haunch,
                    w: 20.0 * deck_concrete.unit_weight / IN3_PER_FT3,
                },
                UniformLoad {
                    load: ProductLoad::TrafficBarrier,
                    w: 0.02,
                },
                UniformLoad {
                    load: ProductLoad::Overlay,
                    w: 0.01,
                },
            ],
            live_load: Some(LiveLoad { lane: 0.032, truck: 40.0 }),
            analysis_type: AnalysisType::SimpleSpan,
            timeline: vec![
                event(ConstructionEvent::Release, 0, 1.0),
                event(ConstructionEvent::Hauling, 1, 30.0),
                event(ConstructionEvent::DeckCasting, 2, 90.0),
                event(ConstructionEvent::RailingInstallation, 3, 120.0),
                event(ConstructionEvent::OverlayInstallation, 4, 150.0),
                event(ConstructionEvent::OpenToTraffic, 5, 180.0),
            ],
        }
    }

    /// Bundle this scenario with criteria as a loss context
    pub fn context<'a>(&'a self, criteria: &'a LossCriteria) -> LossContext<'a> {
        LossContext {
            bridge: self,
            sections: self,
            materials: self,
            strands: self,
            forces: self,
            timeline: self,
            criteria,
        }
    }

    /// `count` evenly spaced points from end to end
    pub fn points(&self, count: usize) -> Vec<PointOfInterest> {
        match count {
            0 => Vec::new(),
            1 => vec![PointOfInterest::new(self.segment, self.span_length / 2.0)],
            _ => (0..count)
                .map(|i| {
                    let x = self.span_length * i as f64 / (count - 1) as f64;
                    PointOfInterest::new(self.segment, x)
                })
                .collect(),
        }
    }

    fn check_segment(&self, segment: &SegmentKey) -> LossResult<()> {
        if *segment != self.segment {
            return Err(LossError::invalid_input(
                "segment",
                segment.to_string(),
                format!("The scenario only describes {}", self.segment),
            ));
        }
        Ok(())
    }

    fn event(&self, event: ConstructionEvent) -> Option<&TimelineEvent> {
        self.timeline.iter().find(|e| e.event == event)
    }

    fn strand_group(&self, strand_type: StrandType) -> Option<&StrandGroup> {
        match strand_type {
            StrandType::Permanent => Some(&self.permanent),
            StrandType::Temporary => self.temporary.as_ref(),
        }
    }

    /// Moment of a product load at a point assuming it acts alone (kip-in)
    fn load_moment(&self, load: ProductLoad, x: f64) -> f64 {
        let l = self.span_length;
        match load {
            ProductLoad::GirderSelfWeight => {
                let w = self.girder.area * self.release_concrete.unit_weight / IN3_PER_FT3;
                uniform_load_moment(w, l, x)
            }
            ProductLoad::LiveLoad => self
                .live_load
                .map(|ll| {
                    uniform_load_moment(ll.lane, l, x) + moving_point_load_moment(ll.truck, l, x)
                })
                .unwrap_or(0.0),
            _ => self
                .loads
                .iter()
                .filter(|u| u.load == load)
                .map(|u| uniform_load_moment(u.w, l, x))
                .sum(),
        }
    }
}

impl BridgeModel for GirderScenario {
    fn deck_kind(&self) -> DeckKind {
        match self.deck {
            Some(_) => DeckKind::Structural,
            None => DeckKind::Nonstructural,
        }
    }

    fn has_structural_longitudinal_joints(&self) -> bool {
        self.joint_section.is_some()
    }

    fn segment_length(&self, segment: &SegmentKey) -> LossResult<f64> {
        self.check_segment(segment)?;
        Ok(self.span_length)
    }

    fn midspan_poi(&self, segment: &SegmentKey) -> LossResult<PointOfInterest> {
        self.check_segment(segment)?;
        Ok(PointOfInterest::new(*segment, self.span_length / 2.0))
    }

    fn is_prismatic(&self, _segment: &SegmentKey) -> bool {
        self.prismatic
    }

    fn slab_offset(&self, _segment: &SegmentKey) -> f64 {
        self.slab_offset
    }

    fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }
}

impl SectionPropertyService for GirderScenario {
    fn section(
        &self,
        _interval: IntervalIndex,
        poi: &PointOfInterest,
        kind: SectionKind,
        _mode: SectionPropertyMode,
    ) -> LossResult<SectionProperties> {
        self.check_segment(&poi.segment)?;
        match kind {
            SectionKind::Girder => Ok(self.girder),
            SectionKind::JointComposite => Ok(self.joint_section.unwrap_or(self.girder)),
            SectionKind::Composite => self
                .deck
                .map(|deck| deck.composite)
                .ok_or_else(|| {
                    LossError::library_failure(
                        "composite section requested for a girder without a deck",
                    )
                }),
        }
    }

    fn volume_to_surface(&self, segment: &SegmentKey) -> LossResult<f64> {
        self.check_segment(segment)?;
        Ok(self.volume_to_surface)
    }

    fn deck_section(&self, poi: &PointOfInterest) -> LossResult<DeckSection> {
        self.check_segment(&poi.segment)?;
        Ok(self.deck.map(|deck| deck.section).unwrap_or_default())
    }
}

impl MaterialService for GirderScenario {
    fn segment_concrete(
        &self,
        segment: &SegmentKey,
        interval: IntervalIndex,
    ) -> LossResult<Concrete> {
        self.check_segment(segment)?;
        let release = self.event(ConstructionEvent::Release).map(|e| e.interval).unwrap_or(0);
        Ok(if interval <= release {
            self.release_concrete
        } else {
            self.girder_concrete
        })
    }

    fn deck_concrete(&self, _interval: IntervalIndex) -> LossResult<Option<Concrete>> {
        Ok(self.deck.map(|deck| deck.concrete))
    }

    fn strand(&self, segment: &SegmentKey, strand_type: StrandType) -> LossResult<StrandMaterial> {
        self.check_segment(segment)?;
        Ok(self
            .strand_group(strand_type)
            .map(|group| group.material)
            .unwrap_or(self.permanent.material))
    }
}

impl StrandGeometryService for GirderScenario {
    fn strand(
        &self,
        poi: &PointOfInterest,
        _interval: IntervalIndex,
        strand_type: StrandType,
    ) -> LossResult<StrandState> {
        self.check_segment(&poi.segment)?;
        let Some(group) = self.strand_group(strand_type) else {
            return Ok(StrandState::default());
        };
        let from_end = poi.distance_from_start.min(self.span_length - poi.distance_from_start);
        Ok(StrandState {
            area: group.area,
            jacking_stress: group.jacking_stress,
            centroid_from_bottom: group.centroid_from_bottom,
            transfer_factor: group.transfer_factor(from_end),
        })
    }

    fn temporary_strand_usage(&self, _segment: &SegmentKey) -> TemporaryStrandUsage {
        self.temporary_usage
    }

    fn has_debonding(&self, _segment: &SegmentKey) -> bool {
        self.has_debonding
    }

    fn friction(&self, _segment: &SegmentKey) -> FrictionParameters {
        self.friction
    }

    fn mild_steel(&self, _poi: &PointOfInterest) -> LossResult<MildSteel> {
        Ok(self.mild_steel)
    }
}

impl ProductForceService for GirderScenario {
    fn moment(
        &self,
        interval: IntervalIndex,
        load: ProductLoad,
        poi: &PointOfInterest,
        _analysis: AnalysisType,
        kind: ResultKind,
    ) -> LossResult<f64> {
        self.check_segment(&poi.segment)?;
        let Some(applied) = self.event(load.applied_at()).map(|e| e.interval) else {
            return Ok(0.0);
        };
        let acting = match kind {
            ResultKind::Incremental => interval == applied,
            ResultKind::Cumulative => interval >= applied,
        };
        Ok(if acting {
            self.load_moment(load, poi.distance_from_start)
        } else {
            0.0
        })
    }

    fn haunch_moment_per_unit_depth(&self, poi: &PointOfInterest) -> LossResult<f64> {
        self.check_segment(&poi.segment)?;
        let Some(deck) = self.deck else {
            return Ok(0.0);
        };
        let w = deck.haunch_width * deck.concrete.unit_weight / IN3_PER_FT3;
        Ok(uniform_load_moment(w, self.span_length, poi.distance_from_start))
    }
}

impl Timeline for GirderScenario {
    fn interval(&self, event: ConstructionEvent) -> Option<IntervalIndex> {
        self.event(event).map(|e| e.interval)
    }

    fn age(&self, event: ConstructionEvent) -> Option<f64> {
        self.event(event).map(|e| e.age)
    }
}
