//! # Bridge Model Contracts
//!
//! The loss engine does not own a bridge model. Everything it needs about
//! geometry, materials, strands, product forces and the construction
//! timeline comes from read-only services described by the traits in this
//! module. A [`LossContext`] bundles one handle of each so every dependency
//! is visible at the call site.
//!
//! ```text
//! LossContext
//! ├── bridge:    BridgeModel            (deck, joints, segment geometry)
//! ├── sections:  SectionPropertyService (A, I, centroids by stage)
//! ├── materials: MaterialService        (concrete and strand)
//! ├── strands:   StrandGeometryService  (area, jacking stress, location)
//! ├── forces:    ProductForceService    (product moments)
//! ├── timeline:  Timeline               (intervals and ages)
//! └── criteria:  LossCriteria           (owner configuration)
//! ```

use serde::{Deserialize, Serialize};

use crate::criteria::{LossCriteria, SectionPropertyMode};
use crate::errors::LossResult;
use crate::loads::{AnalysisType, ConstructionEvent, IntervalIndex, ProductLoad, ResultKind};
use crate::materials::{Concrete, StrandMaterial, StrandType};

/// Identity of a precast segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentKey {
    pub group: usize,
    pub girder: usize,
    pub segment: usize,
}

impl SegmentKey {
    pub fn new(group: usize, girder: usize, segment: usize) -> Self {
        SegmentKey { group, girder, segment }
    }
}

impl std::fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Group {}, Girder {}, Segment {}", self.group, self.girder, self.segment)
    }
}

/// A location along a segment where losses are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub segment: SegmentKey,
    /// Distance from the start of the segment (in)
    pub distance_from_start: f64,
}

impl PointOfInterest {
    pub fn new(segment: SegmentKey, distance_from_start: f64) -> Self {
        PointOfInterest {
            segment,
            distance_from_start,
        }
    }
}

/// Deck classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeckKind {
    /// Cast-in-place deck acting compositely with the girder
    #[default]
    Structural,
    /// No deck, or a deck that does not participate structurally
    Nonstructural,
}

/// Cross section stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Bare girder
    Girder,
    /// Girder plus structural longitudinal joints
    JointComposite,
    /// Girder plus deck
    Composite,
}

/// Section properties of a stage (in, in², in⁴)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SectionProperties {
    pub area: f64,
    pub ix: f64,
    pub iy: f64,
    pub ixy: f64,
    /// Height of the centroid above the bottom of the girder
    pub centroid_from_bottom: f64,
}

impl SectionProperties {
    /// Moment of inertia for vertical bending of a possibly asymmetric section
    ///
    /// For principal axes (ixy = 0) this is simply ix.
    pub fn bending_inertia(&self) -> f64 {
        if self.ixy == 0.0 || self.iy <= 0.0 {
            self.ix
        } else {
            self.ix - self.ixy * self.ixy / self.iy
        }
    }

    /// Eccentricity of a point below the centroid (positive downward)
    pub fn eccentricity_of(&self, height_from_bottom: f64) -> f64 {
        self.centroid_from_bottom - height_from_bottom
    }
}

/// Deck slab properties used for deck shrinkage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DeckSection {
    /// Area of the deck concrete (in²)
    pub area: f64,
    /// Height of the deck centroid above the bottom of the girder (in)
    pub centroid_from_bottom: f64,
    /// Volume to surface ratio (in)
    pub volume_to_surface: f64,
}

/// State of a strand group at a point of interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StrandState {
    /// Area of prestressing steel (in²)
    pub area: f64,
    /// Jacking stress (ksi)
    pub jacking_stress: f64,
    /// Height of the strand centroid above the bottom of the girder (in)
    pub centroid_from_bottom: f64,
    /// Transfer length adjustment (0 at the end of the strand, 1 beyond the transfer length)
    pub transfer_factor: f64,
}

/// How temporary strands are installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TemporaryStrandUsage {
    #[default]
    Pretensioned,
    PostTensionedBeforeLifting,
    PostTensionedBeforeShipping,
}

impl TemporaryStrandUsage {
    pub fn is_post_tensioned(&self) -> bool {
        !matches!(self, TemporaryStrandUsage::Pretensioned)
    }
}

/// Duct friction and anchorage parameters for post-tensioned strands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionParameters {
    /// Wobble coefficient (1/in)
    pub wobble: f64,
    /// Curvature friction coefficient
    pub friction_coefficient: f64,
    /// Anchor set (in)
    pub anchor_set: f64,
}

impl Default for FrictionParameters {
    fn default() -> Self {
        FrictionParameters {
            wobble: 0.0002 / 12.0,
            friction_coefficient: 0.25,
            anchor_set: 0.375,
        }
    }
}

/// Bonded mild reinforcement in the tension zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MildSteel {
    /// Area (in²)
    pub area: f64,
    /// Yield strength (ksi)
    pub fy: f64,
}

impl Default for MildSteel {
    fn default() -> Self {
        MildSteel { area: 0.0, fy: 60.0 }
    }
}

/// Bridge-level facts
pub trait BridgeModel {
    fn deck_kind(&self) -> DeckKind;
    fn has_structural_longitudinal_joints(&self) -> bool;
    /// Length of the segment (in)
    fn segment_length(&self, segment: &SegmentKey) -> LossResult<f64>;
    fn midspan_poi(&self, segment: &SegmentKey) -> LossResult<PointOfInterest>;
    fn is_prismatic(&self, segment: &SegmentKey) -> bool;
    /// As-built slab offset at the segment (in)
    fn slab_offset(&self, segment: &SegmentKey) -> f64;
    fn analysis_type(&self) -> AnalysisType;
}

/// Section properties by interval and stage
pub trait SectionPropertyService {
    fn section(
        &self,
        interval: IntervalIndex,
        poi: &PointOfInterest,
        kind: SectionKind,
        mode: SectionPropertyMode,
    ) -> LossResult<SectionProperties>;
    /// Volume to surface ratio of the girder (in)
    fn volume_to_surface(&self, segment: &SegmentKey) -> LossResult<f64>;
    fn deck_section(&self, poi: &PointOfInterest) -> LossResult<DeckSection>;
}

/// Concrete and strand materials
pub trait MaterialService {
    fn segment_concrete(
        &self,
        segment: &SegmentKey,
        interval: IntervalIndex,
    ) -> LossResult<Concrete>;
    /// Deck concrete, `None` when there is no cast-in-place deck
    fn deck_concrete(&self, interval: IntervalIndex) -> LossResult<Option<Concrete>>;
    fn strand(&self, segment: &SegmentKey, strand_type: StrandType) -> LossResult<StrandMaterial>;
}

/// Strand layout and stressing
pub trait StrandGeometryService {
    fn strand(
        &self,
        poi: &PointOfInterest,
        interval: IntervalIndex,
        strand_type: StrandType,
    ) -> LossResult<StrandState>;
    fn temporary_strand_usage(&self, segment: &SegmentKey) -> TemporaryStrandUsage;
    fn has_debonding(&self, segment: &SegmentKey) -> bool;
    fn friction(&self, segment: &SegmentKey) -> FrictionParameters;
    /// Mild reinforcement counted in the partial prestressing ratio
    fn mild_steel(&self, _poi: &PointOfInterest) -> LossResult<MildSteel> {
        Ok(MildSteel::default())
    }
}

/// Product load effects
pub trait ProductForceService {
    /// Moment at a point (kip-in, positive sagging)
    fn moment(
        &self,
        interval: IntervalIndex,
        load: ProductLoad,
        poi: &PointOfInterest,
        analysis: AnalysisType,
        kind: ResultKind,
    ) -> LossResult<f64>;
    /// Slab moment per inch of slab offset (kip-in/in)
    fn haunch_moment_per_unit_depth(&self, poi: &PointOfInterest) -> LossResult<f64>;
}

/// Construction sequence
pub trait Timeline {
    fn interval(&self, event: ConstructionEvent) -> Option<IntervalIndex>;
    /// Concrete age at the event (days since casting)
    fn age(&self, event: ConstructionEvent) -> Option<f64>;
}

/// Every collaborator the loss engine reads from
#[derive(Clone, Copy)]
pub struct LossContext<'a> {
    pub bridge: &'a dyn BridgeModel,
    pub sections: &'a dyn SectionPropertyService,
    pub materials: &'a dyn MaterialService,
    pub strands: &'a dyn StrandGeometryService,
    pub forces: &'a dyn ProductForceService,
    pub timeline: &'a dyn Timeline,
    pub criteria: &'a LossCriteria,
}

impl std::fmt::Debug for LossContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LossContext")
            .field("criteria", self.criteria)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bending_inertia_of_asymmetric_section() {
        let symmetric = SectionProperties {
            area: 100.0,
            ix: 1000.0,
            iy: 500.0,
            ixy: 0.0,
            centroid_from_bottom: 10.0,
        };
        assert_eq!(symmetric.bending_inertia(), 1000.0);

        let skewed = SectionProperties { ixy: 100.0, ..symmetric };
        // 1000 - 100^2/500 = 980
        assert!((skewed.bending_inertia() - 980.0).abs() < 1e-9);
    }

    #[test]
    fn test_eccentricity_is_positive_below_centroid() {
        let section = SectionProperties {
            centroid_from_bottom: 24.0,
            ..SectionProperties::default()
        };
        assert_eq!(section.eccentricity_of(4.0), 20.0);
        assert_eq!(section.eccentricity_of(30.0), -6.0);
    }

    #[test]
    fn test_segment_display() {
        assert_eq!(SegmentKey::new(1, 2, 0).to_string(), "Group 1, Girder 2, Segment 0");
    }
}
