//! Product loads and construction timeline vocabulary
//!
//! Product loads are the unfactored load effects the bridge model reports
//! by category. Construction events name the milestones of the staged
//! construction sequence that the timeline maps to intervals and ages.

use serde::{Deserialize, Serialize};

/// Index of an analysis interval in the construction timeline
pub type IntervalIndex = usize;

/// Unfactored product load categories
///
/// # Example
/// ```
/// use loss_core::loads::ProductLoad;
///
/// assert_eq!(ProductLoad::Slab.code(), "DC-slab");
/// assert!(ProductLoad::Overlay.is_superimposed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductLoad {
    GirderSelfWeight,
    Slab,
    /// Slab haunch (slab offset fillet)
    Haunch,
    Diaphragm,
    ShearKey,
    LongitudinalJoint,
    Construction,
    TrafficBarrier,
    Sidewalk,
    Overlay,
    UserDc,
    UserDw,
    LiveLoad,
}

impl ProductLoad {
    /// All product loads in standard order
    pub const ALL: [ProductLoad; 13] = [
        ProductLoad::GirderSelfWeight,
        ProductLoad::Slab,
        ProductLoad::Haunch,
        ProductLoad::Diaphragm,
        ProductLoad::ShearKey,
        ProductLoad::LongitudinalJoint,
        ProductLoad::Construction,
        ProductLoad::TrafficBarrier,
        ProductLoad::Sidewalk,
        ProductLoad::Overlay,
        ProductLoad::UserDc,
        ProductLoad::UserDw,
        ProductLoad::LiveLoad,
    ];

    /// Loads applied to the noncomposite girder when the deck is cast
    pub const DECK_PLACEMENT: [ProductLoad; 5] = [
        ProductLoad::Slab,
        ProductLoad::Haunch,
        ProductLoad::Diaphragm,
        ProductLoad::ShearKey,
        ProductLoad::Construction,
    ];

    /// Loads applied to the composite section after the deck hardens
    pub const SUPERIMPOSED: [ProductLoad; 5] = [
        ProductLoad::TrafficBarrier,
        ProductLoad::Sidewalk,
        ProductLoad::Overlay,
        ProductLoad::UserDc,
        ProductLoad::UserDw,
    ];

    /// Short code used in diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            ProductLoad::GirderSelfWeight => "DC-girder",
            ProductLoad::Slab => "DC-slab",
            ProductLoad::Haunch => "DC-haunch",
            ProductLoad::Diaphragm => "DC-diaphragm",
            ProductLoad::ShearKey => "DC-shear-key",
            ProductLoad::LongitudinalJoint => "DC-joint",
            ProductLoad::Construction => "CONST",
            ProductLoad::TrafficBarrier => "DC-barrier",
            ProductLoad::Sidewalk => "DC-sidewalk",
            ProductLoad::Overlay => "DW-overlay",
            ProductLoad::UserDc => "DC-user",
            ProductLoad::UserDw => "DW-user",
            ProductLoad::LiveLoad => "LL+IM",
        }
    }

    /// Whether this load acts on the composite section
    pub fn is_superimposed(&self) -> bool {
        Self::SUPERIMPOSED.contains(self)
    }

    /// Construction event at which the load is applied
    pub fn applied_at(&self) -> ConstructionEvent {
        match self {
            ProductLoad::GirderSelfWeight => ConstructionEvent::Release,
            ProductLoad::Slab
            | ProductLoad::Haunch
            | ProductLoad::Diaphragm
            | ProductLoad::ShearKey
            | ProductLoad::LongitudinalJoint
            | ProductLoad::Construction => ConstructionEvent::DeckCasting,
            ProductLoad::TrafficBarrier
            | ProductLoad::Sidewalk
            | ProductLoad::UserDc
            | ProductLoad::UserDw => ConstructionEvent::RailingInstallation,
            ProductLoad::Overlay => ConstructionEvent::OverlayInstallation,
            ProductLoad::LiveLoad => ConstructionEvent::OpenToTraffic,
        }
    }
}

impl std::fmt::Display for ProductLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structural analysis used to obtain product moments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnalysisType {
    SimpleSpan,
    Continuous,
    #[default]
    Envelope,
}

/// Whether a product moment is the increment in an interval or the running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    Incremental,
    Cumulative,
}

/// Construction events the loss engine needs from the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionEvent {
    /// Prestress transfer
    Release,
    /// Hauling / shipping to the bridge site
    Hauling,
    TemporaryStrandRemoval,
    DeckCasting,
    RailingInstallation,
    OverlayInstallation,
    OpenToTraffic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superimposed_loads() {
        assert!(ProductLoad::TrafficBarrier.is_superimposed());
        assert!(ProductLoad::UserDw.is_superimposed());
        assert!(!ProductLoad::Slab.is_superimposed());
        assert!(!ProductLoad::LiveLoad.is_superimposed());
    }

    #[test]
    fn test_application_events() {
        assert_eq!(ProductLoad::Slab.applied_at(), ConstructionEvent::DeckCasting);
        assert_eq!(ProductLoad::Overlay.applied_at(), ConstructionEvent::OverlayInstallation);
        assert_eq!(ProductLoad::LiveLoad.applied_at(), ConstructionEvent::OpenToTraffic);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ProductLoad::TrafficBarrier).unwrap();
        assert_eq!(json, "\"TrafficBarrier\"");
        let parsed: ProductLoad = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ProductLoad::TrafficBarrier);
    }
}
