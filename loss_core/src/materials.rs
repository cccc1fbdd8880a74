//! # Materials
//!
//! Concrete and prestressing strand descriptions as reported by the
//! material service. Units are kips, inches and ksi throughout.
//!
//! ## Example
//!
//! ```rust
//! use loss_core::materials::{StrandMaterial, StrandGrade};
//!
//! let strand = StrandMaterial::low_relaxation(StrandGrade::Grade270);
//! assert_eq!(strand.fpu, 270.0);
//! assert!((strand.fpy - 243.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::criteria::CuringMethod;

/// Concrete classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConcreteType {
    #[default]
    Normal,
    AllLightweight,
    SandLightweight,
    /// Ultra-high performance concrete per the AASHTO guide specification
    Uhpc,
    /// Ultra-high performance concrete per the PCI guidelines
    PciUhpc,
}

impl ConcreteType {
    /// Whether this is either flavor of ultra-high performance concrete
    pub fn is_uhpc(&self) -> bool {
        matches!(self, ConcreteType::Uhpc | ConcreteType::PciUhpc)
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteType::Normal => "normal weight",
            ConcreteType::AllLightweight => "all lightweight",
            ConcreteType::SandLightweight => "sand lightweight",
            ConcreteType::Uhpc => "UHPC",
            ConcreteType::PciUhpc => "PCI-UHPC",
        }
    }
}

impl std::fmt::Display for ConcreteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Concrete properties at a given interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    /// Compressive strength at the interval (ksi)
    pub fc: f64,
    /// Modulus of elasticity at the interval (ksi)
    pub ec: f64,
    /// Unit weight (kcf)
    pub unit_weight: f64,
    pub concrete_type: ConcreteType,
    pub curing: CuringMethod,
    /// Ultimate autogenous shrinkage strain (PCI-UHPC only)
    pub autogenous_shrinkage: f64,
    /// Whether a post-cure thermal treatment was applied (PCI-UHPC only)
    pub post_cure_thermal_treatment: bool,
}

impl Concrete {
    /// Normal weight concrete with the modulus derived from strength
    pub fn normal(fc: f64) -> Self {
        Concrete {
            fc,
            ec: crate::lrfd::modulus_of_elasticity(fc, 0.150),
            unit_weight: 0.150,
            concrete_type: ConcreteType::Normal,
            curing: CuringMethod::Accelerated,
            autogenous_shrinkage: 0.0,
            post_cure_thermal_treatment: false,
        }
    }
}

/// Permanent or temporary strands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrandType {
    Permanent,
    Temporary,
}

/// Relaxation class of the strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StrandRelaxation {
    #[default]
    LowRelaxation,
    StressRelieved,
}

impl StrandRelaxation {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            StrandRelaxation::LowRelaxation => "low relaxation",
            StrandRelaxation::StressRelieved => "stress relieved",
        }
    }
}

/// Strand grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StrandGrade {
    Grade250,
    #[default]
    Grade270,
    Grade300,
}

impl StrandGrade {
    /// Specified tensile strength fpu (ksi)
    pub fn fpu(&self) -> f64 {
        match self {
            StrandGrade::Grade250 => 250.0,
            StrandGrade::Grade270 => 270.0,
            StrandGrade::Grade300 => 300.0,
        }
    }
}

/// Strand coating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StrandCoating {
    #[default]
    None,
    GritEpoxy,
}

/// Prestressing strand material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrandMaterial {
    pub grade: StrandGrade,
    /// Tensile strength (ksi)
    pub fpu: f64,
    /// Yield strength (ksi)
    pub fpy: f64,
    /// Modulus of elasticity (ksi)
    pub ep: f64,
    pub relaxation: StrandRelaxation,
    pub coating: StrandCoating,
}

impl StrandMaterial {
    /// Low relaxation strand, fpy = 0.90fpu (LRFD Table 5.4.4.1-1)
    pub fn low_relaxation(grade: StrandGrade) -> Self {
        let fpu = grade.fpu();
        StrandMaterial {
            grade,
            fpu,
            fpy: 0.90 * fpu,
            ep: 28_500.0,
            relaxation: StrandRelaxation::LowRelaxation,
            coating: StrandCoating::None,
        }
    }

    /// Stress relieved strand, fpy = 0.85fpu
    pub fn stress_relieved(grade: StrandGrade) -> Self {
        let fpu = grade.fpu();
        StrandMaterial {
            grade,
            fpu,
            fpy: 0.85 * fpu,
            ep: 28_500.0,
            relaxation: StrandRelaxation::StressRelieved,
            coating: StrandCoating::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uhpc_flags() {
        assert!(ConcreteType::Uhpc.is_uhpc());
        assert!(ConcreteType::PciUhpc.is_uhpc());
        assert!(!ConcreteType::SandLightweight.is_uhpc());
    }

    #[test]
    fn test_stress_relieved_yield() {
        let strand = StrandMaterial::stress_relieved(StrandGrade::Grade250);
        assert!((strand.fpy - 212.5).abs() < 1e-9);
        assert_eq!(strand.relaxation, StrandRelaxation::StressRelieved);
    }

    #[test]
    fn test_normal_concrete_modulus() {
        let concrete = Concrete::normal(6.0);
        // 33000 * 0.15^1.5 * sqrt(6) = 4696 ksi
        assert!((concrete.ec - 4696.0).abs() < 1.0);
    }
}
