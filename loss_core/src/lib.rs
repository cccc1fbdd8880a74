//! # loss_core - Prestress Loss Engine
//!
//! `loss_core` computes the loss of prestress in precast, pretensioned
//! concrete girders at a point of interest, following the refined,
//! approximate and lump sum methods of the AASHTO LRFD specifications and
//! the WSDOT and TxDOT variants. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Explicit collaborators**: The bridge model is read through the traits in [`bridge`]
//! - **Stateless models**: Each loss model is a pure function of its parameters
//! - **Rich Errors**: Structured error types with stable reason codes
//! - **Staged results**: Every loss is recorded with the milestone it belongs to
//!
//! ## Quick Start
//!
//! ```rust
//! use loss_core::criteria::LossCriteria;
//! use loss_core::losses::{EvaluationContext, LossEngine, Milestone, PrestressLosses};
//! use loss_core::scenario::GirderScenario;
//!
//! let scenario = GirderScenario::template();
//! let criteria = LossCriteria::default();
//! let mut engine = LossEngine::new(scenario.context(&criteria));
//!
//! let points = scenario.points(5);
//! let eval = EvaluationContext::analysis();
//! for result in engine.compute_segment(&scenario.segment, &points, &eval) {
//!     let details = result.unwrap();
//!     assert!(details.effective_prestress(Milestone::Final) > 0.0);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`losses`] - Dispatcher, parameter extraction and the loss model family
//! - [`lrfd`] - Closed-form creep, shrinkage, relaxation and elastic shortening equations
//! - [`bridge`] - Collaborator contracts
//! - [`criteria`] - Owner-configured loss criteria
//! - [`status`] - Diagnostics and status reporting
//! - [`scenario`] - In-memory single girder collaborators
//! - [`errors`] - Structured error types
//! - [`file_io`] - Scenario and criteria loading, atomic result saves

pub mod bridge;
pub mod criteria;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod losses;
pub mod lrfd;
pub mod materials;
pub mod scenario;
pub mod status;

// Re-export commonly used types at crate root for convenience
pub use bridge::{LossContext, PointOfInterest, SegmentKey};
pub use criteria::{LossCriteria, LossMethod, SpecificationEdition};
pub use errors::{LossComputationError, LossError, LossResult};
pub use file_io::{load_criteria, load_scenario, save_results};
pub use losses::{EvaluationContext, LossDetails, LossEngine, Milestone, PrestressLosses};
pub use scenario::GirderScenario;
