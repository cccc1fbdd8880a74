//! # Beam Equations
//!
//! Closed-form product moments used by the in-memory scenario.
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Positive causes tension on bottom fiber (sagging)
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1

pub mod beam;

pub use beam::{moving_point_load_moment, uniform_load_moment};
