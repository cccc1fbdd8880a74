//! Friction and anchor set losses for post-tensioned temporary strands
//!
//! Temporary strands that are post-tensioned run in straight ducts, so
//! only wobble friction applies (LRFD 5.9.3.2.2b):
//!
//! ```text
//! ΔfpF(x) = fpj (1 - e^-(Kx))
//! Lset    = √(Ep · Δset / (fpj · K))
//! ΔfpA(x) = 2 fpj K (Lset - x)     for x < Lset
//! ```

use serde::{Deserialize, Serialize};

use crate::bridge::FrictionParameters;

/// Friction and anchor set at a location along a straight duct
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PostTensionLosses {
    /// Friction loss (ksi)
    pub friction: f64,
    /// Anchor set loss (ksi)
    pub anchor_set: f64,
    /// Length affected by anchor set (in)
    pub anchor_set_length: f64,
}

impl PostTensionLosses {
    pub fn total(&self) -> f64 {
        self.friction + self.anchor_set
    }
}

/// Friction loss at `x` inches from the jacking end
pub fn friction_loss(fpj: f64, wobble: f64, x: f64) -> f64 {
    fpj * (1.0 - (-wobble * x.max(0.0)).exp())
}

/// Length of duct affected by anchor set (in)
///
/// Zero when there is no friction or no stress to seat against.
pub fn anchor_set_length(fpj: f64, ep: f64, anchor_set: f64, wobble: f64) -> f64 {
    if fpj <= 0.0 || wobble <= 0.0 || anchor_set <= 0.0 {
        return 0.0;
    }
    (ep * anchor_set / (fpj * wobble)).sqrt()
}

/// Anchor set loss at `x` inches from the jacking end
pub fn anchor_set_loss(fpj: f64, wobble: f64, set_length: f64, x: f64) -> f64 {
    if x >= set_length {
        return 0.0;
    }
    2.0 * fpj * wobble * (set_length - x)
}

/// Friction and anchor set at a location, jacked from the nearer end.
///
/// # Arguments
/// * `fpj` - Jacking stress (ksi)
/// * `ep` - Strand modulus (ksi)
/// * `params` - Duct and anchorage parameters
/// * `distance_from_start` - Location along the segment (in)
/// * `segment_length` - Segment length (in)
pub fn post_tension_losses(
    fpj: f64,
    ep: f64,
    params: &FrictionParameters,
    distance_from_start: f64,
    segment_length: f64,
) -> PostTensionLosses {
    let x = distance_from_start.min(segment_length - distance_from_start).max(0.0);
    let set_length = anchor_set_length(fpj, ep, params.anchor_set, params.wobble);
    PostTensionLosses {
        friction: friction_loss(fpj, params.wobble, x),
        anchor_set: anchor_set_loss(fpj, params.wobble, set_length, x),
        anchor_set_length: set_length,
    }
}
