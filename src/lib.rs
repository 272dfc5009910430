//! Show coordinate-system auto-fit.
//!
//! Given the live GPS positions and compass headings of a drone fleet and the
//! planned show-local takeoff layout, estimate the geographic origin and
//! heading of the show coordinate system that best aligns plan with reality.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    fitting/                         │  ← seed + ICP driver
//! └─────────────────────────────────────────────────────┘
//!          │                 │                │
//! ┌────────────────┐ ┌───────────────┐ ┌──────────────┐
//! │   matching/    │ │  alignment/   │ │     geo/     │
//! │ distance matrix│ │ 2D Procrustes │ │  flat-earth  │
//! │ greedy one-to- │ │ (SVD) rigid   │ │  tangent-    │
//! │ one assignment │ │ alignment     │ │  plane proj. │
//! └────────────────┘ └───────────────┘ └──────────────┘
//!          │                 │                │
//! ┌─────────────────────────────────────────────────────┐
//! │                      core/                          │  ← types, bearing math
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The whole computation is synchronous, single-threaded and free of shared
//! state: every [`estimate`] call reads its own problem and returns a fresh
//! result, so independent invocations may run on separate threads without
//! synchronization.
//!
//! # Example
//!
//! ```
//! use showfit::{
//!     estimate, AxisConvention, FitOptions, FittingProblem, GeoPoint, LocalPoint,
//! };
//!
//! // Two drones on the pad, ten meters apart along the east axis.
//! let problem = FittingProblem::from_samples(
//!     vec!["drone-1".into(), "drone-2".into()],
//!     vec![
//!         Some(GeoPoint::new(19.0613, 47.4740)),
//!         Some(GeoPoint::new(19.06143, 47.4740)),
//!     ],
//!     vec![Some(0.0), Some(0.0)],
//!     vec![LocalPoint::new(0.0, 0.0), LocalPoint::new(10.0, 0.0)],
//!     AxisConvention::NorthEastUp,
//! );
//!
//! let result = estimate(&problem, &FitOptions::default())?;
//! assert!(result.converged);
//! # Ok::<(), showfit::FitError>(())
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Geographic projection (depends on core)
// ============================================================================
pub mod geo;

// ============================================================================
// Layer 3: Algorithms (depend on core)
// ============================================================================
pub mod alignment;
pub mod matching;

// ============================================================================
// Layer 4: Fit orchestration (depends on all layers)
// ============================================================================
pub mod fitting;

pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use crate::core::math;
pub use crate::core::types::{
    AxisConvention, CoordinateSystemEstimate, FittingProblem, GeoPoint, LocalPoint,
};

pub use alignment::{align_pairs, RigidAlignment};
pub use error::{FitError, Result};
pub use fitting::{estimate, initial_estimate, FitOptions, FitResult};
pub use geo::FlatEarthTransformer;
pub use matching::{distance_matrix, greedy_assignment, Matching};
