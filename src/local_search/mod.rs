//! # Local Search
//!
//! Local search procedures that refine a single incumbent by probing its
//! neighbourhood. They draw on the same evaluation budget as the optimiser
//! that launches them, so every trial point appears in the run's convergence trend.
//!
//! [`ShortDistanceSearch`] is the stand-alone S optimiser's engine and also
//! the embedded refinement step of self-adaptive DE.

pub mod short_distance;

pub use short_distance::ShortDistanceSearch;
