//! Stress reconstruction and surface force integration.
//!
//! The pipeline runs stress-at-cell, then interpolate-at-point, then
//! differential-force-at-point, then integrate-over-boundary, each stage
//! a pure function of the population field.

pub mod derive;
pub mod force;
pub mod interpolate;
