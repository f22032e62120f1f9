//! Trailhead Harness: world-level orchestration for the planner.
//!
//! The harness turns a world and a trip request into a plan, an itinerary
//! and a self-contained artifact bundle. It does not make planning
//! decisions; it delegates those to `trailhead-search`. Worlds provide
//! domain data only; the harness owns orchestration, I/O and presentation.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod bundle_dir;
pub mod contract;
pub mod render;
pub mod request;
pub mod runner;
pub mod worlds;
