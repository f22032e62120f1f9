//! Trailhead Search: greedy best-first AND/OR planning under two ceilings.
//!
//! This crate provides the search layer. It depends only on
//! `trailhead_kernel`, never on `trailhead_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! trailhead_kernel  ←  trailhead_search  ←  trailhead_harness
//! (graph, hashing)     (frontier, engine)    (worlds, rendering, bundles)
//! ```
//!
//! # Key types
//!
//! - [`SearchEngine`]: runs the expansion loop and returns a [`Plan`]
//! - [`Heuristic`] / [`AdditiveHeuristic`]: node scoring, lower expands first
//! - [`SearchBudget`]: the time and resource ceilings
//! - [`SearchPolicy`]: dedup and AND-edge handling configuration
//! - [`BestFirstFrontier`]: min-heap with insertion-order tie-breaking
//! - [`SearchTrace`]: expansion-event audit log with canonical JSON form

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod policy;
pub mod state;
pub mod trace;

pub use engine::{Plan, PlanStep, SearchEngine, SearchResult};
pub use error::SearchError;
pub use frontier::BestFirstFrontier;
pub use heuristic::{AdditiveHeuristic, Heuristic};
pub use policy::{AndEdgePolicy, DedupKey, SearchBudget, SearchPolicy, HOURS_PER_DAY};
pub use state::{FrontierKey, SearchState};
pub use trace::{SearchTrace, TraceBindings};
