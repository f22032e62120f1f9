//! Trailhead Kernel: the graph model and canonical hashing core.
//!
//! # API Surface
//!
//! - [`graph::ActivityGraph`] -- arena of [`graph::GraphNode`] vertices joined by AND/OR edges
//! - [`proof::canon::canonical_json_bytes`] -- the single JSON canonicalizer
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `proof` ← `graph`
//!
//! One-way only. `graph` uses `proof` to compute its digest; `proof`
//! depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod graph;
pub mod proof;
