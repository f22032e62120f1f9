//! Proof module: canonical JSON and domain-separated hashing.
//!
//! Nothing in this module depends on the graph model.

pub mod canon;
pub mod hash;
pub mod hash_domain;
