//! World implementations for the harness runner.

pub mod document;
pub mod layered;
pub mod paris;
