//! Common utilities for the Sift selector engine.
//!
//! This crate provides shared infrastructure used by the other Sift crates:
//! - **Warning System** - de-duplicated diagnostics routed through the `log` facade
//! - **Pseudo State** - the dynamic element state bitset read by selector matching

pub mod pseudo_state;
pub mod warning;

pub use pseudo_state::PseudoState;
