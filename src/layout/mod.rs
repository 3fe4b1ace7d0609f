//! Anchor-relative placement.

pub mod solver;
