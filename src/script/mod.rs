//! Declarative JSON scene scripts and their runner.

pub mod model;
pub mod runner;
