//! Directive trees, rate functions and their flattened schedule.

pub mod directive;
pub mod ease;
pub mod timeline;
