//! Frame snapshots handed to sinks.
//!
//! Rasterization happens downstream; a [`frame::Frame`] carries every value needed to draw it.

pub mod fingerprint;
pub mod frame;
