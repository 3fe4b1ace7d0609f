//! Frame sinks.
//!
//! Sinks consume frame snapshots in timeline order and are driven by [`crate::Scene`].

/// Generic frame sink trait and built-in sinks.
pub mod sink;
